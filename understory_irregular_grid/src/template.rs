// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-axis track templates such as `"1fr 2fr"` or `"100px repeat(2, 1fr)"`.
//!
//! Supported track lengths:
//! - `Nfr`: a share of the space left after fixed tracks and gaps,
//! - `Npx`, `Nvp`, or a bare number: logical pixels,
//! - `N%`: a percentage of the cross size,
//! - `repeat(count, tracks…)`: `tracks` repeated `count` times.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;
use thiserror::Error;

/// Inline capacity for per-track buffers; most grids have a handful of tracks.
pub(crate) const INLINE_TRACKS: usize = 8;

/// Track lengths in logical pixels.
pub type TrackLengths = SmallVec<[f64; INLINE_TRACKS]>;

/// Upper bound on the number of tracks a template may expand to.
pub const MAX_TRACKS: usize = 1024;

/// A single parsed track.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Track {
    /// Flexible share of the remaining space.
    Fr(f64),
    /// Fixed length in logical pixels.
    Px(f64),
    /// Percentage of the cross size.
    Percent(f64),
}

/// Error produced while parsing a template.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TemplateError {
    /// A track is not a number with a known unit.
    #[error("invalid track length `{0}`")]
    InvalidLength(String),
    /// A track length is negative.
    #[error("negative track length `{0}`")]
    NegativeLength(String),
    /// `repeat` count is not a positive integer.
    #[error("`repeat` expects a positive count, got `{0}`")]
    InvalidRepeatCount(String),
    /// `repeat` has no comma or no tracks after it.
    #[error("`repeat` needs a count and at least one track")]
    EmptyRepeat,
    /// `repeat` expands past [`MAX_TRACKS`] tracks.
    #[error("template expands to more than 1024 tracks")]
    TooManyTracks,
    /// Parentheses do not match.
    #[error("unbalanced parenthesis in template")]
    Unbalanced,
}

/// Result of sizing parsed tracks against a cross size.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackSizes {
    /// Length of each track.
    pub lengths: TrackLengths,
    /// Tracks plus gaps did not fit; gaps must be dropped.
    pub compressed: bool,
}

/// Parses a template string into tracks.
///
/// An empty or blank template yields no tracks.
pub fn parse_template(template: &str) -> Result<Vec<Track>, TemplateError> {
    let mut out = Vec::new();
    parse_into(template, &mut out)?;
    Ok(out)
}

fn parse_into(src: &str, out: &mut Vec<Track>) -> Result<(), TemplateError> {
    for token in split_top_level(src)? {
        if let Some(body) = token.strip_prefix("repeat(") {
            let body = body.strip_suffix(')').ok_or(TemplateError::Unbalanced)?;
            let (count, tracks) = body.split_once(',').ok_or(TemplateError::EmptyRepeat)?;
            let count = count.trim();
            let n: usize = count
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| TemplateError::InvalidRepeatCount(count.to_string()))?;
            let mut inner = Vec::new();
            parse_into(tracks, &mut inner)?;
            if inner.is_empty() {
                return Err(TemplateError::EmptyRepeat);
            }
            n.checked_mul(inner.len())
                .and_then(|len| len.checked_add(out.len()))
                .filter(|len| *len <= MAX_TRACKS)
                .ok_or(TemplateError::TooManyTracks)?;
            for _ in 0..n {
                out.extend_from_slice(&inner);
            }
        } else {
            out.push(parse_track(token)?);
        }
    }
    Ok(())
}

/// Splits on whitespace outside parentheses.
fn split_top_level(src: &str) -> Result<Vec<&str>, TemplateError> {
    let mut tokens = Vec::new();
    let mut depth = 0_usize;
    let mut start = None;
    for (i, ch) in src.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or(TemplateError::Unbalanced)?;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&src[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if depth != 0 {
        return Err(TemplateError::Unbalanced);
    }
    if let Some(s) = start {
        tokens.push(&src[s..]);
    }
    Ok(tokens)
}

fn parse_track(token: &str) -> Result<Track, TemplateError> {
    let invalid = || TemplateError::InvalidLength(token.to_string());
    let (num, make): (&str, fn(f64) -> Track) = if let Some(n) = token.strip_suffix("fr") {
        (n, Track::Fr)
    } else if let Some(n) = token.strip_suffix("px") {
        (n, Track::Px)
    } else if let Some(n) = token.strip_suffix("vp") {
        (n, Track::Px)
    } else if let Some(n) = token.strip_suffix('%') {
        (n, Track::Percent)
    } else {
        (token, Track::Px)
    };
    let value: f64 = num.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    if value < 0.0 {
        return Err(TemplateError::NegativeLength(token.to_string()));
    }
    Ok(make(value))
}

/// Sizes `tracks` to fill `cross_size` with `gap` between adjacent tracks.
///
/// Fixed and percentage tracks keep their length; `fr` tracks share what is
/// left. When fixed lengths plus gaps exceed `cross_size` the result is
/// compressed: gaps are dropped and `fr` tracks share whatever remains.
#[must_use]
pub fn resolve_tracks(tracks: &[Track], cross_size: f64, gap: f64) -> TrackSizes {
    let cross_size = cross_size.max(0.0);
    let gap = gap.max(0.0);

    let mut fixed = 0.0;
    let mut fr_total = 0.0;
    for track in tracks {
        match *track {
            Track::Fr(f) => fr_total += f,
            Track::Px(px) => fixed += px,
            Track::Percent(p) => fixed += cross_size * p / 100.0,
        }
    }

    let gap_count = tracks.len().saturating_sub(1);
    let mut gaps = gap * gap_count as f64;
    let compressed = fixed + gaps > cross_size;
    if compressed {
        gaps = 0.0;
    }
    let remaining = (cross_size - fixed - gaps).max(0.0);

    let lengths = tracks
        .iter()
        .map(|track| match *track {
            Track::Fr(f) if fr_total > 0.0 => remaining * f / fr_total,
            Track::Fr(_) => 0.0,
            Track::Px(px) => px,
            Track::Percent(p) => cross_size * p / 100.0,
        })
        .collect();

    TrackSizes {
        lengths,
        compressed,
    }
}
