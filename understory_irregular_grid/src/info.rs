// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-lived layout state of one grid and its position queries.

use hashbrown::HashMap;
use kurbo::Rect;

use crate::template::TrackLengths;
use crate::{Axis, GridMatrix};

/// Layout state shared across passes of one grid.
///
/// The [`GridMatrix`] and `line_heights` grow as rows are filled going
/// forward and are kept when scrolling back; they are a cache of everything
/// laid out so far. The remaining fields describe the realized range of the
/// most recent pass.
#[derive(Clone, Debug, Default)]
pub struct GridLayoutInfo {
    /// Scroll direction.
    pub axis: Axis,
    /// Number of cross-axis tracks.
    pub cross_count: usize,
    /// Length of each cross-axis track from the last pass.
    pub track_lengths: TrackLengths,
    /// Occupancy matrix.
    pub matrix: GridMatrix,
    /// Main-axis length of each fully measured row.
    pub line_heights: HashMap<usize, f64>,
    /// First realized item.
    pub start_index: usize,
    /// Last realized item, `None` before anything is realized.
    pub end_index: Option<usize>,
    /// First realized row (the anchor row).
    pub start_main_line: usize,
    /// Last realized row.
    pub end_main_line: usize,
    /// Leading edge of the anchor row relative to the viewport's leading edge.
    ///
    /// Negative when the anchor row is partly scrolled out.
    pub current_offset: f64,
    /// Anchor is row 0 and its leading edge is not scrolled out.
    pub reach_start: bool,
    /// The last item is realized and its trailing edge is inside the content box.
    pub reach_end: bool,
    /// The last item is realized, wherever its trailing edge is.
    pub last_item_realized: bool,
    /// Extra main-axis space after the content.
    pub content_end_padding: f64,
    /// Main size of the content box from the last pass.
    pub last_main_size: f64,
    /// Length of the realized rows including the gaps between them.
    pub total_height_of_items_in_view: f64,
    pub(crate) item_rects: HashMap<usize, Rect>,
}

impl GridLayoutInfo {
    /// Creates empty state for a grid scrolling along `axis`.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Drops every packed row and measurement and returns to the start.
    pub fn reset(&mut self) {
        self.matrix.clear();
        self.line_heights.clear();
        self.item_rects.clear();
        self.start_index = 0;
        self.end_index = None;
        self.start_main_line = 0;
        self.end_main_line = 0;
        self.current_offset = 0.0;
    }

    /// Height of `row`, if measured.
    #[must_use]
    pub fn line_height(&self, row: usize) -> Option<f64> {
        self.line_heights.get(&row).copied()
    }

    /// Moves the content by `delta` along the main axis.
    ///
    /// Negative values move the viewport forward through the content. The
    /// anchor is re-solved on the next measure pass.
    pub fn scroll_by(&mut self, delta: f64) {
        self.current_offset += delta;
    }

    /// Re-anchors at the row holding item `index`.
    ///
    /// Only items already packed can be targeted. If the row is covered by a
    /// taller item anchored above, the anchor moves up to that item's first
    /// row. Returns `false` when `index` has not been packed yet.
    pub fn jump_to_index(&mut self, index: usize) -> bool {
        let Some((mut row, _)) = self.matrix.position_of(index) else {
            return false;
        };
        loop {
            let top = self.matrix.top_of_row(row);
            if top >= row {
                break;
            }
            row = top;
        }
        self.start_main_line = row;
        self.start_index = self.matrix.first_item_in_row(row).unwrap_or(index);
        self.current_offset = 0.0;
        true
    }

    /// Anchor cell of item `index`, if packed.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        self.matrix.position_of(index)
    }

    /// Item covering (`row`, `col`).
    #[must_use]
    pub fn owner_at(&self, row: usize, col: usize) -> Option<usize> {
        self.matrix.owner_at(row, col)
    }

    /// Returns `true` if item `index` was placed by the last layout pass.
    #[must_use]
    pub fn is_realized(&self, index: usize) -> bool {
        self.item_rects.contains_key(&index)
    }

    /// Frame of item `index` from the last layout pass, or [`Rect::ZERO`].
    #[must_use]
    pub fn item_rect(&self, index: usize) -> Rect {
        self.item_rects.get(&index).copied().unwrap_or(Rect::ZERO)
    }

    /// Sum of realized row heights and the gaps between them.
    #[must_use]
    pub fn total_height_of_items_in_view(&self, main_gap: f64) -> f64 {
        let mut len = 0.0;
        let mut rows = 0_usize;
        for row in self.start_main_line..=self.end_main_line {
            if let Some(h) = self.line_height(row) {
                len += h + main_gap;
                rows += 1;
            }
        }
        if rows > 0 { len - main_gap } else { 0.0 }
    }

    /// Mean of measured row heights, or zero.
    #[must_use]
    pub fn average_line_height(&self) -> f64 {
        if self.line_heights.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.line_heights.values().sum();
        sum / self.line_heights.len() as f64
    }

    /// Distance from the start of the content to the viewport's leading edge.
    ///
    /// Unmeasured rows count as [`average_line_height`](Self::average_line_height).
    #[must_use]
    pub fn estimated_scroll_offset(&self, main_gap: f64) -> f64 {
        let avg = self.average_line_height();
        let before: f64 = (0..self.start_main_line)
            .map(|row| self.line_height(row).unwrap_or(avg) + main_gap)
            .sum();
        before - self.current_offset
    }

    /// Estimated main-axis length of all `item_count` items.
    ///
    /// Packed rows count with their measured height; items not packed yet
    /// are assumed to fill rows of `cross_count` items of average height.
    #[must_use]
    pub fn estimated_content_height(&self, main_gap: f64, item_count: usize) -> f64 {
        let avg = self.average_line_height();
        let packed_rows = self.matrix.last_row().map_or(0, |r| r + 1);
        let known: f64 = (0..packed_rows)
            .map(|row| self.line_height(row).unwrap_or(avg) + main_gap)
            .sum();
        let remaining = item_count.saturating_sub(self.matrix.item_count());
        let extra_rows = remaining.div_ceil(self.cross_count.max(1));
        let total = known + extra_rows as f64 * (avg + main_gap);
        if total > 0.0 { total - main_gap } else { 0.0 }
    }
}
