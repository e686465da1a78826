// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward packing of items into the occupancy matrix.
//!
//! A [`Filler`] walks items in index order starting at the anchor row. Items
//! already recorded in the matrix are replayed; new items are packed first-fit,
//! left to right and top to bottom, never revisiting an earlier row. Every
//! item passed over is measured so that row heights stay current.

use hashbrown::HashMap;
use kurbo::Size;

use crate::{Cell, GridItems, GridLayoutInfo, GridLayoutOptions, ItemSpan, LayoutConstraint};

/// Inputs of one [`Filler::fill`] call.
#[derive(Clone, Debug)]
pub struct FillParameters<'a> {
    /// Length of each cross-axis track.
    pub cross_lens: &'a [f64],
    /// Main-axis length to fill, measured from the anchor row's leading edge.
    pub target_len: f64,
    /// Gap between adjacent tracks.
    pub cross_gap: f64,
    /// Gap between adjacent rows.
    pub main_gap: f64,
    /// Reference size for percentage lengths inside items.
    pub percent_reference: Size,
}

/// Packs and measures items until a target length is covered.
///
/// A filler lives for one fill operation. Its cursor starts just before the
/// item at [`GridLayoutInfo::start_index`], so repeated fills replay known
/// rows before packing new ones.
#[derive(Debug)]
pub struct Filler<'a, I: GridItems + ?Sized> {
    info: &'a mut GridLayoutInfo,
    options: &'a GridLayoutOptions,
    items: &'a mut I,
    /// Main-axis length of the rows completed so far.
    length: f64,
    /// Rows below this have had their height recomputed by this fill.
    fresh_until: usize,
    /// Heights this fill replaced, by row.
    replaced: HashMap<usize, f64>,
    row: usize,
    /// `None` means before the first column of `row`.
    col: Option<usize>,
}

impl<'a, I: GridItems + ?Sized> Filler<'a, I> {
    /// Creates a filler positioned before the first realized item.
    pub fn new(info: &'a mut GridLayoutInfo, options: &'a GridLayoutOptions, items: &'a mut I) -> Self {
        let mut filler = Self {
            row: info.start_main_line,
            info,
            options,
            items,
            length: 0.0,
            fresh_until: 0,
            replaced: HashMap::new(),
            col: None,
        };
        filler.init_pos();
        filler
    }

    fn init_pos(&mut self) {
        let row = self.info.start_main_line;
        let Some(cells) = self.info.matrix.row(row) else {
            // Nothing packed yet.
            return;
        };
        let start = self.info.start_index;
        if let Some((&col, _)) = cells.iter().find(|(_, cell)| **cell == Cell::Item(start)) {
            self.row = row;
            // The first advance lands on the start item.
            self.col = col.checked_sub(1);
        }
    }

    /// Current cursor as (row, column); the column is `None` before column 0.
    #[must_use]
    pub fn cursor(&self) -> (usize, Option<usize>) {
        (self.row, self.col)
    }

    /// Main-axis length filled so far.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Fills items until `params.target_len` is exceeded or items run out.
    ///
    /// Returns the length of all completed rows and the gaps between them.
    /// The row the cursor ends on is not counted. Extends the matrix and row
    /// heights and updates [`GridLayoutInfo::end_index`] and
    /// [`GridLayoutInfo::end_main_line`].
    ///
    /// Completed rows get heights from this fill's measurements alone. When
    /// the target stops the fill, the row it ends on is only partly measured
    /// and keeps its previous height if that was larger.
    pub fn fill(&mut self, params: &FillParameters<'_>) -> f64 {
        while !self.is_full(params.target_len) {
            let prev_row = self.row;
            let index = self.info.end_index.map_or(0, |e| e + 1);
            self.info.end_index = Some(index);
            if !self.find_next_item(index) {
                self.fill_one(index);
            }

            if self.row > prev_row {
                self.update_length(prev_row, params.main_gap);
            }

            self.measure_new_item(params, index);
        }
        if self.length > params.target_len {
            // Rows from the cursor on were only partly measured.
            for (&row, &old) in &self.replaced {
                if row >= self.row
                    && let Some(h) = self.info.line_heights.get_mut(&row)
                {
                    *h = h.max(old);
                }
            }
        }
        self.info.end_main_line = self.row;
        self.length
    }

    fn is_full(&self, target_len: f64) -> bool {
        let count = self.items.len();
        self.length > target_len
            || count == 0
            || self.info.end_index.is_some_and(|end| end + 1 >= count)
    }

    /// Packs item `index` at the first position that fits, starting at the cursor row.
    fn fill_one(&mut self, index: usize) {
        let span = self
            .options
            .span_of(index, self.info.axis, self.info.cross_count);

        let mut row = self.row;
        let col = loop {
            if let Some(col) = self.fit_item(row, span) {
                break col;
            }
            row += 1;
        };

        self.info.matrix.ensure_row(row);
        self.info.matrix.place(row, col, index, span);
        tracing::trace!(index, row, col, main = span.main, cross = span.cross, "packed item");

        self.row = row;
        self.col = Some(col);
    }

    /// First column in `row` where an item of `span` fits, or `None`.
    ///
    /// A free block must be unrecorded in every row the item would cover.
    /// An unrecorded row always fits at column 0.
    #[must_use]
    pub fn fit_item(&self, row: usize, span: ItemSpan) -> Option<usize> {
        let matrix = &self.info.matrix;
        let cross_count = self.info.cross_count;
        let cells = match matrix.row(row) {
            Some(cells) if !cells.is_empty() => cells,
            _ => return Some(0),
        };
        if cells.len() + span.cross > cross_count {
            return None;
        }
        (0..=cross_count - span.cross).find(|&start| {
            (row..row + span.main)
                .all(|r| (start..start + span.cross).all(|c| matrix.is_free(r, c)))
        })
    }

    /// Moves the cursor to the recorded item `target`.
    ///
    /// Advances cell by cell while cells are recorded. If the scan runs off
    /// recorded data, an item that first-fit placed left of its predecessor
    /// is still found through the matrix's anchor lookup.
    pub fn find_next_item(&mut self, target: usize) -> bool {
        while self.advance_pos() {
            if self.info.matrix.get(self.row, self.col.unwrap_or(0)) == Some(Cell::Item(target)) {
                return true;
            }
        }
        if let Some((row, col)) = self.info.matrix.position_of(target) {
            self.row = row;
            self.col = Some(col);
            return true;
        }
        false
    }

    /// Steps the cursor one column, wrapping to the next row.
    ///
    /// Returns whether the new cell is recorded in the matrix. The cursor
    /// moves either way.
    pub fn advance_pos(&mut self) -> bool {
        let next = self.col.map_or(0, |c| c + 1);
        if next >= self.info.cross_count {
            self.row += 1;
            self.col = Some(0);
        } else {
            self.col = Some(next);
        }
        self.info.matrix.get(self.row, self.col.unwrap_or(0)).is_some()
    }

    /// Adds rows `prev_row..self.row` to the filled length.
    fn update_length(&mut self, prev_row: usize, main_gap: f64) {
        for row in prev_row..self.row {
            self.length += self.info.line_height(row).unwrap_or(0.0) + main_gap;
        }
        if prev_row == self.info.start_main_line {
            // No gap above the first row.
            self.length -= main_gap;
        }
    }

    /// Measures item `index` at the cursor and raises the heights of the rows it covers.
    ///
    /// The first item this fill measures in a row replaces the row's cached
    /// height, so rows shrink when their items do. Rows the fill stops in
    /// keep the larger height, see [`fill`](Self::fill).
    fn measure_new_item(&mut self, params: &FillParameters<'_>, index: usize) {
        let axis = self.info.axis;
        let span = self.options.span_of(index, axis, self.info.cross_count);
        let col = self.col.unwrap_or(0);

        let end = (col + span.cross).min(params.cross_lens.len());
        let tracks: f64 = params.cross_lens.get(col..end).unwrap_or(&[]).iter().sum();
        let cross_len = tracks + params.cross_gap * (span.cross - 1) as f64;

        let constraint = LayoutConstraint::for_item(axis, cross_len, params.percent_reference);
        let size = self.items.measure(index, &constraint);

        // Only one box height is known, so it is spread evenly over the rows.
        let main_len = axis.main(size);
        let per_row =
            (main_len - params.main_gap * (span.main - 1) as f64) / span.main as f64;
        for row in self.row..self.row + span.main {
            if row < self.fresh_until {
                let h = self.info.line_heights.entry(row).or_insert(0.0);
                *h = h.max(per_row);
            } else if let Some(old) = self.info.line_heights.insert(row, per_row) {
                self.replaced.insert(row, old);
            }
        }
        self.fresh_until = self.fresh_until.max(self.row + span.main);
    }
}
