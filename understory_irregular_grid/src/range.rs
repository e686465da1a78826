// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finds the anchor row after a scroll.
//!
//! The solver starts from the previous anchor and walks recorded row heights
//! only as far as the scroll distance requires, so a scroll costs time in the
//! number of rows passed over rather than in the total row count. A step
//! never lands inside an item spanning several rows.

use crate::{Cell, GridLayoutInfo, GridLayoutOptions};

/// Anchor row and the position of its leading edge in the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StartingRow {
    /// Row index.
    pub row: usize,
    /// Leading edge of `row` relative to the viewport; the new current offset.
    pub pos: f64,
}

/// Resolves the anchor row for the current offset.
///
/// The solver needs at least the previous anchor row recorded in the matrix;
/// callers handle the empty-matrix case themselves.
#[derive(Debug)]
pub struct RangeSolver<'a> {
    info: &'a GridLayoutInfo,
    options: &'a GridLayoutOptions,
}

impl<'a> RangeSolver<'a> {
    /// Creates a solver over `info`.
    #[must_use]
    pub fn new(info: &'a GridLayoutInfo, options: &'a GridLayoutOptions) -> Self {
        Self { info, options }
    }

    /// Finds the anchor row.
    ///
    /// A non-positive offset means the viewport moved forward (or not at all)
    /// and is solved from the previous anchor downwards. A positive offset
    /// means the anchor's leading edge moved into view and earlier rows are
    /// needed.
    #[must_use]
    pub fn find_starting_row(&self, main_gap: f64) -> StartingRow {
        if self.info.current_offset <= 0.0 {
            self.solve_forward(main_gap)
        } else {
            self.solve_backward(main_gap)
        }
    }

    /// Consumes whole row groups while their length fits in the scrolled distance.
    ///
    /// Every consumed row counts its height plus one gap, row 0 included.
    /// That is the distance the layout pass advances per row, so the result
    /// round-trips with [`solve_backward`](Self::solve_backward). A walk that
    /// skipped the gap after row 0 would land one gap short.
    ///
    /// The anchor only moves onto packed rows. When the walk runs out of
    /// packed or measured rows, the remaining distance stays in the offset;
    /// see [`is_exhausted`](Self::is_exhausted).
    #[must_use]
    pub fn solve_forward(&self, main_gap: f64) -> StartingRow {
        let mut idx = self.info.start_main_line;
        let start = -self.info.current_offset;

        let mut len = 0.0;
        while len < start {
            let Some((rows, add)) = self.add_next_rows(main_gap, idx) else {
                tracing::debug!(row = idx, "forward solve ran past measured rows");
                break;
            };
            if len + add > start {
                break;
            }
            if !self.info.matrix.has_row(idx + rows) {
                tracing::debug!(row = idx + rows, "forward solve ran past packed rows");
                break;
            }
            len += add;
            idx += rows;
        }

        StartingRow {
            row: idx,
            pos: self.info.current_offset + len,
        }
    }

    /// Returns `true` if the forward result `res` stopped short of the scroll
    /// distance because the rows past it are not packed or not measured.
    #[must_use]
    pub fn is_exhausted(&self, res: StartingRow, main_gap: f64) -> bool {
        res.pos < 0.0
            && self
                .add_next_rows(main_gap, res.row)
                .is_none_or(|(_, add)| res.pos + add <= 0.0)
    }

    /// Rows starting at `row` that must be passed over together, and their length.
    ///
    /// Items anchored in the group may span further down; the group grows
    /// until no item anchored in it reaches past its end. The length is the
    /// sum of the group's row heights, each followed by one gap. Returns
    /// `None` if a row of the group is not recorded or not measured.
    #[must_use]
    pub fn add_next_rows(&self, main_gap: f64, row: usize) -> Option<(usize, f64)> {
        let matrix = &self.info.matrix;
        if !matrix.has_row(row) {
            return None;
        }

        let mut end = row + 1;
        let mut r = row;
        while r < end {
            for cell in matrix.row(r).into_iter().flat_map(|cells| cells.values()) {
                if let Cell::Item(index) = *cell {
                    let span = self
                        .options
                        .span_of(index, self.info.axis, self.info.cross_count);
                    end = end.max(r + span.main);
                }
            }
            r += 1;
        }

        let mut len = 0.0;
        for r in row..end {
            len += self.info.line_height(r)? + main_gap;
        }
        Some((end - row, len))
    }

    /// Walks back row by row until the positive offset is covered.
    ///
    /// If the row reached is covered by an item anchored above it, the
    /// anchor moves up to that item's first row and the offset is reduced by
    /// the rows passed over, so the content does not move.
    #[must_use]
    pub fn solve_backward(&self, main_gap: f64) -> StartingRow {
        let offset = self.info.current_offset;
        let mut idx = self.info.start_main_line;
        let mut len = 0.0;
        while idx > 0 && len < offset {
            idx -= 1;
            len += self.row_height(idx) + main_gap;
        }

        let mut pos = offset - len;
        loop {
            let rows = self.check_multi_row(idx);
            if rows <= 1 {
                break;
            }
            let top = idx + 1 - rows;
            for r in top..idx {
                pos -= self.row_height(r) + main_gap;
            }
            idx = top;
        }

        StartingRow { row: idx, pos }
    }

    /// Number of rows, counting up from `row` inclusive, taken by the tallest
    /// item that reaches into `row` from above. `1` if no item does.
    #[must_use]
    pub fn check_multi_row(&self, row: usize) -> usize {
        row - self.info.matrix.top_of_row(row) + 1
    }

    /// Height of `row`, or the average measured height if it has none.
    fn row_height(&self, row: usize) -> f64 {
        self.info.line_height(row).unwrap_or_else(|| {
            tracing::debug!(row, "backward solve over unmeasured row");
            self.info.average_line_height()
        })
    }
}
