// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse occupancy matrix recording which item covers which grid cell.
//!
//! Rows are indexed along the main (scroll) axis and columns along the cross
//! axis, independent of the grid's [`Axis`](crate::Axis). A cell is either
//! absent (not filled yet), the anchor of an item (its top-left cell), or
//! covered by an item anchored elsewhere.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use hashbrown::HashMap;

use crate::ItemSpan;

/// Content of a recorded cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Top-left cell of the item with this index.
    Item(usize),
    /// Covered by the item anchored at (`row`, `col`).
    Covered {
        /// Row of the owning anchor.
        row: usize,
        /// Column of the owning anchor.
        col: usize,
    },
}

impl Cell {
    /// Item index if this is an anchor cell.
    #[must_use]
    pub const fn item(self) -> Option<usize> {
        match self {
            Self::Item(idx) => Some(idx),
            Self::Covered { .. } => None,
        }
    }

    /// Returns `true` for cells covered by an item anchored elsewhere.
    #[must_use]
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered { .. })
    }
}

/// One row of the matrix: column → cell.
pub type MatrixRow = BTreeMap<usize, Cell>;

/// Sparse row → column → [`Cell`] map.
///
/// The matrix is a cache of everything packed so far and is never pruned
/// while scrolling. It also keeps an item → anchor lookup.
#[derive(Clone, Debug, Default)]
pub struct GridMatrix {
    rows: BTreeMap<usize, MatrixRow>,
    anchors: HashMap<usize, (usize, usize)>,
}

impl GridMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no row has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.anchors.clear();
    }

    /// Number of recorded rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the last recorded row.
    #[must_use]
    pub fn last_row(&self) -> Option<usize> {
        self.rows.last_key_value().map(|(r, _)| *r)
    }

    /// Returns `true` if `row` has been recorded, even if it holds no cells.
    #[must_use]
    pub fn has_row(&self, row: usize) -> bool {
        self.rows.contains_key(&row)
    }

    /// Cells of `row`, if recorded.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&MatrixRow> {
        self.rows.get(&row)
    }

    /// Iterates recorded rows in increasing order.
    pub fn rows(&self) -> btree_map::Iter<'_, usize, MatrixRow> {
        self.rows.iter()
    }

    /// Records an empty row if absent.
    pub fn ensure_row(&mut self, row: usize) {
        self.rows.entry(row).or_default();
    }

    /// Cell at (`row`, `col`), or `None` if nothing was recorded there.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(&row)?.get(&col).copied()
    }

    /// Returns `true` if nothing is recorded at (`row`, `col`).
    #[must_use]
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    /// Writes a single cell, overwriting what was there.
    ///
    /// No span validation is performed; see [`GridMatrix::place`].
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let prev = self.rows.entry(row).or_default().insert(col, cell);
        if let Some(Cell::Item(old)) = prev {
            if self.anchors.get(&old) == Some(&(row, col)) {
                self.anchors.remove(&old);
            }
        }
        if let Cell::Item(idx) = cell {
            self.anchors.insert(idx, (row, col));
        }
    }

    /// Writes item `index` at (`row`, `col`) and marks the rest of `span` as covered.
    pub fn place(&mut self, row: usize, col: usize, index: usize, span: ItemSpan) {
        for r in row..row + span.main {
            for c in col..col + span.cross {
                debug_assert!(
                    self.is_free(r, c),
                    "item {index} overlaps recorded cell ({r}, {c})"
                );
                self.set(r, c, Cell::Covered { row, col });
            }
        }
        self.set(row, col, Cell::Item(index));
    }

    /// Anchor cell of item `index`, if packed.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        self.anchors.get(&index).copied()
    }

    /// Item covering (`row`, `col`), resolving covered cells to their owner.
    #[must_use]
    pub fn owner_at(&self, row: usize, col: usize) -> Option<usize> {
        match self.get(row, col)? {
            Cell::Item(idx) => Some(idx),
            Cell::Covered { row, col } => self.get(row, col).and_then(Cell::item),
        }
    }

    /// Number of items packed.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.anchors.len()
    }

    /// First row of the tallest item reaching into `row` from above, or `row` itself.
    #[must_use]
    pub fn top_of_row(&self, row: usize) -> usize {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cells| cells.values())
            .filter_map(|cell| match *cell {
                Cell::Covered { row: top, .. } => Some(top),
                Cell::Item(_) => None,
            })
            .fold(row, usize::min)
    }

    /// Smallest item index anchored in `row`.
    #[must_use]
    pub fn first_item_in_row(&self, row: usize) -> Option<usize> {
        self.rows
            .get(&row)?
            .values()
            .filter_map(|cell| cell.item())
            .min()
    }
}
