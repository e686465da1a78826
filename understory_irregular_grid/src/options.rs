// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item sizing options and the item span resolver.

use alloc::boxed::Box;
use core::fmt;

use hashbrown::HashSet;

use crate::{Axis, GridItemSize, ItemSpan};

/// Callback returning the size of an irregular item.
pub type SizeByIndex = dyn Fn(usize) -> GridItemSize;

/// Sizing options for irregular grids.
///
/// Items whose index is not in `irregular_indexes` take `regular_size`.
/// Irregular items ask `get_size_by_index`; without a callback they span the
/// whole cross axis for one row.
pub struct GridLayoutOptions {
    /// Size of every item not listed in `irregular_indexes`.
    pub regular_size: GridItemSize,
    /// Indices of items whose size deviates from `regular_size`.
    pub irregular_indexes: HashSet<usize>,
    /// Size of an irregular item, by index.
    pub get_size_by_index: Option<Box<SizeByIndex>>,
}

impl GridLayoutOptions {
    /// Options with every item regular.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regular_size: GridItemSize::ONE,
            irregular_indexes: HashSet::new(),
            get_size_by_index: None,
        }
    }

    /// Marks `indexes` as irregular.
    #[must_use]
    pub fn with_irregular_indexes(mut self, indexes: impl IntoIterator<Item = usize>) -> Self {
        self.irregular_indexes.extend(indexes);
        self
    }

    /// Sets the size callback for irregular items.
    #[must_use]
    pub fn with_size_by_index(mut self, f: impl Fn(usize) -> GridItemSize + 'static) -> Self {
        self.get_size_by_index = Some(Box::new(f));
        self
    }

    /// Sets the size of regular items.
    #[must_use]
    pub fn with_regular_size(mut self, size: GridItemSize) -> Self {
        self.regular_size = size;
        self
    }

    /// Returns `true` if `index` is irregular.
    #[must_use]
    pub fn is_irregular(&self, index: usize) -> bool {
        self.irregular_indexes.contains(&index)
    }

    /// Resolves the axis-normalized span of item `index`.
    ///
    /// The user size is read in screen terms and mapped so that `main` counts
    /// rows along `axis` and `cross` counts tracks. The cross span is clamped
    /// to `cross_count`; zero spans are raised to one. This never fails.
    #[must_use]
    pub fn span_of(&self, index: usize, axis: Axis, cross_count: usize) -> ItemSpan {
        let cross_count = cross_count.max(1);
        let size = if self.is_irregular(index) {
            match &self.get_size_by_index {
                Some(f) => f(index),
                // One line across the whole cross axis.
                None => return ItemSpan::new(1, cross_count),
            }
        } else {
            self.regular_size
        };

        let (main, cross) = match axis {
            Axis::Vertical => (size.rows, size.columns),
            Axis::Horizontal => (size.columns, size.rows),
        };
        ItemSpan::new(main.max(1), cross.clamp(1, cross_count))
    }
}

impl Default for GridLayoutOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GridLayoutOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridLayoutOptions")
            .field("regular_size", &self.regular_size)
            .field("irregular_indexes", &self.irregular_indexes.len())
            .field("get_size_by_index", &self.get_size_by_index.is_some())
            .finish()
    }
}
