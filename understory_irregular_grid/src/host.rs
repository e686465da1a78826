// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host side of a layout pass: item measurement and placement.

use kurbo::{Point, Size};

use crate::LayoutConstraint;

/// Children of a grid, as seen by the layout algorithm.
///
/// Items are addressed by their flat index `0..len()`. The host owns the
/// actual views: it realizes an item on first [`measure`](Self::measure),
/// remembers the resolved size, and commits placements to its render tree.
pub trait GridItems {
    /// Total number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Realizes item `index` if needed and measures it against `constraint`.
    ///
    /// Returns the item's margin box size.
    fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> Size;

    /// Size resolved by the latest [`measure`](Self::measure) of `index`.
    fn measured_size(&self, index: usize) -> Option<Size>;

    /// Sets the final offset of item `index` and commits it to the render tree.
    fn place(&mut self, index: usize, origin: Point);

    /// Removes every item placed by the previous layout pass from the render tree.
    fn clear_placements(&mut self) {}

    /// Hint for how many off-screen items are worth keeping realized.
    fn set_cache_count(&mut self, count: usize) {
        let _ = count;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use alloc::vec::Vec;

    use hashbrown::HashMap;
    use kurbo::{Point, Size};

    use super::GridItems;
    use crate::{Axis, LayoutConstraint};

    /// Items with a fixed main-axis length each; cross size follows the constraint.
    #[derive(Debug, Default)]
    pub(crate) struct FixedItems {
        pub(crate) axis: Axis,
        pub(crate) main_lens: Vec<f64>,
        pub(crate) measured: HashMap<usize, Size>,
        pub(crate) measure_calls: usize,
        pub(crate) placed: Vec<(usize, Point)>,
        pub(crate) cache_count: usize,
    }

    impl FixedItems {
        pub(crate) fn uniform(count: usize, main_len: f64) -> Self {
            Self::with_lens(alloc::vec![main_len; count])
        }

        pub(crate) fn with_lens(main_lens: Vec<f64>) -> Self {
            Self {
                main_lens,
                ..Self::default()
            }
        }
    }

    impl GridItems for FixedItems {
        fn len(&self) -> usize {
            self.main_lens.len()
        }

        fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> Size {
            self.measure_calls += 1;
            let cross = match self.axis {
                Axis::Vertical => constraint.ideal_width,
                Axis::Horizontal => constraint.ideal_height,
            }
            .unwrap_or(0.0);
            let size = self.axis.pack_size(self.main_lens[index], cross);
            self.measured.insert(index, size);
            size
        }

        fn measured_size(&self, index: usize) -> Option<Size> {
            self.measured.get(&index).copied()
        }

        fn place(&mut self, index: usize, origin: Point) {
            self.placed.push((index, origin));
        }

        fn clear_placements(&mut self) {
            self.placed.clear();
        }

        fn set_cache_count(&mut self, count: usize) {
            self.cache_count = count;
        }
    }
}
