// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host shared by the integration tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use kurbo::{Point, Size};
use understory_irregular_grid::{Axis, GridItems, LayoutConstraint};

/// Items with a fixed main-axis length; the cross size follows the constraint.
#[derive(Debug, Default)]
pub(crate) struct Items {
    pub(crate) axis: Axis,
    pub(crate) main_lens: Vec<f64>,
    pub(crate) sizes: Vec<Option<Size>>,
    pub(crate) placed: Vec<(usize, Point)>,
    pub(crate) measure_calls: usize,
}

impl Items {
    pub(crate) fn new(axis: Axis, main_lens: Vec<f64>) -> Self {
        Self {
            axis,
            sizes: vec![None; main_lens.len()],
            main_lens,
            ..Self::default()
        }
    }

    pub(crate) fn uniform(count: usize, main_len: f64) -> Self {
        Self::new(Axis::Vertical, vec![main_len; count])
    }

    pub(crate) fn origin_of(&self, index: usize) -> Option<Point> {
        self.placed.iter().find(|(i, _)| *i == index).map(|(_, p)| *p)
    }

    pub(crate) fn placed_indices(&self) -> Vec<usize> {
        self.placed.iter().map(|(i, _)| *i).collect()
    }
}

impl GridItems for Items {
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
        self.sizes[index] = Some(size);
        size
    }

    fn measured_size(&self, index: usize) -> Option<Size> {
        self.sizes.get(index).copied().flatten()
    }

    fn place(&mut self, index: usize, origin: Point) {
        self.placed.push((index, origin));
    }

    fn clear_placements(&mut self) {
        self.placed.clear();
    }
}
