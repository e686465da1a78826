// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: scroll axis, item sizes and spans, constraints, and dimensions.

use kurbo::{Insets, Point, Rect, Size};

/// Scroll direction of a grid.
///
/// The main axis is the scroll direction; the cross axis is divided into tracks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rows stack top to bottom; tracks are columns.
    #[default]
    Vertical,
    /// Rows stack left to right; tracks are rows.
    Horizontal,
}

impl Axis {
    /// Main-axis component of `size`.
    #[must_use]
    pub const fn main(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// Cross-axis component of `size`.
    #[must_use]
    pub const fn cross(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.width,
            Self::Horizontal => size.height,
        }
    }

    /// Builds a [`Size`] from main and cross components.
    #[must_use]
    pub const fn pack_size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Vertical => Size::new(cross, main),
            Self::Horizontal => Size::new(main, cross),
        }
    }

    /// Builds a [`Point`] from main and cross components.
    #[must_use]
    pub const fn pack_point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Vertical => Point::new(cross, main),
            Self::Horizontal => Point::new(main, cross),
        }
    }

    /// Trailing edge of `rect` along the main axis.
    #[must_use]
    pub const fn main_end(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y1,
            Self::Horizontal => rect.x1,
        }
    }

    /// Leading inset along the main axis.
    #[must_use]
    pub const fn main_start_inset(self, insets: Insets) -> f64 {
        match self {
            Self::Vertical => insets.y0,
            Self::Horizontal => insets.x0,
        }
    }

    /// Leading inset along the cross axis.
    #[must_use]
    pub const fn cross_start_inset(self, insets: Insets) -> f64 {
        match self {
            Self::Vertical => insets.x0,
            Self::Horizontal => insets.y0,
        }
    }
}

/// Size of a grid item as configured by the user, in rows × columns.
///
/// `rows` and `columns` are in screen terms: for a vertical grid rows run
/// along the main axis, for a horizontal grid they run along the cross axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridItemSize {
    /// Number of rows the item occupies.
    pub rows: usize,
    /// Number of columns the item occupies.
    pub columns: usize,
}

impl GridItemSize {
    /// A single cell.
    pub const ONE: Self = Self {
        rows: 1,
        columns: 1,
    };

    /// Creates a new size.
    #[must_use]
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

impl Default for GridItemSize {
    fn default() -> Self {
        Self::ONE
    }
}

/// Axis-normalized span of an item.
///
/// `main` counts rows of the occupancy matrix (along the scroll direction) and
/// `cross` counts tracks, regardless of the grid's [`Axis`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemSpan {
    /// Number of matrix rows covered.
    pub main: usize,
    /// Number of tracks covered.
    pub cross: usize,
}

impl ItemSpan {
    /// Creates a new span.
    #[must_use]
    pub const fn new(main: usize, cross: usize) -> Self {
        Self { main, cross }
    }
}

/// A length that is either absolute or relative to a reference length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Dimension {
    /// Logical pixels.
    Px(f64),
    /// Percentage of the reference length, where `100.0` is the whole reference.
    Percent(f64),
}

impl Dimension {
    /// Resolves against `reference`.
    #[must_use]
    pub fn resolve(self, reference: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => reference * p / 100.0,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Size constraint handed to the grid and to each item it measures.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutConstraint {
    /// Largest size allowed. Components may be infinite.
    pub max_size: Size,
    /// Reference size for percentage lengths.
    pub percent_reference: Size,
    /// Forced width, if any.
    pub ideal_width: Option<f64>,
    /// Forced height, if any.
    pub ideal_height: Option<f64>,
}

impl LayoutConstraint {
    /// A constraint bounded by `max_size`, which also serves as percent reference.
    #[must_use]
    pub const fn new(max_size: Size) -> Self {
        Self {
            max_size,
            percent_reference: max_size,
            ideal_width: None,
            ideal_height: None,
        }
    }

    /// Forces both components of the resolved size.
    #[must_use]
    pub const fn with_ideal_size(mut self, size: Size) -> Self {
        self.ideal_width = Some(size.width);
        self.ideal_height = Some(size.height);
        self
    }

    /// Constraint for an item occupying `cross_len` along the cross axis.
    ///
    /// The cross axis is fixed to `cross_len`; the main axis is unbounded.
    #[must_use]
    pub fn for_item(axis: Axis, cross_len: f64, percent_reference: Size) -> Self {
        match axis {
            Axis::Vertical => Self {
                max_size: Size::new(cross_len, f64::INFINITY),
                percent_reference: Size::new(cross_len, percent_reference.height),
                ideal_width: Some(cross_len),
                ideal_height: None,
            },
            Axis::Horizontal => Self {
                max_size: Size::new(f64::INFINITY, cross_len),
                percent_reference: Size::new(percent_reference.width, cross_len),
                ideal_width: None,
                ideal_height: Some(cross_len),
            },
        }
    }

    /// The size a container fills under this constraint.
    ///
    /// Forced components win; otherwise the max size is used. Infinite
    /// components fall back to the percent reference, then to zero.
    #[must_use]
    pub fn ideal_size(&self) -> Size {
        let pick = |ideal: Option<f64>, max: f64, reference: f64| {
            let v = ideal.unwrap_or(max);
            if v.is_finite() {
                v.max(0.0)
            } else if reference.is_finite() {
                reference.max(0.0)
            } else {
                0.0
            }
        };
        Size::new(
            pick(
                self.ideal_width,
                self.max_size.width,
                self.percent_reference.width,
            ),
            pick(
                self.ideal_height,
                self.max_size.height,
                self.percent_reference.height,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Dimension, LayoutConstraint};
    use kurbo::{Insets, Size};

    #[test]
    fn axis_projects_components() {
        let s = Size::new(30.0, 80.0);
        assert_eq!(Axis::Vertical.main(s), 80.0);
        assert_eq!(Axis::Vertical.cross(s), 30.0);
        assert_eq!(Axis::Horizontal.main(s), 30.0);
        assert_eq!(Axis::Horizontal.pack_size(1.0, 2.0), Size::new(1.0, 2.0));
        assert_eq!(Axis::Vertical.pack_size(1.0, 2.0), Size::new(2.0, 1.0));

        let pad = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Axis::Vertical.main_start_inset(pad), 2.0);
        assert_eq!(Axis::Horizontal.cross_start_inset(pad), 2.0);
    }

    #[test]
    fn dimension_resolves_percent() {
        assert_eq!(Dimension::Px(7.0).resolve(100.0), 7.0);
        assert_eq!(Dimension::Percent(25.0).resolve(200.0), 50.0);
    }

    #[test]
    fn item_constraint_fixes_cross_axis() {
        let c = LayoutConstraint::for_item(Axis::Vertical, 40.0, Size::new(100.0, 300.0));
        assert_eq!(c.ideal_width, Some(40.0));
        assert_eq!(c.ideal_height, None);
        assert!(c.max_size.height.is_infinite());
        assert_eq!(c.percent_reference, Size::new(40.0, 300.0));
    }

    #[test]
    fn ideal_size_prefers_forced_then_max_then_reference() {
        let mut c = LayoutConstraint::new(Size::new(100.0, f64::INFINITY));
        c.percent_reference = Size::new(100.0, 500.0);
        assert_eq!(c.ideal_size(), Size::new(100.0, 500.0));
        let c = c.with_ideal_size(Size::new(50.0, 60.0));
        assert_eq!(c.ideal_size(), Size::new(50.0, 60.0));
    }
}
