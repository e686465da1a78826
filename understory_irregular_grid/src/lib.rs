// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_irregular_grid --heading-base-level=0

//! Understory Irregular Grid: virtualized grid layout with spanning items.
//!
//! This crate lays out a scrollable grid whose items may span several rows
//! and columns. Only the items needed to cover the viewport are measured and
//! placed, while a sparse record of everything packed so far keeps scrolling
//! back cheap and stable.
//!
//! The core concepts are:
//!
//! - [`GridMatrix`]: a sparse occupancy matrix mapping each grid cell to the
//!   item that covers it ([`Cell::Item`] at an item's top-left cell,
//!   [`Cell::Covered`] elsewhere in its span).
//! - [`GridLayoutOptions`]: per-item sizing. Items listed as irregular get a
//!   [`GridItemSize`] from a callback; all others share one regular size.
//! - [`Filler`]: packs items first-fit in index order, measures them through
//!   the host, and records row heights until a target length is covered.
//! - [`RangeSolver`]: turns a scroll offset into an anchor row, never
//!   splitting an item that spans several rows.
//! - [`IrregularLayoutAlgorithm`]: the per-pass orchestrator tying the
//!   pieces together in a measure phase and a layout phase.
//! - [`GridLayoutInfo`]: the long-lived state a host keeps per grid, plus
//!   scroll and position queries.
//!
//! Rows always run along the scroll (main) axis and columns along the cross
//! axis. For [`Axis::Horizontal`] grids the user's rows and columns swap
//! before packing.
//!
//! This crate does not own any views. Hosts implement [`GridItems`] to
//! measure and place items by index, and call [`GridLayoutInfo::scroll_by`]
//! before the next pass when the user scrolls.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_irregular_grid::{
//!     GridItemSize, GridItems, GridLayoutInfo, GridLayoutOptions, GridLayoutProps,
//!     IrregularLayoutAlgorithm, LayoutConstraint,
//! };
//!
//! #[derive(Default)]
//! struct Cards {
//!     sizes: Vec<Option<Size>>,
//!     origins: Vec<Option<Point>>,
//! }
//!
//! impl GridItems for Cards {
//!     fn len(&self) -> usize {
//!         self.sizes.len()
//!     }
//!     fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> Size {
//!         // Square cards.
//!         let w = constraint.ideal_width.unwrap_or(0.0);
//!         let size = Size::new(w, w);
//!         self.sizes[index] = Some(size);
//!         size
//!     }
//!     fn measured_size(&self, index: usize) -> Option<Size> {
//!         self.sizes[index]
//!     }
//!     fn place(&mut self, index: usize, origin: Point) {
//!         self.origins[index] = Some(origin);
//!     }
//! }
//!
//! // Every fifth card is a 1 × 3 banner.
//! let options = GridLayoutOptions::new()
//!     .with_irregular_indexes((0..100).step_by(5))
//!     .with_size_by_index(|_| GridItemSize::new(1, 3));
//! let props = GridLayoutProps::new()
//!     .with_columns_template("1fr 1fr 1fr")
//!     .with_options(options);
//!
//! let mut cards = Cards {
//!     sizes: vec![None; 100],
//!     origins: vec![None; 100],
//! };
//! let mut info = GridLayoutInfo::default();
//! let mut algo = IrregularLayoutAlgorithm::new();
//! let viewport = LayoutConstraint::new(Size::new(300.0, 400.0));
//!
//! algo.measure(&mut info, &props, &viewport, &mut cards);
//! algo.layout(&mut info, &props, &mut cards);
//! assert_eq!(info.position_of(0), Some((0, 0)));
//! assert_eq!(info.position_of(1), Some((1, 0)));
//!
//! // Scroll down and lay out again.
//! info.scroll_by(-350.0);
//! algo.measure(&mut info, &props, &viewport, &mut cards);
//! algo.layout(&mut info, &props, &mut cards);
//! assert!(info.start_main_line > 0);
//! assert!(info.current_offset <= 0.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod algorithm;
mod filler;
mod host;
mod info;
mod matrix;
mod options;
mod range;
mod template;
mod types;

pub use algorithm::{GridLayoutProps, IrregularLayoutAlgorithm};
pub use filler::{FillParameters, Filler};
pub use host::GridItems;
pub use info::GridLayoutInfo;
pub use matrix::{Cell, GridMatrix, MatrixRow};
pub use options::{GridLayoutOptions, SizeByIndex};
pub use range::{RangeSolver, StartingRow};
pub use template::{
    MAX_TRACKS, TemplateError, Track, TrackLengths, TrackSizes, parse_template, resolve_tracks,
};
pub use types::{Axis, Dimension, GridItemSize, ItemSpan, LayoutConstraint};
