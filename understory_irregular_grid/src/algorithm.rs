// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass orchestration: measure the grid, find the anchor, fill, and place items.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Rect, Size};

use crate::template::{TrackLengths, parse_template, resolve_tracks};
use crate::{
    Axis, Cell, Dimension, FillParameters, Filler, GridItems, GridLayoutInfo, GridLayoutOptions,
    LayoutConstraint, RangeSolver, StartingRow,
};

/// Configuration of an irregular grid, read at the start of every pass.
#[derive(Debug)]
pub struct GridLayoutProps {
    /// Scroll direction.
    pub axis: Axis,
    /// Column template; used when the grid scrolls vertically.
    pub columns_template: Option<String>,
    /// Row template; used when the grid scrolls horizontally.
    pub rows_template: Option<String>,
    /// Gap between columns, relative to the content width.
    pub column_gap: Dimension,
    /// Gap between rows, relative to the content height.
    pub row_gap: Dimension,
    /// Padding between the frame and the content box.
    pub padding: Insets,
    /// Extra main-axis space after the last row.
    pub content_end_padding: f64,
    /// Off-screen rows worth keeping realized, as a multiple of the track count.
    pub cached_count: usize,
    /// Item sizing.
    pub options: GridLayoutOptions,
}

impl Default for GridLayoutProps {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            columns_template: None,
            rows_template: None,
            column_gap: Dimension::default(),
            row_gap: Dimension::default(),
            padding: Insets::ZERO,
            content_end_padding: 0.0,
            cached_count: 1,
            options: GridLayoutOptions::default(),
        }
    }
}

impl GridLayoutProps {
    /// Default configuration: one vertical track, no gaps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scroll direction.
    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the column template.
    #[must_use]
    pub fn with_columns_template(mut self, template: impl Into<String>) -> Self {
        self.columns_template = Some(template.into());
        self
    }

    /// Sets the row template.
    #[must_use]
    pub fn with_rows_template(mut self, template: impl Into<String>) -> Self {
        self.rows_template = Some(template.into());
        self
    }

    /// Sets the gap between columns.
    #[must_use]
    pub fn with_column_gap(mut self, gap: Dimension) -> Self {
        self.column_gap = gap;
        self
    }

    /// Sets the gap between rows.
    #[must_use]
    pub fn with_row_gap(mut self, gap: Dimension) -> Self {
        self.row_gap = gap;
        self
    }

    /// Sets the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the extra space after the last row.
    #[must_use]
    pub fn with_content_end_padding(mut self, padding: f64) -> Self {
        self.content_end_padding = padding;
        self
    }

    /// Sets the cache multiplier.
    #[must_use]
    pub fn with_cached_count(mut self, count: usize) -> Self {
        self.cached_count = count;
        self
    }

    /// Sets the item sizing options.
    #[must_use]
    pub fn with_options(mut self, options: GridLayoutOptions) -> Self {
        self.options = options;
        self
    }
}

/// Two-phase layout of a grid whose items may span several rows and columns.
///
/// [`measure`](Self::measure) sizes the grid, resolves the anchor row for
/// [`GridLayoutInfo::current_offset`] and packs items until the viewport is
/// covered. [`layout`](Self::layout) then places the realized items. Both
/// phases must see the same [`GridLayoutInfo`].
///
/// ```rust
/// use kurbo::{Point, Size};
/// use understory_irregular_grid::{
///     GridItems, GridLayoutInfo, GridLayoutProps, IrregularLayoutAlgorithm, LayoutConstraint,
/// };
///
/// struct Tiles(Vec<Option<Point>>);
///
/// impl GridItems for Tiles {
///     fn len(&self) -> usize {
///         self.0.len()
///     }
///     fn measure(&mut self, _index: usize, constraint: &LayoutConstraint) -> Size {
///         Size::new(constraint.ideal_width.unwrap_or(0.0), 40.0)
///     }
///     fn measured_size(&self, _index: usize) -> Option<Size> {
///         None
///     }
///     fn place(&mut self, index: usize, origin: Point) {
///         self.0[index] = Some(origin);
///     }
/// }
///
/// let props = GridLayoutProps::new().with_columns_template("1fr 1fr");
/// let mut info = GridLayoutInfo::default();
/// let mut tiles = Tiles(vec![None; 50]);
/// let mut algo = IrregularLayoutAlgorithm::new();
///
/// algo.measure(&mut info, &props, &LayoutConstraint::new(Size::new(200.0, 100.0)), &mut tiles);
/// algo.layout(&mut info, &props, &mut tiles);
///
/// assert_eq!(tiles.0[3], Some(Point::new(100.0, 40.0)));
/// assert!(tiles.0[10].is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct IrregularLayoutAlgorithm {
    cross_lens: TrackLengths,
    cross_gap: f64,
    main_gap: f64,
    frame_size: Size,
    content_size: Size,
}

impl IrregularLayoutAlgorithm {
    /// Creates an algorithm with no resolved tracks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track lengths resolved by the last measure.
    #[must_use]
    pub fn cross_lens(&self) -> &[f64] {
        &self.cross_lens
    }

    /// Gap between tracks; zero when the tracks were compressed.
    #[must_use]
    pub fn cross_gap(&self) -> f64 {
        self.cross_gap
    }

    /// Gap between rows.
    #[must_use]
    pub fn main_gap(&self) -> f64 {
        self.main_gap
    }

    /// Frame size resolved by the last measure.
    #[must_use]
    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Content size from the last measure, including the content end padding.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Measures the grid and packs the items needed to cover the viewport.
    ///
    /// Returns the frame size.
    pub fn measure<I: GridItems + ?Sized>(
        &mut self,
        info: &mut GridLayoutInfo,
        props: &GridLayoutProps,
        constraint: &LayoutConstraint,
        items: &mut I,
    ) -> Size {
        let main_size = self.measure_self(info, props, constraint);
        self.init(info, props);

        if items.len() < info.matrix.item_count() {
            tracing::debug!(
                items = items.len(),
                packed = info.matrix.item_count(),
                "item count shrank, resetting grid"
            );
            info.reset();
        }

        let mut res = self.find_starting_row(info, props);
        if info.current_offset < 0.0
            && RangeSolver::new(info, &props.options).is_exhausted(res, self.main_gap)
        {
            // Pack and measure the rows the scroll passes over, then solve again.
            tracing::debug!(
                row = res.row,
                remaining = -res.pos,
                "scrolled past packed rows, filling ahead"
            );
            self.fill_with_items(info, props, items, -info.current_offset);
            res = self.find_starting_row(info, props);
        }
        info.start_main_line = res.row;
        info.current_offset = res.pos;
        if let Some(first) = info.matrix.first_item_in_row(res.row) {
            info.start_index = first;
        }

        self.fill_with_items(info, props, items, main_size - res.pos);
        items.set_cache_count(props.cached_count * info.cross_count);

        tracing::debug!(
            start_row = info.start_main_line,
            end_row = info.end_main_line,
            start_index = info.start_index,
            end_index = ?info.end_index,
            offset = info.current_offset,
            "measured irregular grid"
        );
        self.frame_size
    }

    /// Anchor row for the current offset; row 0 when nothing is packed yet.
    fn find_starting_row(&self, info: &GridLayoutInfo, props: &GridLayoutProps) -> StartingRow {
        if info.matrix.has_row(info.start_main_line) {
            RangeSolver::new(info, &props.options).find_starting_row(self.main_gap)
        } else {
            StartingRow { row: 0, pos: 0.0 }
        }
    }

    /// Places every realized item and updates the scroll state in `info`.
    pub fn layout<I: GridItems + ?Sized>(
        &mut self,
        info: &mut GridLayoutInfo,
        props: &GridLayoutProps,
        items: &mut I,
    ) {
        items.clear_placements();
        self.layout_children(info, props.padding, items);
        self.update_layout_info(info, items.len());
    }

    /// Resolves frame and content size; returns the content's main size.
    fn measure_self(
        &mut self,
        info: &mut GridLayoutInfo,
        props: &GridLayoutProps,
        constraint: &LayoutConstraint,
    ) -> f64 {
        let axis = props.axis;
        self.frame_size = constraint.ideal_size();

        let pad = props.padding;
        let content = Size::new(
            (self.frame_size.width - pad.x0 - pad.x1).max(0.0),
            (self.frame_size.height - pad.y0 - pad.y1).max(0.0),
        );
        info.content_end_padding = props.content_end_padding.max(0.0);
        self.content_size = axis.pack_size(
            axis.main(content) + info.content_end_padding,
            axis.cross(content),
        );
        axis.main(self.content_size)
    }

    /// Resolves gaps and tracks, and drops packing that no longer matches them.
    fn init(&mut self, info: &mut GridLayoutInfo, props: &GridLayoutProps) {
        let axis = props.axis;
        let content = self.content_size;
        let (cross_gap, main_gap, template) = match axis {
            Axis::Vertical => (
                props.column_gap,
                props.row_gap,
                props.columns_template.as_deref(),
            ),
            Axis::Horizontal => (
                props.row_gap,
                props.column_gap,
                props.rows_template.as_deref(),
            ),
        };
        self.cross_gap = cross_gap.resolve(axis.cross(content)).max(0.0);
        self.main_gap = main_gap.resolve(axis.main(content)).max(0.0);

        let template = template.unwrap_or("");
        let tracks = parse_template(template).unwrap_or_else(|err| {
            tracing::warn!(%err, template, "invalid grid template, using a single track");
            Vec::new()
        });

        let cross_size = axis.cross(content);
        let sizes = resolve_tracks(&tracks, cross_size, self.cross_gap);
        self.cross_lens = sizes.lengths;
        if self.cross_lens.is_empty() {
            self.cross_lens.push(cross_size);
        }
        if sizes.compressed {
            self.cross_gap = 0.0;
        }

        let cross_count = self.cross_lens.len();
        if info.axis != axis || info.cross_count != cross_count {
            if !info.matrix.is_empty() {
                tracing::debug!(
                    from = info.cross_count,
                    to = cross_count,
                    "track count or axis changed, resetting grid"
                );
            }
            info.reset();
            info.axis = axis;
            info.cross_count = cross_count;
        } else if info.track_lengths != self.cross_lens {
            // Items change height with their width.
            info.line_heights.clear();
        }
        info.track_lengths.clone_from(&self.cross_lens);
    }

    fn fill_with_items<I: GridItems + ?Sized>(
        &self,
        info: &mut GridLayoutInfo,
        props: &GridLayoutProps,
        items: &mut I,
        target_len: f64,
    ) {
        info.end_index = info.start_index.checked_sub(1);
        info.end_main_line = info.start_main_line;

        let params = FillParameters {
            cross_lens: &self.cross_lens,
            target_len,
            cross_gap: self.cross_gap,
            main_gap: self.main_gap,
            percent_reference: self.content_size,
        };
        Filler::new(info, &props.options, items).fill(&params);
    }

    fn layout_children<I: GridItems + ?Sized>(
        &self,
        info: &mut GridLayoutInfo,
        padding: Insets,
        items: &mut I,
    ) {
        let axis = info.axis;
        let cross_pos = self.calculate_cross_positions(axis.cross_start_inset(padding));
        let mut main = info.current_offset + axis.main_start_inset(padding);

        info.item_rects.clear();
        let Some(end_index) = info.end_index else {
            return;
        };
        let start_index = info.start_index;

        for row in info.start_main_line..=info.end_main_line {
            if let Some(cells) = info.matrix.row(row) {
                for (&col, cell) in cells {
                    let Cell::Item(index) = *cell else {
                        continue;
                    };
                    if index < start_index || index > end_index {
                        continue;
                    }
                    let Some(&cross) = cross_pos.get(col) else {
                        continue;
                    };
                    let origin = axis.pack_point(main, cross);
                    let size = items.measured_size(index).unwrap_or(Size::ZERO);
                    info.item_rects.insert(index, Rect::from_origin_size(origin, size));
                    items.place(index, origin);
                }
            }
            if let Some(h) = info.line_height(row) {
                main += h + self.main_gap;
            }
        }
    }

    /// Leading cross-axis edge of every track, starting at `start`.
    fn calculate_cross_positions(&self, start: f64) -> TrackLengths {
        let mut pos = start;
        self.cross_lens
            .iter()
            .map(|len| {
                let p = pos;
                pos += len + self.cross_gap;
                p
            })
            .collect()
    }

    fn update_layout_info(&self, info: &mut GridLayoutInfo, item_count: usize) {
        let axis = info.axis;
        info.reach_start = info.start_main_line == 0 && info.current_offset >= 0.0;

        let last = item_count.checked_sub(1);
        info.last_item_realized = last.is_none() || info.end_index == last;
        info.reach_end = match last {
            None => true,
            Some(last) if info.last_item_realized => {
                let bottom = axis.main(self.frame_size) - info.content_end_padding;
                info.item_rects
                    .get(&last)
                    .is_some_and(|rect| axis.main_end(*rect) <= bottom)
            }
            Some(_) => false,
        };

        info.last_main_size = axis.main(self.content_size);
        info.total_height_of_items_in_view = info.total_height_of_items_in_view(self.main_gap);
    }
}
