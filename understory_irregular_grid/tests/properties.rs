// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing and scroll-solving properties over random grids.

mod common;

use common::Items;
use kurbo::Size;
use proptest::prelude::*;
use understory_irregular_grid::{
    Axis, Cell, FillParameters, Filler, GridItemSize, GridLayoutInfo, GridLayoutOptions,
    MatrixRow, RangeSolver,
};

/// Track count, row gap, and per item (rows, columns, per-row height).
#[derive(Clone, Debug)]
struct Grid {
    cross_count: usize,
    gap: f64,
    items: Vec<(usize, usize, u32)>,
}

impl Grid {
    fn options(&self) -> GridLayoutOptions {
        let sizes: Vec<GridItemSize> = self
            .items
            .iter()
            .map(|&(rows, columns, _)| GridItemSize::new(rows, columns))
            .collect();
        GridLayoutOptions::new()
            .with_irregular_indexes(0..sizes.len())
            .with_size_by_index(move |i| sizes[i])
    }

    /// Main lengths chosen so every spanned row gets an exact integer height.
    fn host(&self) -> Items {
        let lens = self
            .items
            .iter()
            .map(|&(rows, _, h)| f64::from(h) * rows as f64 + self.gap * (rows - 1) as f64)
            .collect();
        Items::new(Axis::Vertical, lens)
    }

    fn pack(&self) -> (GridLayoutInfo, GridLayoutOptions) {
        let options = self.options();
        let mut info = GridLayoutInfo::new(Axis::Vertical);
        info.cross_count = self.cross_count;
        let mut host = self.host();
        fill(&mut info, &options, &mut host, self.gap);
        (info, options)
    }
}

fn fill(info: &mut GridLayoutInfo, options: &GridLayoutOptions, host: &mut Items, gap: f64) {
    let cross_lens = vec![50.0; info.cross_count];
    let params = FillParameters {
        cross_lens: &cross_lens,
        target_len: f64::INFINITY,
        cross_gap: 0.0,
        main_gap: gap,
        percent_reference: Size::new(400.0, 800.0),
    };
    Filler::new(info, options, host).fill(&params);
}

fn snapshot(info: &GridLayoutInfo) -> Vec<(usize, MatrixRow)> {
    info.matrix
        .rows()
        .map(|(row, cells)| (*row, cells.clone()))
        .collect()
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1_usize..=5, 0_u32..=20).prop_flat_map(|(cross_count, gap)| {
        prop::collection::vec((1_usize..=3, 1_usize..=5, 1_u32..=60), 0..60).prop_map(
            move |items| Grid {
                cross_count,
                gap: f64::from(gap),
                items,
            },
        )
    })
}

/// Rows of 1-row items whose widths partition the tracks exactly, so the
/// packed matrix has no free cells.
fn arb_full_rows() -> impl Strategy<Value = Grid> {
    (1_usize..=5).prop_flat_map(|cross_count| {
        prop::collection::vec(0_u32..(1 << (cross_count - 1)), 1..20).prop_map(move |cuts| {
            let mut items = Vec::new();
            for cut in cuts {
                let mut width = 1;
                for boundary in 1..cross_count {
                    if cut & (1 << (boundary - 1)) != 0 {
                        items.push((1, width, 10));
                        width = 1;
                    } else {
                        width += 1;
                    }
                }
                items.push((1, width, 10));
            }
            Grid {
                cross_count,
                gap: 0.0,
                items,
            }
        })
    })
}

/// Cells reached by stepping a fresh filler until it leaves recorded data.
fn advance_until_unrecorded(grid: &Grid) -> (GridLayoutInfo, Vec<(usize, usize)>) {
    let (mut info, options) = grid.pack();
    let mut host = grid.host();
    let mut visited = Vec::new();
    let mut filler = Filler::new(&mut info, &options, &mut host);
    assert_eq!(filler.cursor(), (0, None));
    while filler.advance_pos() {
        let (row, col) = filler.cursor();
        visited.push((row, col.unwrap_or(0)));
    }
    (info, visited)
}

proptest! {
    /// Stepping from before the first cell visits every cell of a hole-free
    /// matrix once, in row-major order.
    #[test]
    fn prop_advance_visits_full_matrix_in_order(grid in arb_full_rows()) {
        let (info, visited) = advance_until_unrecorded(&grid);
        let rows = info.matrix.row_count();
        let expected: Vec<(usize, usize)> = (0..rows)
            .flat_map(|row| (0..grid.cross_count).map(move |col| (row, col)))
            .collect();
        prop_assert_eq!(visited, expected);
    }

    /// With holes, stepping visits the recorded cells in row-major order up
    /// to the first free cell.
    #[test]
    fn prop_advance_stops_at_first_free_cell(grid in arb_grid()) {
        prop_assume!(!grid.items.is_empty());
        let (info, visited) = advance_until_unrecorded(&grid);
        let expected: Vec<(usize, usize)> = info
            .matrix
            .rows()
            .flat_map(|(row, cells)| cells.keys().map(move |col| (*row, *col)))
            .enumerate()
            .take_while(|(i, (row, col))| *i == row * grid.cross_count + col)
            .map(|(_, cell)| cell)
            .collect();
        prop_assert_eq!(visited, expected);
    }


    /// Each item owns exactly the cells of its span, and no cell has two owners.
    #[test]
    fn prop_items_cover_exactly_their_span(grid in arb_grid()) {
        let (info, options) = grid.pack();
        prop_assert_eq!(info.matrix.item_count(), grid.items.len());

        let mut area = 0;
        for index in 0..grid.items.len() {
            let (row, col) = info.position_of(index).expect("every item is packed");
            let span = options.span_of(index, Axis::Vertical, grid.cross_count);
            prop_assert!(col + span.cross <= grid.cross_count);
            for r in row..row + span.main {
                for c in col..col + span.cross {
                    let expected = if (r, c) == (row, col) {
                        Cell::Item(index)
                    } else {
                        Cell::Covered { row, col }
                    };
                    prop_assert_eq!(info.matrix.get(r, c), Some(expected));
                    prop_assert_eq!(info.owner_at(r, c), Some(index));
                }
            }
            area += span.main * span.cross;
        }

        let recorded: usize = info.matrix.rows().map(|(_, cells)| cells.len()).sum();
        prop_assert_eq!(recorded, area);
    }

    /// First-fit never places an item in a row above its predecessor.
    #[test]
    fn prop_anchor_rows_follow_index_order(grid in arb_grid()) {
        let (info, _) = grid.pack();
        let rows: Vec<usize> = (0..grid.items.len())
            .map(|i| info.position_of(i).map_or(usize::MAX, |(r, _)| r))
            .collect();
        prop_assert!(rows.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Filling again from the start replays the recorded packing.
    #[test]
    fn prop_refill_replays_packing(grid in arb_grid()) {
        let (mut info, options) = grid.pack();
        let matrix = snapshot(&info);
        let heights = info.line_heights.clone();

        info.start_index = 0;
        info.start_main_line = 0;
        info.end_index = None;
        let mut host = grid.host();
        fill(&mut info, &options, &mut host, grid.gap);

        prop_assert_eq!(snapshot(&info), matrix);
        prop_assert_eq!(info.line_heights, heights);
        prop_assert_eq!(host.measure_calls, grid.items.len());
    }

    /// Scrolling forward by some distance and back by the same distance
    /// returns to the first row, and no anchor splits a multi-row item.
    #[test]
    fn prop_forward_then_backward_round_trips(grid in arb_grid(), distance in 0_u32..3000) {
        let (mut info, options) = grid.pack();
        prop_assume!(!info.matrix.is_empty());
        let d = f64::from(distance);

        info.current_offset = -d;
        let fwd = RangeSolver::new(&info, &options).find_starting_row(grid.gap);
        prop_assert!(fwd.pos <= 0.0);
        prop_assert_eq!(info.matrix.top_of_row(fwd.row), fwd.row);

        info.start_main_line = fwd.row;
        info.current_offset = fwd.pos + d;
        let back = RangeSolver::new(&info, &options).find_starting_row(grid.gap);
        prop_assert_eq!(back.row, 0);
        prop_assert_eq!(back.pos, 0.0);
    }

    /// A backward solve never anchors inside an item spanning several rows.
    #[test]
    fn prop_backward_snaps_to_item_tops(
        grid in arb_grid(),
        start in 0_usize..40,
        offset in 1_u32..200,
    ) {
        let (mut info, options) = grid.pack();
        prop_assume!(!info.matrix.is_empty());
        let last = info.matrix.last_row().unwrap_or(0);
        info.start_main_line = start.min(last);
        info.current_offset = f64::from(offset);

        let res = RangeSolver::new(&info, &options).find_starting_row(grid.gap);
        prop_assert_eq!(info.matrix.top_of_row(res.row), res.row);
        prop_assert!(res.row <= info.start_main_line);
    }
}
