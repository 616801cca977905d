#![forbid(unsafe_code)]

//! Cell packing: greedy row assignment plus iterative proportional growth.
//!
//! [`place_grid_cells`] turns an ordered list of [`CellRequest`]s and a
//! container description into rows of [`CellPlacement`]s. Rows are formed by
//! accumulating resolved minimum widths in input order; each row's surplus is
//! then distributed to cells that can still grow, weighted by their resolved
//! minimums.
//!
//! # Usage
//!
//! ```ignore
//! use cellgrid::{place_grid_cells, CellRequest, GridConstraints};
//!
//! let requests = [
//!     CellRequest::bounded(50, 400),
//!     CellRequest::bounded(80, 400),
//!     CellRequest::bounded(70, 800),
//! ];
//! let rows = place_grid_cells(&requests, GridConstraints::new(300))?;
//! assert_eq!(rows.len(), 1);
//! let widths: Vec<u32> = rows[0].iter().map(|p| p.width).collect();
//! assert_eq!(widths, [75, 120, 105]);
//! ```
//!
//! # Invariants
//!
//! 1. Input order is preserved: placement indices across all rows are
//!    `0..requests.len()` in ascending order.
//! 2. No row's total width exceeds `parent_width`, and it equals
//!    `parent_width` unless every cell in the row sits at its `max_width`
//!    (or the row is a lone cell whose minimum already overflows, which is
//!    clamped to `parent_width`).
//! 3. No row holds more than `max_columns` cells when a cap is set.
//! 4. Widths stay within each cell's bounds, except that a lone oversized
//!    cell is clamped down to the container.
//! 5. The function is pure: identical input yields identical output.
//!
//! # Failure Modes
//!
//! - Malformed input fails fast with [`GridError`] before any packing work.
//! - A row that somehow fails to converge within [`MAX_RESOLVE_ITERATIONS`]
//!   keeps its best-effort widths and emits a `tracing` warning. The
//!   one-pixel fallback makes this unreachable for integer inputs (when
//!   every proportional share floors to zero the leftover is smaller than
//!   the number of growable cells, so one walk pass exhausts it); the cap
//!   guards against future edits breaking that argument.

use crate::cell::{CellPlacement, CellRequest, GridConstraints, GridError};

/// Upper bound on width-resolution iterations per row.
pub const MAX_RESOLVE_ITERATIONS: usize = 50;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Pack `requests` into rows fitting `constraints`, resolving a concrete
/// pixel width for every cell.
///
/// Rows are returned in layout order; each placement's `index` points back
/// into `requests`. An empty request slice yields an empty vec.
pub fn place_grid_cells(
    requests: &[CellRequest],
    constraints: GridConstraints,
) -> Result<Vec<Vec<CellPlacement>>, GridError> {
    constraints.validate()?;
    for (index, request) in requests.iter().enumerate() {
        request.validate(index)?;
    }
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let parent_width = constraints.parent_width;
    let resolved: Vec<u32> = requests
        .iter()
        .map(|request| request.resolved_min_width(parent_width))
        .collect();

    let rows = assign_rows(&resolved, constraints);
    let mut placed = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.into_iter().enumerate() {
        let widths = resolve_row_widths(&row, requests, &resolved, parent_width, row_index);
        placed.push(
            row.iter()
                .zip(widths)
                .map(|(&index, width)| CellPlacement { index, width })
                .collect(),
        );
    }
    Ok(placed)
}

// ---------------------------------------------------------------------------
// Row assignment
// ---------------------------------------------------------------------------

/// Greedily group request indices into rows by accumulating resolved
/// minimum widths.
///
/// A request starts a new row when its minimum would push a non-empty row
/// past the container width, or when the row already holds `max_columns`
/// cells. A lone request wider than the container still gets its own row.
fn assign_rows(resolved: &[u32], constraints: GridConstraints) -> Vec<Vec<usize>> {
    let parent_width = u64::from(constraints.parent_width);
    let mut rows = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used: u64 = 0;

    for (index, &min_width) in resolved.iter().enumerate() {
        let cap_reached = constraints
            .max_columns
            .is_some_and(|cap| current.len() >= cap);
        let overflows = !current.is_empty() && used + u64::from(min_width) > parent_width;
        if cap_reached || overflows {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(index);
        used += u64::from(min_width);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

// ---------------------------------------------------------------------------
// Width resolution
// ---------------------------------------------------------------------------

/// Resolve final widths for one row, starting from resolved minimums.
///
/// Each pass distributes the row's surplus across growable cells in
/// proportion to their resolved minimums (floored integer shares, capped at
/// each cell's `max_width`). When flooring starves every cell while surplus
/// remains, a one-pixel walk over the row hands out the leftover in input
/// order, biasing earlier cells.
fn resolve_row_widths(
    row: &[usize],
    requests: &[CellRequest],
    resolved: &[u32],
    parent_width: u32,
    row_index: usize,
) -> Vec<u32> {
    let target = u64::from(parent_width);
    let mut widths: Vec<u32> = row.iter().map(|&index| resolved[index]).collect();

    for _ in 0..MAX_RESOLVE_ITERATIONS {
        let total: u64 = widths.iter().map(|&w| u64::from(w)).sum();
        if total == target {
            return widths;
        }
        if total > target {
            // Multi-cell rows never start above the container width, so this
            // is a lone oversized cell. Clamp it down.
            debug_assert_eq!(widths.len(), 1, "only a single cell can overflow at baseline");
            for width in &mut widths {
                *width = (*width).min(parent_width);
            }
            return widths;
        }

        let growable: Vec<usize> = (0..row.len())
            .filter(|&slot| {
                requests[row[slot]]
                    .max_width
                    .is_none_or(|max| widths[slot] < max)
            })
            .collect();
        if growable.is_empty() {
            // Everything is capped; the row stays under-filled.
            return widths;
        }

        let remaining = target - total;
        let weight_sum: u64 = growable
            .iter()
            .map(|&slot| u64::from(resolved[row[slot]]))
            .sum::<u64>()
            .max(1);

        let mut grew = false;
        for &slot in &growable {
            let weight = u64::from(resolved[row[slot]]);
            let mut share = weight * remaining / weight_sum;
            if let Some(max) = requests[row[slot]].max_width {
                share = share.min(u64::from(max - widths[slot]));
            }
            if share > 0 {
                widths[slot] += share as u32;
                grew = true;
            }
        }

        if !grew {
            // Flooring assigned nothing anywhere. Hand out single pixels in
            // input order until the surplus is gone.
            let mut leftover = remaining;
            for &slot in &growable {
                if leftover == 0 {
                    break;
                }
                widths[slot] += 1;
                leftover -= 1;
            }
        }
    }

    let total: u64 = widths.iter().map(|&w| u64::from(w)).sum();
    tracing::warn!(
        row = row_index,
        cells = row.len(),
        target = parent_width,
        total,
        "row width resolution hit the iteration cap; keeping best-effort widths"
    );
    widths
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn widths_of(row: &[CellPlacement]) -> Vec<u32> {
        row.iter().map(|p| p.width).collect()
    }

    fn indices_of(row: &[CellPlacement]) -> Vec<usize> {
        row.iter().map(|p| p.index).collect()
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let rows = place_grid_cells(&[], GridConstraints::new(300)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn exact_fit_single_cell() {
        let rows = place_grid_cells(&[CellRequest::fixed(300)], GridConstraints::new(300)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec![CellPlacement { index: 0, width: 300 }]);
    }

    #[test]
    fn single_cell_grows_to_fill() {
        let rows =
            place_grid_cells(&[CellRequest::bounded(200, 400)], GridConstraints::new(300)).unwrap();
        assert_eq!(widths_of(&rows[0]), [300]);
    }

    #[test]
    fn oversized_cell_clamps_to_container() {
        let rows = place_grid_cells(&[CellRequest::fixed(400)], GridConstraints::new(300)).unwrap();
        assert_eq!(widths_of(&rows[0]), [300]);
    }

    #[test]
    fn surplus_splits_proportionally_to_minimums() {
        let requests = [
            CellRequest::bounded(50, 400),
            CellRequest::bounded(80, 400),
            CellRequest::bounded(70, 800),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(300)).unwrap();
        assert_eq!(rows.len(), 1);
        // 100px surplus split 50:80:70.
        assert_eq!(widths_of(&rows[0]), [75, 120, 105]);
    }

    #[test]
    fn column_cap_forces_row_break() {
        let requests = [
            CellRequest::fixed(100),
            CellRequest::fixed(150),
            CellRequest::fixed(100),
        ];
        let constraints = GridConstraints::new(350).with_max_columns(2);
        let rows = place_grid_cells(&requests, constraints).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(indices_of(&rows[0]), [0, 1]);
        assert_eq!(widths_of(&rows[0]), [100, 150]);
        assert_eq!(indices_of(&rows[1]), [2]);
        assert_eq!(widths_of(&rows[1]), [100]);
    }

    #[test]
    fn width_overflow_forces_row_break() {
        let requests = [
            CellRequest::fixed(200),
            CellRequest::fixed(200),
            CellRequest::fixed(50),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(300)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(indices_of(&rows[0]), [0]);
        assert_eq!(indices_of(&rows[1]), [1, 2]);
    }

    #[test]
    fn capped_row_stays_underfilled() {
        let requests = [CellRequest::fixed(100), CellRequest::fixed(150)];
        let rows = place_grid_cells(&requests, GridConstraints::new(350)).unwrap();
        // Both cells are pinned; the 100px surplus is deliberately unused.
        assert_eq!(widths_of(&rows[0]), [100, 150]);
    }

    #[test]
    fn unbounded_cell_soaks_up_surplus() {
        let requests = [CellRequest::fixed(100), CellRequest::at_least(100)];
        let rows = place_grid_cells(&requests, GridConstraints::new(500)).unwrap();
        assert_eq!(widths_of(&rows[0]), [100, 400]);
    }

    #[test]
    fn growth_respects_ceiling_then_redistributes() {
        let requests = [
            CellRequest::bounded(50, 60),
            CellRequest::at_least(80),
            CellRequest::at_least(70),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(300)).unwrap();
        // First pass: shares 25/40/35, but cell 0 can only take 10. The
        // second pass splits the leftover 15 across cells 1 and 2 (80:70).
        assert_eq!(widths_of(&rows[0]), [60, 128, 112]);
    }

    #[test]
    fn one_pixel_walk_biases_early_cells() {
        let requests = [
            CellRequest::at_least(3),
            CellRequest::at_least(3),
            CellRequest::at_least(3),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(10)).unwrap();
        // 1px leftover floors every proportional share to zero; the walk
        // hands it to the first cell.
        assert_eq!(widths_of(&rows[0]), [4, 3, 3]);
    }

    #[test]
    fn one_pixel_walk_spreads_in_order() {
        let requests = [
            CellRequest::at_least(100),
            CellRequest::at_least(100),
            CellRequest::at_least(100),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(302)).unwrap();
        assert_eq!(widths_of(&rows[0]), [101, 101, 100]);
    }

    #[test]
    fn flexible_cells_each_claim_a_row() {
        let requests = [CellRequest::flexible(), CellRequest::flexible()];
        let rows = place_grid_cells(&requests, GridConstraints::new(300)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(widths_of(&rows[0]), [300]);
        assert_eq!(widths_of(&rows[1]), [300]);
    }

    #[test]
    fn zero_width_container_isolates_bounded_cells() {
        let requests = [CellRequest::fixed(5), CellRequest::fixed(5)];
        let rows = place_grid_cells(&requests, GridConstraints::new(0)).unwrap();
        // Each minimum overflows a zero-width row, so each cell sits alone,
        // clamped to the container.
        assert_eq!(rows.len(), 2);
        assert_eq!(widths_of(&rows[0]), [0]);
        assert_eq!(widths_of(&rows[1]), [0]);
    }

    #[test]
    fn indices_are_global_and_ascending() {
        let requests = [
            CellRequest::fixed(120),
            CellRequest::fixed(120),
            CellRequest::fixed(120),
            CellRequest::fixed(120),
            CellRequest::fixed(120),
        ];
        let rows = place_grid_cells(&requests, GridConstraints::new(300)).unwrap();
        let flat: Vec<usize> = rows.iter().flatten().map(|p| p.index).collect();
        assert_eq!(flat, [0, 1, 2, 3, 4]);
        assert!(rows.iter().all(|row| row.len() <= 2));
    }

    #[test]
    fn rejects_inverted_bounds_before_packing() {
        let requests = [CellRequest::fixed(100), CellRequest::bounded(300, 200)];
        let err = place_grid_cells(&requests, GridConstraints::new(300)).unwrap_err();
        assert_eq!(
            err,
            GridError::InvertedCellBounds {
                index: 1,
                min: 300,
                max: 200
            }
        );
    }

    #[test]
    fn rejects_zero_column_cap() {
        let constraints = GridConstraints::new(300).with_max_columns(0);
        let err = place_grid_cells(&[CellRequest::flexible()], constraints).unwrap_err();
        assert_eq!(err, GridError::ZeroColumnCap);
    }

    #[test]
    fn validation_runs_even_for_empty_rows_config() {
        // Constraint validation fires before the empty-input short circuit.
        let constraints = GridConstraints::new(300).with_max_columns(0);
        assert!(place_grid_cells(&[], constraints).is_err());
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let requests = [
            CellRequest::bounded(50, 400),
            CellRequest::at_least(80),
            CellRequest::at_most(120),
            CellRequest::flexible(),
        ];
        let constraints = GridConstraints::new(280).with_max_columns(3);
        let first = place_grid_cells(&requests, constraints).unwrap();
        let second = place_grid_cells(&requests, constraints).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn assign_rows_never_emits_empty_rows() {
        let resolved = [500, 10, 10, 500, 500];
        let rows = assign_rows(&resolved, GridConstraints::new(300));
        assert!(rows.iter().all(|row| !row.is_empty()));
        assert_eq!(rows.concat(), [0, 1, 2, 3, 4]);
    }
}
