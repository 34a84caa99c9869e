//! Loop counter (C9): the tolerant sequence matcher that compares a
//! vehicle's [`CellPath`] against a reference route's `CellPath`,
//! classifying deviations as "local" resyncs or "foreign" detours, and
//! counts full route completions.
//!
//! Two control-flow decisions here are worth calling out explicitly — see
//! DESIGN.md for the full write-up:
//!
//! - The back-jump branch (`k < r`) is a **three-way** branch: when
//!   `route[k] == route[0]` it either resyncs (if `traj[i-1] == route[1]`)
//!   or forces a lap commit, and when `route[k] != route[0]` it is a plain
//!   resync to `k+1`, same as the forward-jump case.
//! - `check_neighbors` accepts a detour cell as soon as it is adjacent to
//!   *at least one* missed-route cell, not merely the first one checked.

use serde::Serialize;

use crate::grid::Grid;
use crate::path::CellPath;

/// The loop counter's report record: a completed route-traversal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopResult {
    pub loops: u32,
}

/// First occurrence of `needle` in `haystack`, or `None` — ties resolve to
/// the leftmost index.
fn find_current_index(needle: usize, haystack: &[usize]) -> Option<usize> {
    haystack.iter().position(|&cell| cell == needle)
}

/// The 8-neighborhood of cell `d` on a grid of width `w` and length `l`,
/// using the cell's linear index. Corners have 3 neighbors, edges have 5,
/// interior cells have 8 — ported verbatim from `adjacent_cells`.
fn adjacent_cells(d: usize, w: usize, l: usize) -> Vec<usize> {
    let d = d as i64;
    let w = w as i64;
    let l = l as i64;

    let cells: Vec<i64> = if d == 0 {
        vec![d + 1, d + w, d + w + 1]
    } else if d == w - 1 {
        vec![d - 1, d + w - 1, d + w]
    } else if d == l - w {
        vec![d - w, d - w + 1, d + 1]
    } else if d == l - 1 {
        vec![d - w - 1, d - w, d - 1]
    } else if d < w {
        vec![d - 1, d + 1, d + w - 1, d + w, d + w + 1]
    } else if d < l && d >= l - w {
        vec![d - w - 1, d - w, d - w + 1, d - 1, d + 1]
    } else if d % w == 0 {
        vec![d - w, d - w + 1, d + 1, d + w, d + w + 1]
    } else if d % w == w - 1 {
        vec![d - w - 1, d - w, d - 1, d + w - 1, d + w]
    } else {
        vec![
            d - w - 1,
            d - w,
            d - w + 1,
            d - 1,
            d + 1,
            d + w - 1,
            d + w,
            d + w + 1,
        ]
    };

    cells
        .into_iter()
        .filter(|&c| c >= 0 && c < l)
        .map(|c| c as usize)
        .collect()
}

/// Accept a detour (return `0`) only if every detour cell is adjacent to at
/// least one missed-route cell; otherwise reject it (return `1`).
fn check_neighbors(detour: &[usize], missed_route: &[usize], grid: &Grid) -> u32 {
    let width = grid.width;
    let length = grid.len();

    for &d in detour {
        let adjacent_to_any = missed_route
            .iter()
            .any(|&m| adjacent_cells(m, width, length).contains(&d));
        if !adjacent_to_any {
            return 1;
        }
    }
    0
}

/// Advance past a run of trajectory cells absent from `route`, building the
/// detour list `D` and the missed-route list `M`, and returning the updated
/// `(i, r)` cursors. Ported from `detour_info`.
fn detour_info(start_i: usize, route: &[usize], traj: &[usize]) -> (usize, usize, Vec<usize>, Vec<usize>) {
    let mut detour = Vec::new();
    let mut i = start_i;

    while i < traj.len() && find_current_index(traj[i], route).is_none() {
        detour.push(traj[i]);
        i += 1;
    }

    let missed_route: Vec<usize>;
    let r: usize;

    if start_i == 0 {
        if i == traj.len() {
            // Detour runs off the end of the trajectory starting from i == 0:
            // there is nothing left to resync to, so the whole route counts
            // as missed and no further progress is possible.
            missed_route = route.to_vec();
            r = route.len();
        } else {
            let entry = find_current_index(traj[i], route).expect("loop exit guarantees a match");
            missed_route = if entry == 0 {
                vec![route[0]]
            } else {
                route[0..=entry].to_vec()
            };
            r = entry + 1;
        }
    } else {
        let start_index =
            find_current_index(traj[start_i - 1], route).expect("traj[start_i - 1] is on-route");
        if i == traj.len() {
            missed_route = route[start_index..route.len()].to_vec();
            r = route.len();
        } else {
            let entry = find_current_index(traj[i], route).expect("loop exit guarantees a match");
            let end_index = entry + 1;
            if end_index < start_index {
                // Detour wraps past the end of the route before resyncing:
                // the raw index `end_index` is appended, not the route cell
                // at that index, matching how the detour span is measured.
                let mut m = route[start_index..route.len()].to_vec();
                m.push(end_index);
                missed_route = m;
            } else {
                missed_route = route[start_index..end_index].to_vec();
            }
            r = entry + 1;
        }
    }

    (i, r, detour, missed_route)
}

/// Count how many times `traj` completes `route` end-to-end, tolerating
/// local reshuffles and geographically-adjacent detours.
pub fn count_loops(route: &CellPath, traj: &CellPath, grid: &Grid) -> u32 {
    if route.is_empty() || traj.is_empty() {
        return 0;
    }

    let mut errors: u32 = 0;
    let mut loops: u32 = 0;
    let mut r: usize = 0;
    let mut i: usize = 0;

    while i < traj.len() {
        if traj[i] == route[r] {
            r += 1;
        } else {
            match find_current_index(traj[i], route) {
                Some(k) if k > r => {
                    r = k + 1;
                }
                Some(k) => {
                    // k < r: a backward jump within the route.
                    if route[k] == route[0] {
                        if traj[i - 1] == route[1] {
                            r = k + 1;
                        } else {
                            r = route.len();
                        }
                    } else {
                        r = k + 1;
                    }
                }
                None => {
                    let (new_i, new_r, detour, missed_route) = detour_info(i, route, traj);
                    errors += check_neighbors(&detour, &missed_route, grid);
                    i = new_i;
                    r = new_r;
                }
            }
        }

        if r == route.len() {
            r = 0;
            if errors == 0 {
                loops += 1;
            } else {
                errors = 0;
            }
        }

        i += 1;
    }

    loops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{BBox, Point};

    fn grid_with_width(width: usize) -> Grid {
        Grid {
            bbox: BBox {
                nw: Point::new(1.0, 0.0),
                se: Point::new(0.0, 1.0),
            },
            side_deg: 0.1,
            width,
            height: 10,
        }
    }

    #[test]
    fn test_loops_empty_trajectory_is_zero() {
        let grid = grid_with_width(10);
        assert_eq!(count_loops(&vec![1, 2, 3], &vec![], &grid), 0);
    }

    #[test]
    fn test_loops_exact_scenario_five() {
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3];
        let traj = vec![1, 2, 3, 1, 2, 3];
        assert_eq!(count_loops(&route, &traj, &grid), 2);
    }

    #[test]
    fn test_loops_single_pass_is_one() {
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3];
        let traj = vec![1, 2, 3];
        assert_eq!(count_loops(&route, &traj, &grid), 1);
    }

    #[test]
    fn test_loops_shorter_than_route_is_zero() {
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3, 4, 5];
        let traj = vec![1, 2];
        assert_eq!(count_loops(&route, &traj, &grid), 0);
    }

    #[test]
    fn test_loops_accepted_detour_scenario_six() {
        // grid width=10, so cell 12 (row 1, col 2) is adjacent to cell 2 (row 0, col 2).
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3];
        let traj = vec![1, 2, 12, 3];
        assert_eq!(count_loops(&route, &traj, &grid), 1);
    }

    #[test]
    fn test_loops_rejected_detour_scenario_seven() {
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3];
        let traj = vec![1, 2, 99, 3];
        assert_eq!(count_loops(&route, &traj, &grid), 0);
    }

    #[test]
    fn test_adjacent_cells_corner_has_three_neighbors() {
        let neighbors = adjacent_cells(0, 10, 100);
        assert_eq!(neighbors.len(), 3);
    }

    #[test]
    fn test_adjacent_cells_interior_has_eight_neighbors() {
        let neighbors = adjacent_cells(55, 10, 100);
        assert_eq!(neighbors.len(), 8);
    }

    #[test]
    fn test_find_current_index_leftmost_tie() {
        let route = vec![5, 2, 5, 7];
        assert_eq!(find_current_index(5, &route), Some(0));
    }

    #[test]
    fn test_multiple_full_completions_reset_errors_independently() {
        // Two exact laps back to back, each resetting errors independently.
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3];
        let traj = vec![1, 2, 3, 1, 2, 3, 1, 2, 3];
        assert_eq!(count_loops(&route, &traj, &grid), 3);
    }

    #[test]
    fn test_loop_back_jump_to_route_start_forces_commit() {
        // Back-jump target is route[0]; traj[i-1] != route[1], so the
        // three-way branch forces a lap commit instead of resyncing.
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3, 4];
        let traj = vec![1, 2, 3, 1];
        assert_eq!(count_loops(&route, &traj, &grid), 1);
    }

    #[test]
    fn test_loop_back_jump_to_route_start_resyncs() {
        // Back-jump target is route[0], but traj[i-1] == route[1], so the
        // three-way branch resyncs instead of forcing a commit.
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3, 4];
        let traj = vec![1, 2, 3, 4, 2, 1];
        assert_eq!(count_loops(&route, &traj, &grid), 1);
    }

    #[test]
    fn test_loop_back_jump_to_non_start_target_resyncs() {
        // Back-jump target is not route[0], so it is a plain resync
        // regardless of traj[i-1].
        let grid = grid_with_width(10);
        let route = vec![1, 2, 3, 4, 5];
        let traj = vec![1, 2, 3, 4, 2, 3, 4, 5];
        assert_eq!(count_loops(&route, &traj, &grid), 1);
    }

    #[test]
    fn test_check_neighbors_any_adjacent_accepts() {
        // cell 50 fails adjacency against missed cell 0 but succeeds
        // against missed cell 41 (interior neighbor) later in the list.
        let grid = grid_with_width(10);
        let detour = vec![50];
        let missed_route = vec![0, 41];
        assert_eq!(check_neighbors(&detour, &missed_route, &grid), 0);
    }

    #[test]
    fn test_check_neighbors_none_adjacent_rejects() {
        let grid = grid_with_width(10);
        let detour = vec![99];
        let missed_route = vec![0, 1, 2];
        assert_eq!(check_neighbors(&detour, &missed_route, &grid), 1);
    }
}
