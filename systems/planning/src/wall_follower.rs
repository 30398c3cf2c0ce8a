//! Left-hand wall follower.
//!
//! The follower models a simple robot: keep the left hand on the wall, turn
//! left when possible, otherwise go straight, otherwise rotate right in
//! place. It does not search, so on mazes with cycles it may circle an
//! island forever; the first repeated `(cell, heading)` state is reported as
//! a loop even when another route to a goal exists.

use micromaze_core::{Cell, Direction, GridSize, WallView};
use micromaze_world::query;
use tracing::debug;

use crate::{PlanOutcome, PlanStatus};

/// Forward moves allowed on a grid of the given size: five per cell.
#[must_use]
pub fn default_budget(size: GridSize) -> usize {
    5 * size.cell_count()
}

/// Follows the left wall from `start`, initially facing north, with the default budget.
pub fn plan<V>(view: &V, start: Cell, goals: &[Cell], turn_weight: f64) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    plan_with_budget(view, start, goals, turn_weight, default_budget(view.size()))
}

/// Follows the left wall from `start` allowing at most `budget` forward moves.
pub fn plan_with_budget<V>(
    view: &V,
    start: Cell,
    goals: &[Cell],
    turn_weight: f64,
    budget: usize,
) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    let size = view.size();
    if !size.contains(start) || !query::reaches_any(view, start, goals) {
        return PlanOutcome::unreachable(start);
    }

    let mut visited = vec![false; size.cell_count() * Direction::ALL.len()];
    let mut path = vec![start];
    let mut cell = start;
    let mut heading = Direction::North;
    let mut moves = 0_usize;

    loop {
        if goals.contains(&cell) {
            return PlanOutcome::reached(path, turn_weight);
        }

        let Some(state) = state_index(size, cell, heading) else {
            return PlanOutcome::unreachable(start);
        };
        if visited[state] {
            debug!(%cell, %heading, moves, "wall follower looped");
            return PlanOutcome {
                path,
                status: PlanStatus::Loop { cell, heading },
            };
        }
        visited[state] = true;

        let left = heading.left();
        let (next_heading, next) = if let Some(next) = view.open_neighbor(cell, left) {
            (left, Some(next))
        } else {
            (heading, view.open_neighbor(cell, heading))
        };

        match next {
            Some(next) => {
                if moves == budget {
                    return PlanOutcome {
                        path,
                        status: PlanStatus::StepBudgetExhausted { budget },
                    };
                }
                moves += 1;
                heading = next_heading;
                cell = next;
                path.push(cell);
            }
            None => heading = heading.right(),
        }
    }
}

fn state_index(size: GridSize, cell: Cell, heading: Direction) -> Option<usize> {
    let slot = Direction::ALL
        .iter()
        .position(|candidate| *candidate == heading)?;
    Some(size.index(cell)? * Direction::ALL.len() + slot)
}
