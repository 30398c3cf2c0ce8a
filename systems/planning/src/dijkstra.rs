//! Turn-weighted Dijkstra planners.
//!
//! The search state is a cell together with the bearing used to enter it, so
//! a turn penalty can be charged whenever the next move changes bearing. The
//! first move out of the origin is free of turn cost.

use std::{cmp::Reverse, collections::BinaryHeap};

use micromaze_core::{Bearing, Cell, GridSize, WallView};
use tracing::debug;

use crate::{key::SearchKey, PlanOutcome};

/// Bearing slots per cell: one per bearing plus the heading-less origin state.
const SLOTS: usize = Bearing::ALL.len() + 1;

/// Minimizes `steps + turn_weight * turns` using orthogonal moves only.
pub fn orthogonal<V>(view: &V, start: Cell, goals: &[Cell], turn_weight: f64) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    search(view, start, goals, turn_weight, &Bearing::CARDINAL)
}

/// Minimizes travel cost plus the turn penalty with diagonal moves costing `√2`.
///
/// A diagonal move is legal only when both orthogonal routes around the
/// crossed post are open.
pub fn diagonal<V>(view: &V, start: Cell, goals: &[Cell], turn_weight: f64) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    search(view, start, goals, turn_weight, &Bearing::ALL)
}

#[derive(Clone, Copy, Debug)]
struct Visit {
    key: SearchKey,
    previous: Option<usize>,
}

fn search<V>(
    view: &V,
    start: Cell,
    goals: &[Cell],
    turn_weight: f64,
    bearings: &[Bearing],
) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    let size = view.size();
    let Some(start_index) = size.index(start) else {
        return PlanOutcome::unreachable(start);
    };

    let mut is_goal = vec![false; size.cell_count()];
    for goal in goals {
        if let Some(index) = size.index(*goal) {
            is_goal[index] = true;
        }
    }

    let unvisited = SearchKey {
        cost: f64::INFINITY,
        turns: u32::MAX,
        sequence: u64::MAX,
    };
    let mut visits = vec![
        Visit {
            key: unvisited,
            previous: None,
        };
        size.cell_count() * SLOTS
    ];
    let mut settled = vec![false; visits.len()];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0_u64;

    let origin = start_index * SLOTS;
    visits[origin].key = SearchKey {
        cost: 0.0,
        turns: 0,
        sequence,
    };
    frontier.push(Reverse((visits[origin].key, origin)));

    let mut expanded = 0_usize;
    while let Some(Reverse((key, state))) = frontier.pop() {
        if settled[state] || key != visits[state].key {
            continue;
        }
        settled[state] = true;
        expanded += 1;

        let cell_index = state / SLOTS;
        if is_goal[cell_index] {
            debug!(expanded, cost = key.cost, "dijkstra reached a goal");
            let path = reconstruct(&visits, state, size);
            return PlanOutcome::reached(path, turn_weight);
        }

        let Some(cell) = size.cell_at(cell_index) else {
            continue;
        };
        let arrival = arrival_bearing(state);

        for &bearing in bearings {
            let Some(next) = view.step(cell, bearing) else {
                continue;
            };
            let Some(next_index) = size.index(next) else {
                continue;
            };

            let turned = arrival.is_some_and(|previous| previous != bearing);
            let turn_cost = if turned { turn_weight } else { 0.0 };
            sequence += 1;
            let candidate = SearchKey {
                cost: key.cost + bearing.step_cost() + turn_cost,
                turns: key.turns + u32::from(turned),
                sequence,
            };

            let next_state = next_index * SLOTS + slot(bearing);
            if settled[next_state] || !candidate.improves_on(&visits[next_state].key) {
                continue;
            }
            visits[next_state] = Visit {
                key: candidate,
                previous: Some(state),
            };
            frontier.push(Reverse((candidate, next_state)));
        }
    }

    debug!(expanded, "dijkstra exhausted the frontier");
    PlanOutcome::unreachable(start)
}

fn slot(bearing: Bearing) -> usize {
    Bearing::ALL
        .iter()
        .position(|candidate| *candidate == bearing)
        .map_or(0, |position| position + 1)
}

fn arrival_bearing(state: usize) -> Option<Bearing> {
    match state % SLOTS {
        0 => None,
        slot => Bearing::ALL.get(slot - 1).copied(),
    }
}

fn reconstruct(visits: &[Visit], goal_state: usize, size: GridSize) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = Some(goal_state);
    while let Some(state) = current {
        if let Some(cell) = size.cell_at(state / SLOTS) {
            path.push(cell);
        }
        current = visits[state].previous;
    }
    path.reverse();
    path
}
