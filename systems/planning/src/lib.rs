#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path planning strategies that operate over any [`WallView`].
//!
//! Every planner answers the same question (how does an agent travel from a
//! start cell to the nearest goal) and reports a [`PlanOutcome`] holding the
//! cells visited, origin included, together with a [`PlanStatus`].

pub mod dijkstra;
pub mod flood_fill;
pub mod key;
pub mod wall_follower;

use std::{fmt, str::FromStr};

use micromaze_core::{validate_turn_weight, Bearing, Cell, ConfigError, Direction, WallView};

pub use crate::flood_fill::{CostMap, UNREACHABLE};
pub use crate::key::SearchKey;

/// Planning strategies selectable through [`plan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Left-hand wall follower.
    WallFollower,
    /// Turn-weighted Dijkstra over the four orthogonal moves.
    Dijkstra,
    /// Turn-weighted Dijkstra that may also move diagonally.
    DiagonalDijkstra,
    /// Steepest descent over the flood-fill cost map.
    FloodFill,
}

impl Strategy {
    /// Every strategy in presentation order.
    pub const ALL: [Strategy; 4] = [
        Self::WallFollower,
        Self::Dijkstra,
        Self::DiagonalDijkstra,
        Self::FloodFill,
    ];

    /// Stable name used in configuration and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WallFollower => "wall-follower",
            Self::Dijkstra => "dijkstra",
            Self::DiagonalDijkstra => "diagonal",
            Self::FloodFill => "flood-fill",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown planning strategy `{}`", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == value)
            .ok_or_else(|| UnknownStrategy(value.to_owned()))
    }
}

/// Terminal state of a planning call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlanStatus {
    /// A goal cell was reached.
    Reached {
        /// Moves taken.
        steps: usize,
        /// Heading changes between consecutive moves.
        turns: usize,
        /// Travel cost plus the turn penalty.
        cost: f64,
    },
    /// No goal can be reached from the start.
    Unreachable,
    /// The wall follower returned to a state it had already occupied.
    Loop {
        /// Cell where the repetition was detected.
        cell: Cell,
        /// Heading held when the repetition was detected.
        heading: Direction,
    },
    /// The wall follower ran out of forward moves.
    StepBudgetExhausted {
        /// Forward moves allowed.
        budget: usize,
    },
}

impl PlanStatus {
    /// Reports whether the plan ends on a goal.
    #[must_use]
    pub const fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reached { steps, turns, cost } => {
                write!(f, "goal reached in {steps} steps, {turns} turns, cost {cost:.2}")
            }
            Self::Unreachable => f.write_str("goal unreachable"),
            Self::Loop { cell, heading } => {
                write!(f, "loop detected at {cell} facing {heading}")
            }
            Self::StepBudgetExhausted { budget } => {
                write!(f, "step budget of {budget} moves exhausted")
            }
        }
    }
}

/// Cells travelled by a planner together with how the plan ended.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanOutcome {
    /// Visited cells in order, starting with the origin.
    pub path: Vec<Cell>,
    /// How the plan ended.
    pub status: PlanStatus,
}

impl PlanOutcome {
    /// Outcome of a plan that cannot leave its origin.
    #[must_use]
    pub fn unreachable(origin: Cell) -> Self {
        Self {
            path: vec![origin],
            status: PlanStatus::Unreachable,
        }
    }

    /// Outcome of a plan that reached a goal along `path`, measured with the given turn weight.
    #[must_use]
    pub fn reached(path: Vec<Cell>, turn_weight: f64) -> Self {
        let (steps, turns, cost) = measure(&path, turn_weight);
        Self {
            path,
            status: PlanStatus::Reached { steps, turns, cost },
        }
    }

    /// Cell entered by the first move, if the plan moves at all.
    #[must_use]
    pub fn first_step(&self) -> Option<Cell> {
        self.path.get(1).copied()
    }
}

/// Runs the selected strategy from `start` toward the nearest of `goals`.
///
/// The turn weight must be finite and non-negative.
pub fn plan<V>(
    strategy: Strategy,
    view: &V,
    start: Cell,
    goals: &[Cell],
    turn_weight: f64,
) -> Result<PlanOutcome, ConfigError>
where
    V: WallView + ?Sized,
{
    let turn_weight = validate_turn_weight(turn_weight)?;
    let outcome = match strategy {
        Strategy::WallFollower => wall_follower::plan(view, start, goals, turn_weight),
        Strategy::Dijkstra => dijkstra::orthogonal(view, start, goals, turn_weight),
        Strategy::DiagonalDijkstra => dijkstra::diagonal(view, start, goals, turn_weight),
        Strategy::FloodFill => flood_fill::plan(view, start, goals, turn_weight),
    };
    tracing::debug!(%strategy, %start, status = %outcome.status, "plan finished");
    Ok(outcome)
}

/// Steps, heading changes and weighted cost of a path of adjacent cells.
fn measure(path: &[Cell], turn_weight: f64) -> (usize, usize, f64) {
    let bearings: Vec<Bearing> = path
        .windows(2)
        .filter_map(|pair| {
            Bearing::ALL
                .into_iter()
                .find(|bearing| pair[0].step(*bearing) == Some(pair[1]))
        })
        .collect();
    let turns = bearings.windows(2).filter(|pair| pair[0] != pair[1]).count();
    let travel: f64 = bearings.iter().map(|bearing| bearing.step_cost()).sum();
    (bearings.len(), turns, travel + turn_weight * turns as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_parse_from_their_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert!("breadth-first".parse::<Strategy>().is_err());
    }

    #[test]
    fn measure_counts_heading_changes() {
        let path = [
            Cell::new(2, 0),
            Cell::new(1, 0),
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 2),
        ];
        let (steps, turns, cost) = measure(&path, 2.0);
        assert_eq!(steps, 4);
        assert_eq!(turns, 2);
        assert!((cost - (3.0 + std::f64::consts::SQRT_2 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn status_text_describes_the_result() {
        let status = PlanStatus::Loop {
            cell: Cell::new(15, 0),
            heading: Direction::North,
        };
        assert_eq!(status.to_string(), "loop detected at (15, 0) facing north");
        assert_eq!(PlanStatus::Unreachable.to_string(), "goal unreachable");
    }
}
