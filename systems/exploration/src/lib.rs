#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Exploration simulator driving a virtual agent through an unknown maze.
//!
//! The agent only learns walls by standing next to them. Each tick it senses
//! the four sides of its cell, replans over what it has seen so far and
//! takes at most one step. A run cycles through three phases: explore toward
//! the goals, return to the start, then a speed run over the known maze.
//! The simulation succeeds once a speed run reaches a goal without sensing a
//! single new wall. Every tick is recorded in a [`StepHistory`] that can be
//! rewound and replayed.

pub mod history;

use std::fmt;

use micromaze_core::{validate_turn_weight, Cell, ConfigError, Direction, WallId, WallView};
use micromaze_system_planning::{dijkstra, CostMap};
use micromaze_world::{SeenWalls, WallGraph};
use tracing::{debug, info};

pub use crate::history::StepHistory;

/// Phase of the three-stage discovery protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Descending the flood-fill map of the seen maze toward the goals.
    Explore,
    /// Travelling back to the start over the seen maze.
    ReturnToStart,
    /// Racing from the start to the goals over the seen maze.
    SpeedRun,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explore => "EXPLORE",
            Self::ReturnToStart => "RETURN_TO_START",
            Self::SpeedRun => "SPEED_RUN",
        };
        f.write_str(name)
    }
}

/// Terminal result of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A speed run reached a goal without discovering new walls.
    Success,
    /// No known route leads from the agent to any goal.
    Trapped,
    /// The agent found no neighbour closer to a goal than its own cell.
    LocalMinimum,
}

impl Outcome {
    /// Reports whether the outcome is a failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Trapped => "trapped",
            Self::LocalMinimum => "local minimum",
        };
        f.write_str(name)
    }
}

/// Parameters of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    turn_weight: f64,
    initial_heading: Direction,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            turn_weight: 1.0,
            initial_heading: Direction::North,
        }
    }
}

impl SimulationConfig {
    /// Sets the turn penalty used by speed runs.
    #[must_use]
    pub fn with_turn_weight(mut self, turn_weight: f64) -> Self {
        self.turn_weight = turn_weight;
        self
    }

    /// Sets the heading the agent starts with.
    #[must_use]
    pub fn with_initial_heading(mut self, initial_heading: Direction) -> Self {
        self.initial_heading = initial_heading;
        self
    }

    /// Turn penalty used by speed runs.
    #[must_use]
    pub const fn turn_weight(&self) -> f64 {
        self.turn_weight
    }

    /// Heading the agent starts with.
    #[must_use]
    pub const fn initial_heading(&self) -> Direction {
        self.initial_heading
    }

    /// Checks that the configuration describes a usable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = validate_turn_weight(self.turn_weight)?;
        Ok(())
    }
}

/// Complete simulator state after one tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimulationSnapshot {
    /// Ticks elapsed since the simulation started.
    pub tick: u64,
    /// Active phase.
    pub phase: Phase,
    /// Completed returns to the start.
    pub run_count: u32,
    /// Cell the agent occupies.
    pub position: Cell,
    /// Direction the agent faces.
    pub heading: Direction,
    /// Walls sensed so far.
    pub seen: SeenWalls,
    /// Cells visited during the current phase, starting where the phase began.
    pub trail: Vec<Cell>,
    /// Walls revealed by sensing so far.
    pub discovered: usize,
    /// Discovered-wall count recorded when the latest speed run started.
    pub baseline: Option<usize>,
    /// Walls revealed during this tick.
    pub newly_seen: Vec<WallId>,
    /// Human readable description of what happened during the tick.
    pub status: String,
    /// Terminal result, once the simulation has one.
    pub outcome: Option<Outcome>,
}

impl SimulationSnapshot {
    fn initial(truth: &WallGraph, heading: Direction) -> Self {
        let start = truth.start();
        Self {
            tick: 0,
            phase: Phase::Explore,
            run_count: 0,
            position: start,
            heading,
            seen: SeenWalls::new(truth.size()),
            trail: vec![start],
            discovered: 0,
            baseline: None,
            newly_seen: Vec::new(),
            status: String::from("exploring"),
            outcome: None,
        }
    }

    /// Reports whether the simulation has ended.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn enter(&mut self, phase: Phase, status: String) {
        info!(tick = self.tick, from = %self.phase, to = %phase, %status, "phase change");
        self.phase = phase;
        self.trail = vec![self.position];
        self.status = status;
    }

    fn finish(&mut self, outcome: Outcome, status: String) {
        info!(tick = self.tick, %outcome, %status, "simulation finished");
        self.outcome = Some(outcome);
        self.status = status;
    }

    fn advance_to(&mut self, direction: Direction, label: &str) {
        let Some(next) = self.seen.open_neighbor(self.position, direction) else {
            return;
        };
        self.heading = direction;
        self.position = next;
        self.trail.push(next);
        self.status = format!("{label}: moved {direction} to {next}");
    }
}

/// Tick-driven exploration of a private copy of a maze.
#[derive(Clone, Debug)]
pub struct Simulator {
    truth: WallGraph,
    config: SimulationConfig,
    history: StepHistory<SimulationSnapshot>,
}

impl Simulator {
    /// Starts a simulation over a copy of `maze`.
    pub fn new(maze: &WallGraph, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let truth = maze.clone();
        let initial = SimulationSnapshot::initial(&truth, config.initial_heading);
        Ok(Self {
            truth,
            config,
            history: StepHistory::new(initial),
        })
    }

    /// Maze the agent explores.
    #[must_use]
    pub const fn truth(&self) -> &WallGraph {
        &self.truth
    }

    /// Configuration the simulation runs with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Recorded snapshots.
    #[must_use]
    pub const fn history(&self) -> &StepHistory<SimulationSnapshot> {
        &self.history
    }

    /// Snapshot under the history cursor.
    #[must_use]
    pub fn current(&self) -> &SimulationSnapshot {
        self.history.current()
    }

    /// Executes one tick from the snapshot under the cursor and records it.
    ///
    /// Any recorded future beyond the cursor is discarded. Once the
    /// simulation has an outcome nothing is recorded and the final snapshot
    /// is returned unchanged.
    pub fn advance(&mut self) -> &SimulationSnapshot {
        let current = self.history.current();
        if current.is_finished() {
            return self.history.current();
        }
        let next = self.tick_from(current);
        self.history.append(next)
    }

    /// Automatic tick: advances unless the simulation is paused.
    pub fn tick(&mut self) -> Option<&SimulationSnapshot> {
        if self.history.is_paused() {
            return None;
        }
        Some(self.advance())
    }

    /// Moves forward one tick, replaying recorded future when there is any.
    pub fn step_forward(&mut self) -> &SimulationSnapshot {
        if self.history.is_at_end() {
            return self.advance();
        }
        let _ = self.history.step_forward();
        self.history.current()
    }

    /// Moves the cursor back one tick.
    pub fn step_back(&mut self) -> &SimulationSnapshot {
        let _ = self.history.step_back();
        self.history.current()
    }

    /// Restores the snapshot recorded at `index`.
    pub fn seek(&mut self, index: usize) -> Option<&SimulationSnapshot> {
        self.history.seek(index)
    }

    /// Freezes automatic ticking.
    pub fn pause(&mut self) {
        self.history.pause();
    }

    /// Resumes automatic ticking from the current cursor.
    pub fn resume(&mut self) {
        self.history.resume();
    }

    /// Reports whether automatic ticking is frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.history.is_paused()
    }

    /// Advances until the simulation ends or `max_ticks` further ticks have run.
    pub fn run(&mut self, max_ticks: u64) -> &SimulationSnapshot {
        for _ in 0..max_ticks {
            if self.advance().is_finished() {
                break;
            }
        }
        self.history.current()
    }

    fn tick_from(&self, previous: &SimulationSnapshot) -> SimulationSnapshot {
        let mut next = previous.clone();
        next.tick += 1;
        next.newly_seen = next.seen.reveal_around(&self.truth, next.position);
        next.discovered = next.seen.discovered();

        match next.phase {
            Phase::Explore => self.explore(&mut next),
            Phase::ReturnToStart => self.return_to_start(&mut next),
            Phase::SpeedRun => self.speed_run(&mut next),
        }

        debug!(
            tick = next.tick,
            phase = %next.phase,
            position = %next.position,
            revealed = next.newly_seen.len(),
            "simulation tick"
        );
        next
    }

    fn explore(&self, state: &mut SimulationSnapshot) {
        let position = state.position;
        if self.truth.is_goal(position) {
            state.enter(
                Phase::ReturnToStart,
                format!("goal reached at {position}; returning to start"),
            );
            return;
        }

        let map = CostMap::compute(&state.seen, self.truth.goals());
        if !map.is_reachable(position) {
            state.finish(
                Outcome::Trapped,
                format!("trapped at {position}: no known route to a goal"),
            );
            return;
        }

        match map.best_move(&state.seen, position, state.heading) {
            Some(direction) => state.advance_to(direction, "exploring"),
            None => state.finish(
                Outcome::LocalMinimum,
                format!("local minimum at {position}: no neighbour is closer to a goal"),
            ),
        }
    }

    fn return_to_start(&self, state: &mut SimulationSnapshot) {
        let position = state.position;
        let start = self.truth.start();
        if position == start {
            state.run_count += 1;
            state.baseline = Some(state.discovered);
            let status = format!(
                "speed run {} starting with {} walls discovered",
                state.run_count, state.discovered
            );
            state.enter(Phase::SpeedRun, status);
            return;
        }

        let plan = dijkstra::orthogonal(&state.seen, position, &[start], 0.0);
        match plan.first_step().and_then(|next| position.direction_to(next)) {
            Some(direction) => state.advance_to(direction, "returning to start"),
            None => state.enter(
                Phase::Explore,
                String::from("no known route to the start; exploring"),
            ),
        }
    }

    fn speed_run(&self, state: &mut SimulationSnapshot) {
        let position = state.position;
        if self.truth.is_goal(position) {
            if state.baseline == Some(state.discovered) {
                let steps = state.trail.len().saturating_sub(1);
                state.finish(
                    Outcome::Success,
                    format!("speed run {} completed in {steps} steps", state.run_count),
                );
            } else {
                let found = state.discovered - state.baseline.unwrap_or(0);
                state.enter(
                    Phase::ReturnToStart,
                    format!("speed run found {found} new walls; returning to start"),
                );
            }
            return;
        }

        let plan = dijkstra::orthogonal(
            &state.seen,
            position,
            self.truth.goals(),
            self.config.turn_weight,
        );
        match plan.first_step().and_then(|next| position.direction_to(next)) {
            Some(direction) => {
                let label = format!("speed run {}", state.run_count);
                state.advance_to(direction, &label);
            }
            None => state.enter(
                Phase::Explore,
                String::from("no known route to a goal during the speed run; exploring"),
            ),
        }
    }
}
