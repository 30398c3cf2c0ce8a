#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for micromaze.
//!
//! [`WallGraph`] owns the walls, the start cell and the goal set of one maze
//! and enforces their invariants on every mutation: the perimeter stays
//! walled, the center post is never fully enclosed and the start never joins
//! the goals. [`SeenWalls`] is the partial copy an exploring agent builds up.
//! Both answer the [`WallView`] queries the planners depend on.

mod grid;
pub mod seen;

use micromaze_core::{
    Cell, Command, ConfigError, Direction, EditError, Event, GridSize, Post, WallId, WallView,
};
use tracing::debug;

use crate::grid::{all_walls, WallGrid};

pub use crate::seen::SeenWalls;

/// Walls, start cell and goal set of a single maze.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WallGraph {
    walls: WallGrid,
    start: Cell,
    goals: Vec<Cell>,
}

impl WallGraph {
    /// Creates an open maze with a walled perimeter and the conventional start and goals.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        let mut walls = WallGrid::empty(size);
        walls.fill_perimeter();
        let mut goals = size.default_goals();
        goals.sort_unstable();
        Self {
            walls,
            start: size.default_start(),
            goals,
        }
    }

    /// Assembles a maze from raw wall arrays.
    ///
    /// `horizontal` must hold `side + 1` rows of `side` flags and `vertical`
    /// `side` rows of `side + 1` flags. The perimeter is forced walled.
    pub fn from_parts(
        size: GridSize,
        horizontal: &[Vec<bool>],
        vertical: &[Vec<bool>],
        start: Cell,
        goals: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, ConfigError> {
        let walls = WallGrid::from_rows(size, horizontal, vertical)?;
        let mut graph = Self {
            walls,
            start,
            goals: Vec::new(),
        };
        if !size.contains(start) {
            return Err(ConfigError::OutOfBounds(start));
        }
        graph.set_goals(goals)?;
        graph.initialize_outer_boundary();
        Ok(graph)
    }

    /// Side length of the maze.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.walls.size()
    }

    /// Cell the agent starts from.
    #[must_use]
    pub const fn start(&self) -> Cell {
        self.start
    }

    /// Goal cells in ascending order.
    #[must_use]
    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    /// Reports whether the cell belongs to the goal set.
    #[must_use]
    pub fn is_goal(&self, cell: Cell) -> bool {
        self.goals.binary_search(&cell).is_ok()
    }

    /// Reports whether the segment is walled; segments outside the grid always are.
    #[must_use]
    pub fn wall(&self, wall: WallId) -> bool {
        self.walls.get(wall).unwrap_or(true)
    }

    /// Number of walled segments, perimeter included.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.count()
    }

    /// Every segment that does not belong to the perimeter, walled or not.
    #[must_use]
    pub fn interior_walls(&self) -> Vec<WallId> {
        let size = self.size();
        all_walls(size)
            .filter(|wall| !wall.is_perimeter(size))
            .collect()
    }

    /// Horizontal wall flags, one row per grid line from north to south.
    #[must_use]
    pub fn horizontal_rows(&self) -> Vec<Vec<bool>> {
        self.walls.horizontal_rows()
    }

    /// Vertical wall flags, one row per cell row from north to south.
    #[must_use]
    pub fn vertical_rows(&self) -> Vec<Vec<bool>> {
        self.walls.vertical_rows()
    }

    /// Marks every cell reachable from `origin`, indexed row-major.
    #[must_use]
    pub fn reachable_from(&self, origin: Cell) -> Vec<bool> {
        query::reachable_from(self, origin)
    }

    /// Flips the wall on one side of a cell and returns its new state.
    ///
    /// Adding follows the same rules as [`WallGraph::add_wall_safe`].
    pub fn toggle_wall(&mut self, cell: Cell, direction: Direction) -> Result<bool, EditError> {
        let wall = self.editable_wall(cell, direction)?;
        if self.wall(wall) {
            let _ = self.walls.set(wall, false);
            Ok(false)
        } else {
            self.place_wall(wall)?;
            Ok(true)
        }
    }

    /// Removes the wall on one side of a cell, reporting whether anything changed.
    pub fn remove_wall(&mut self, cell: Cell, direction: Direction) -> Result<bool, EditError> {
        let wall = self.editable_wall(cell, direction)?;
        self.remove_segment(wall)
    }

    /// Removes a wall segment by identifier, reporting whether anything changed.
    pub fn remove_segment(&mut self, wall: WallId) -> Result<bool, EditError> {
        let size = self.size();
        if !wall.is_within(size) {
            return Err(EditError::OutOfBounds(Cell::new(
                segment_row(wall),
                segment_column(wall),
            )));
        }
        if wall.is_perimeter(size) {
            return Err(EditError::PerimeterWall(wall));
        }
        Ok(self.walls.set(wall, false) == Some(true))
    }

    /// Places a wall on one side of a cell unless it would fully enclose the center post.
    ///
    /// Returns whether the wall was newly placed. Perimeter segments are
    /// already walled and report `false`.
    pub fn add_wall_safe(&mut self, cell: Cell, direction: Direction) -> Result<bool, EditError> {
        if !self.size().contains(cell) {
            return Err(EditError::OutOfBounds(cell));
        }
        let wall = WallId::adjacent(cell, direction);
        if self.wall(wall) {
            return Ok(false);
        }
        self.place_wall(wall)?;
        Ok(true)
    }

    /// Forces every perimeter segment walled.
    pub fn initialize_outer_boundary(&mut self) {
        self.walls.fill_perimeter();
    }

    /// Removes every interior wall.
    pub fn clear_interior(&mut self) {
        self.walls.set_interior(false);
    }

    /// Walls every interior segment, the starting point of maze carving.
    ///
    /// This is the one mutation allowed to enclose the center post; carving
    /// is expected to reopen it.
    pub fn fill_interior(&mut self) {
        self.walls.set_interior(true);
    }

    /// Moves the start cell.
    pub fn set_start(&mut self, cell: Cell) -> Result<(), EditError> {
        if !self.size().contains(cell) {
            return Err(EditError::OutOfBounds(cell));
        }
        if self.is_goal(cell) {
            return Err(EditError::StartOnGoal(cell));
        }
        self.start = cell;
        Ok(())
    }

    /// Replaces the goal set.
    pub fn set_goals(&mut self, goals: impl IntoIterator<Item = Cell>) -> Result<(), ConfigError> {
        let mut goals: Vec<Cell> = goals.into_iter().collect();
        goals.sort_unstable();
        goals.dedup();

        if goals.is_empty() {
            return Err(ConfigError::EmptyGoals);
        }
        if let Some(outside) = goals.iter().find(|goal| !self.size().contains(**goal)) {
            return Err(ConfigError::OutOfBounds(*outside));
        }
        if goals.binary_search(&self.start).is_ok() {
            return Err(ConfigError::StartOnGoal(self.start));
        }

        self.goals = goals;
        Ok(())
    }

    /// Adds the cell to or removes it from the goal set, returning its new membership.
    pub fn toggle_goal(&mut self, cell: Cell) -> Result<bool, EditError> {
        if !self.size().contains(cell) {
            return Err(EditError::OutOfBounds(cell));
        }
        match self.goals.binary_search(&cell) {
            Ok(index) => {
                if self.goals.len() == 1 {
                    return Err(EditError::LastGoal);
                }
                let _ = self.goals.remove(index);
                Ok(false)
            }
            Err(index) => {
                if cell == self.start {
                    return Err(EditError::StartOnGoal(cell));
                }
                self.goals.insert(index, cell);
                Ok(true)
            }
        }
    }

    /// Number of segments touching the post that are open.
    ///
    /// Segments outside the grid do not exist and are not counted.
    #[must_use]
    pub fn post_open_edges(&self, post: Post) -> usize {
        post.incident_walls(self.size())
            .into_iter()
            .filter(|wall| !self.wall(*wall))
            .count()
    }

    fn editable_wall(&self, cell: Cell, direction: Direction) -> Result<WallId, EditError> {
        if !self.size().contains(cell) {
            return Err(EditError::OutOfBounds(cell));
        }
        let wall = WallId::adjacent(cell, direction);
        if wall.is_perimeter(self.size()) {
            return Err(EditError::PerimeterWall(wall));
        }
        Ok(wall)
    }

    fn place_wall(&mut self, wall: WallId) -> Result<(), EditError> {
        let center = self.size().center_post();
        let incident = center.incident_walls(self.size());
        let encloses = incident.contains(&wall)
            && incident
                .iter()
                .filter(|other| **other != wall)
                .all(|other| self.wall(*other));
        if encloses {
            return Err(EditError::EnclosesCenterPost(center));
        }
        let _ = self.walls.set(wall, true);
        Ok(())
    }
}

impl WallView for WallGraph {
    fn size(&self) -> GridSize {
        self.walls.size()
    }

    fn has_wall(&self, cell: Cell, direction: Direction) -> bool {
        self.walls.has_wall(cell, direction)
    }
}

/// Applies the provided edit to the maze and reports the outcome as events.
pub fn apply(graph: &mut WallGraph, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::ToggleWall { cell, direction } => {
            graph.toggle_wall(cell, direction).map(|present| {
                out_events.push(Event::WallChanged {
                    wall: WallId::adjacent(cell, direction),
                    present,
                });
            })
        }
        Command::AddWall { cell, direction } => {
            graph.add_wall_safe(cell, direction).map(|placed| {
                if placed {
                    out_events.push(Event::WallChanged {
                        wall: WallId::adjacent(cell, direction),
                        present: true,
                    });
                }
            })
        }
        Command::RemoveWall { cell, direction } => {
            graph.remove_wall(cell, direction).map(|removed| {
                if removed {
                    out_events.push(Event::WallChanged {
                        wall: WallId::adjacent(cell, direction),
                        present: false,
                    });
                }
            })
        }
        Command::SetStart { cell } => {
            let from = graph.start();
            graph.set_start(cell).map(|()| {
                if from != cell {
                    out_events.push(Event::StartMoved { from, to: cell });
                }
            })
        }
        Command::ToggleGoal { cell } => graph.toggle_goal(cell).map(|goal| {
            out_events.push(Event::GoalToggled { cell, goal });
        }),
        Command::ClearWalls => {
            graph.clear_interior();
            out_events.push(Event::GridReset { size: graph.size() });
            Ok(())
        }
        Command::Resize { size } => {
            *graph = WallGraph::new(size);
            out_events.push(Event::GridReset { size });
            Ok(())
        }
    };

    if let Err(reason) = outcome {
        debug!(?command, %reason, "edit rejected");
        out_events.push(Event::EditRejected { command, reason });
    }
}

fn segment_row(wall: WallId) -> u32 {
    match wall {
        WallId::Horizontal { row, .. } | WallId::Vertical { row, .. } => row,
    }
}

fn segment_column(wall: WallId) -> u32 {
    match wall {
        WallId::Horizontal { column, .. } | WallId::Vertical { column, .. } => column,
    }
}

/// Query functions that provide read-only analysis of a maze.
pub mod query {
    use std::collections::VecDeque;

    use micromaze_core::{Cell, Direction, WallView};

    /// Marks every cell reachable from `origin` through open edges, indexed row-major.
    ///
    /// An origin outside the grid reaches nothing.
    #[must_use]
    pub fn reachable_from<V>(view: &V, origin: Cell) -> Vec<bool>
    where
        V: WallView + ?Sized,
    {
        let size = view.size();
        let mut reached = vec![false; size.cell_count()];
        let Some(origin_index) = size.index(origin) else {
            return reached;
        };

        reached[origin_index] = true;
        let mut queue = VecDeque::from([origin]);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(neighbor) = view.open_neighbor(cell, direction) else {
                    continue;
                };
                let Some(index) = size.index(neighbor) else {
                    continue;
                };
                if !reached[index] {
                    reached[index] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        reached
    }

    /// Reports whether every target is reachable from `origin`.
    #[must_use]
    pub fn reaches_all<V>(view: &V, origin: Cell, targets: &[Cell]) -> bool
    where
        V: WallView + ?Sized,
    {
        let size = view.size();
        let reached = reachable_from(view, origin);
        targets.iter().all(|target| {
            size.index(*target)
                .and_then(|index| reached.get(index).copied())
                .unwrap_or(false)
        })
    }

    /// Reports whether at least one target is reachable from `origin`.
    #[must_use]
    pub fn reaches_any<V>(view: &V, origin: Cell, targets: &[Cell]) -> bool
    where
        V: WallView + ?Sized,
    {
        let size = view.size();
        let reached = reachable_from(view, origin);
        targets.iter().any(|target| {
            size.index(*target)
                .and_then(|index| reached.get(index).copied())
                .unwrap_or(false)
        })
    }

    /// Cells with exactly one open side, excluding `origin`.
    #[must_use]
    pub fn dead_ends<V>(view: &V, origin: Cell) -> Vec<Cell>
    where
        V: WallView + ?Sized,
    {
        view.size()
            .cells()
            .filter(|cell| *cell != origin)
            .filter(|cell| {
                Direction::ALL
                    .into_iter()
                    .filter(|direction| view.open_neighbor(*cell, *direction).is_some())
                    .count()
                    == 1
            })
            .collect()
    }
}
