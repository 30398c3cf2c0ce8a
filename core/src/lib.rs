#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the micromaze engine.
//!
//! This crate defines the vocabulary every other crate speaks: grid sizes,
//! cells, posts, wall identifiers and the [`WallView`] capability that lets
//! planners query connectivity without knowing how walls are stored. Editors
//! submit [`Command`] values, the world executes them through its `apply`
//! entry point and answers with [`Event`] values describing what changed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported side lengths of a maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    /// Classic 16 by 16 competition maze.
    Sixteen,
    /// Half-size cell 32 by 32 maze.
    ThirtyTwo,
}

impl GridSize {
    /// Number of cells along one side of the grid.
    #[must_use]
    pub const fn side(self) -> u32 {
        match self {
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        let side = self.side() as usize;
        side * side
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.row < self.side() && cell.column < self.side()
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let side = usize::try_from(self.side()).ok()?;
        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        row.checked_mul(side)?.checked_add(column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }
        let side = self.side() as usize;
        let row = u32::try_from(index / side).ok()?;
        let column = u32::try_from(index % side).ok()?;
        Some(Cell::new(row, column))
    }

    /// Iterates every cell of the grid in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let side = self.side();
        (0..side).flat_map(move |row| (0..side).map(move |column| Cell::new(row, column)))
    }

    /// Post at the geometric center of the grid.
    #[must_use]
    pub const fn center_post(self) -> Post {
        let half = self.side() / 2;
        Post::new(half, half)
    }

    /// Conventional start cell in the south-west corner.
    #[must_use]
    pub const fn default_start(self) -> Cell {
        Cell::new(self.side() - 1, 0)
    }

    /// Conventional goal block made of the four cells around the center post.
    #[must_use]
    pub fn default_goals(self) -> Vec<Cell> {
        let half = self.side() / 2;
        vec![
            Cell::new(half - 1, half - 1),
            Cell::new(half - 1, half),
            Cell::new(half, half - 1),
            Cell::new(half, half),
        ]
    }
}

impl TryFrom<u32> for GridSize {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            16 => Ok(Self::Sixteen),
            32 => Ok(Self::ThirtyTwo),
            other => Err(ConfigError::UnsupportedGridSize(other)),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{side}x{side}", side = self.side())
    }
}

/// Location of a single maze cell expressed as row and column indices.
///
/// Row zero is the northern edge of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: u32,
    column: u32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Cell one step away along the bearing, ignoring walls and the upper grid bound.
    #[must_use]
    pub fn step(self, bearing: Bearing) -> Option<Cell> {
        let (row_delta, column_delta) = bearing.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        Some(Cell::new(row, column))
    }

    /// Orthogonal neighbour in the provided direction, ignoring walls and the upper grid bound.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Cell> {
        self.step(Bearing::from(direction))
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Direction leading from this cell to an orthogonally adjacent one.
    #[must_use]
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.neighbor(*direction) == Some(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cardinal headings an agent may face or move along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All cardinal directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Heading obtained by a 90 degree counter-clockwise turn.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Heading obtained by a 90 degree clockwise turn.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Opposite heading.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Number of quarter turns separating two headings: 0 straight, 1 a side turn, 2 a reversal.
    #[must_use]
    pub const fn quarter_turns_to(self, other: Direction) -> u8 {
        let difference = (other.index() + 4 - self.index()) % 4;
        if difference == 3 {
            1
        } else {
            difference
        }
    }

    const fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// One of the eight compass bearings used by diagonal planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bearing {
    /// Straight north.
    North,
    /// Diagonal between north and east.
    NorthEast,
    /// Straight east.
    East,
    /// Diagonal between south and east.
    SouthEast,
    /// Straight south.
    South,
    /// Diagonal between south and west.
    SouthWest,
    /// Straight west.
    West,
    /// Diagonal between north and west.
    NorthWest,
}

impl Bearing {
    /// All eight bearings in clockwise order starting at north.
    pub const ALL: [Bearing; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The four orthogonal bearings in clockwise order starting at north.
    pub const CARDINAL: [Bearing; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Row and column offsets travelled by one step along the bearing.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::NorthEast => (-1, 1),
            Self::East => (0, 1),
            Self::SouthEast => (1, 1),
            Self::South => (1, 0),
            Self::SouthWest => (1, -1),
            Self::West => (0, -1),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Cardinal direction matching an orthogonal bearing.
    #[must_use]
    pub const fn as_direction(self) -> Option<Direction> {
        match self {
            Self::North => Some(Direction::North),
            Self::East => Some(Direction::East),
            Self::South => Some(Direction::South),
            Self::West => Some(Direction::West),
            _ => None,
        }
    }

    /// Vertical and horizontal components of a diagonal bearing.
    #[must_use]
    pub const fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Self::NorthEast => Some((Direction::North, Direction::East)),
            Self::SouthEast => Some((Direction::South, Direction::East)),
            Self::SouthWest => Some((Direction::South, Direction::West)),
            Self::NorthWest => Some((Direction::North, Direction::West)),
            _ => None,
        }
    }

    /// Reports whether the bearing moves along both axes at once.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.components().is_some()
    }

    /// Travel cost of one step: `1.0` orthogonally and `√2` diagonally.
    #[must_use]
    pub fn step_cost(self) -> f64 {
        if self.is_diagonal() {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

impl From<Direction> for Bearing {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Self::North,
            Direction::East => Self::East,
            Direction::South => Self::South,
            Direction::West => Self::West,
        }
    }
}

/// Grid-line intersection between up to four cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Post {
    row: u32,
    column: u32,
}

impl Post {
    /// Creates a post located on the provided grid-line row and column.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Grid-line row of the post, between zero and the side length inclusive.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Grid-line column of the post, between zero and the side length inclusive.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Reports whether all four incident wall segments exist inside the grid.
    #[must_use]
    pub const fn is_interior(&self, size: GridSize) -> bool {
        self.row > 0 && self.column > 0 && self.row < size.side() && self.column < size.side()
    }

    /// Wall segments touching the post that exist within the grid.
    ///
    /// Segments are listed as north, east, south, west of the post.
    #[must_use]
    pub fn incident_walls(&self, size: GridSize) -> Vec<WallId> {
        let side = size.side();
        if self.row > side || self.column > side {
            return Vec::new();
        }

        let mut walls = Vec::with_capacity(4);
        if self.row > 0 {
            walls.push(WallId::Vertical {
                row: self.row - 1,
                column: self.column,
            });
        }
        if self.column < side {
            walls.push(WallId::Horizontal {
                row: self.row,
                column: self.column,
            });
        }
        if self.row < side {
            walls.push(WallId::Vertical {
                row: self.row,
                column: self.column,
            });
        }
        if self.column > 0 {
            walls.push(WallId::Horizontal {
                row: self.row,
                column: self.column - 1,
            });
        }
        walls
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post ({}, {})", self.row, self.column)
    }
}

/// Canonical identifier of one wall segment.
///
/// Horizontal segments lie on grid line `row` above cell `(row, column)`;
/// vertical segments lie on grid line `column` left of cell `(row, column)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallId {
    /// Segment separating a cell from its northern neighbour.
    Horizontal {
        /// Grid-line row, between zero and the side length inclusive.
        row: u32,
        /// Column of the cell beneath the segment.
        column: u32,
    },
    /// Segment separating a cell from its western neighbour.
    Vertical {
        /// Row of the cell beside the segment.
        row: u32,
        /// Grid-line column, between zero and the side length inclusive.
        column: u32,
    },
}

impl WallId {
    /// Identifier of the segment on the given side of a cell.
    #[must_use]
    pub const fn adjacent(cell: Cell, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::Horizontal {
                row: cell.row,
                column: cell.column,
            },
            Direction::South => Self::Horizontal {
                row: cell.row + 1,
                column: cell.column,
            },
            Direction::West => Self::Vertical {
                row: cell.row,
                column: cell.column,
            },
            Direction::East => Self::Vertical {
                row: cell.row,
                column: cell.column + 1,
            },
        }
    }

    /// Reports whether the segment exists within a grid of the given size.
    #[must_use]
    pub const fn is_within(&self, size: GridSize) -> bool {
        let side = size.side();
        match *self {
            Self::Horizontal { row, column } => row <= side && column < side,
            Self::Vertical { row, column } => row < side && column <= side,
        }
    }

    /// Reports whether the segment belongs to the outer perimeter.
    #[must_use]
    pub const fn is_perimeter(&self, size: GridSize) -> bool {
        let side = size.side();
        match *self {
            Self::Horizontal { row, .. } => row == 0 || row == side,
            Self::Vertical { column, .. } => column == 0 || column == side,
        }
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal { row, column } => write!(f, "horizontal wall ({row}, {column})"),
            Self::Vertical { row, column } => write!(f, "vertical wall ({row}, {column})"),
        }
    }
}

/// Read-only connectivity queries shared by the true maze and partial views of it.
///
/// Implementors only answer [`WallView::has_wall`]; movement legality is
/// derived from it so every planner sees identical rules regardless of
/// storage.
pub trait WallView {
    /// Side length of the viewed grid.
    fn size(&self) -> GridSize;

    /// Reports whether the side of `cell` facing `direction` is walled.
    ///
    /// Cells outside the grid always report a wall.
    fn has_wall(&self, cell: Cell, direction: Direction) -> bool;

    /// Neighbour reached by crossing the open side of `cell` facing `direction`.
    fn open_neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        if self.has_wall(cell, direction) {
            return None;
        }
        cell.neighbor(direction)
            .filter(|neighbor| self.size().contains(*neighbor))
    }

    /// Reports whether a diagonal step may be taken without cutting a closed corner.
    ///
    /// Both orthogonal routes around the crossed post must be open. Orthogonal
    /// bearings defer to [`WallView::open_neighbor`].
    fn can_move_diagonal(&self, cell: Cell, bearing: Bearing) -> bool {
        let Some((vertical, horizontal)) = bearing.components() else {
            return bearing
                .as_direction()
                .is_some_and(|direction| self.open_neighbor(cell, direction).is_some());
        };
        let Some(via_vertical) = self.open_neighbor(cell, vertical) else {
            return false;
        };
        let Some(via_horizontal) = self.open_neighbor(cell, horizontal) else {
            return false;
        };
        !self.has_wall(via_vertical, horizontal) && !self.has_wall(via_horizontal, vertical)
    }

    /// Cell reached by one legal step along the bearing.
    fn step(&self, cell: Cell, bearing: Bearing) -> Option<Cell> {
        match bearing.as_direction() {
            Some(direction) => self.open_neighbor(cell, direction),
            None if self.can_move_diagonal(cell, bearing) => cell.step(bearing),
            None => None,
        }
    }
}

/// Commands that express all permissible maze edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Flips the wall on one side of a cell.
    ToggleWall {
        /// Cell whose side is edited.
        cell: Cell,
        /// Side of the cell holding the wall.
        direction: Direction,
    },
    /// Places a wall unless doing so would enclose the center post.
    AddWall {
        /// Cell whose side is edited.
        cell: Cell,
        /// Side of the cell receiving the wall.
        direction: Direction,
    },
    /// Removes the wall on one side of a cell.
    RemoveWall {
        /// Cell whose side is edited.
        cell: Cell,
        /// Side of the cell losing the wall.
        direction: Direction,
    },
    /// Moves the start cell.
    SetStart {
        /// New start cell.
        cell: Cell,
    },
    /// Adds the cell to, or removes it from, the goal set.
    ToggleGoal {
        /// Cell whose goal membership flips.
        cell: Cell,
    },
    /// Removes every interior wall while keeping the perimeter.
    ClearWalls,
    /// Replaces the maze with an empty grid of a different size.
    Resize {
        /// Size of the replacement grid.
        size: GridSize,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a wall segment changed state.
    WallChanged {
        /// Segment that changed.
        wall: WallId,
        /// Whether the segment is now walled.
        present: bool,
    },
    /// Confirms that the start cell moved.
    StartMoved {
        /// Previous start cell.
        from: Cell,
        /// Current start cell.
        to: Cell,
    },
    /// Confirms that a cell joined or left the goal set.
    GoalToggled {
        /// Cell whose membership changed.
        cell: Cell,
        /// Whether the cell is now a goal.
        goal: bool,
    },
    /// Confirms that the grid was reset to an empty maze.
    GridReset {
        /// Size of the grid after the reset.
        size: GridSize,
    },
    /// Reports that an edit was refused.
    EditRejected {
        /// Command that was refused.
        command: Command,
        /// Invariant the edit would have violated.
        reason: EditError,
    },
}

/// Reasons an edit may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum EditError {
    /// Perimeter segments are permanently walled.
    #[error("{0} belongs to the outer perimeter")]
    PerimeterWall(WallId),
    /// The wall would close the last open edge of the center post.
    #[error("adding the wall would fully enclose the center {0}")]
    EnclosesCenterPost(Post),
    /// The referenced cell lies outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),
    /// The start cell can never be a goal.
    #[error("cell {0} cannot be both the start and a goal")]
    StartOnGoal(Cell),
    /// The goal set must keep at least one cell.
    #[error("the goal set cannot become empty")]
    LastGoal,
}

/// Invalid configuration supplied when building a maze or a run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Only 16 and 32 cell grids are supported.
    #[error("grid size {0} is not supported; expected 16 or 32")]
    UnsupportedGridSize(u32),
    /// At least one goal cell is required.
    #[error("the goal set is empty")]
    EmptyGoals,
    /// The start cell was placed on a goal.
    #[error("start cell {0} is also a goal")]
    StartOnGoal(Cell),
    /// A referenced cell lies outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),
    /// A wall array does not have the shape required by the grid size.
    #[error("{array} wall array must be {expected_rows}x{expected_columns}, found {rows} rows with a {columns}-wide row")]
    WallShape {
        /// Name of the offending array.
        array: &'static str,
        /// Row count required by the grid size.
        expected_rows: usize,
        /// Row width required by the grid size.
        expected_columns: usize,
        /// Row count that was supplied.
        rows: usize,
        /// Width of the first mismatching row, or of the first row when the count differs.
        columns: usize,
    },
    /// Turn weights must be finite and non-negative.
    #[error("turn weight {0} must be finite and non-negative")]
    InvalidTurnWeight(f64),
    /// Probabilities must lie in `[0, 1]`.
    #[error("probability {0} must lie between 0 and 1")]
    InvalidProbability(f64),
}

/// Validates a turn weight for the turn-penalised planners.
pub fn validate_turn_weight(turn_weight: f64) -> Result<f64, ConfigError> {
    if turn_weight.is_finite() && turn_weight >= 0.0 {
        Ok(turn_weight)
    } else {
        Err(ConfigError::InvalidTurnWeight(turn_weight))
    }
}
