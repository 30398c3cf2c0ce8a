//! JSON interchange document.
//!
//! ```json
//! {
//!   "grid_size": 16,
//!   "h_walls": [[true, ...], ...],
//!   "v_walls": [[true, ...], ...],
//!   "start_cell": [15, 0],
//!   "goal_cells": [[7, 7], [7, 8], [8, 7], [8, 8]]
//! }
//! ```
//!
//! `h_walls[r][c]` is the wall on the north side of cell `(r, c)` and
//! `v_walls[r][c]` the wall on its west side. A missing start falls back to
//! the bottom-left cell and missing goals to the central block.

use micromaze_core::{Cell, GridSize};
use micromaze_world::WallGraph;
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// Serialized form of a maze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeDocument {
    /// Side length of the grid.
    pub grid_size: u32,
    /// `grid_size + 1` rows of `grid_size` horizontal wall flags.
    pub h_walls: Vec<Vec<bool>>,
    /// `grid_size` rows of `grid_size + 1` vertical wall flags.
    pub v_walls: Vec<Vec<bool>>,
    /// Start cell as `[row, column]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cell: Option<[u32; 2]>,
    /// Goal cells as `[row, column]` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_cells: Option<Vec<[u32; 2]>>,
}

impl MazeDocument {
    /// Captures every wall, the start and the goals of a maze.
    #[must_use]
    pub fn from_graph(graph: &WallGraph) -> Self {
        Self {
            grid_size: graph.size().side(),
            h_walls: graph.horizontal_rows(),
            v_walls: graph.vertical_rows(),
            start_cell: Some(pair(graph.start())),
            goal_cells: Some(graph.goals().iter().copied().map(pair).collect()),
        }
    }

    /// Validates the document and builds the maze it describes.
    pub fn into_graph(self) -> Result<WallGraph, FormatError> {
        let size = GridSize::try_from(self.grid_size)?;
        let start = self
            .start_cell
            .map_or_else(|| size.default_start(), cell);
        let goals = match self.goal_cells {
            Some(goals) => goals.into_iter().map(cell).collect(),
            None => size.default_goals(),
        };
        WallGraph::from_parts(size, &self.h_walls, &self.v_walls, start, goals)
            .map_err(FormatError::from)
    }
}

fn pair(cell: Cell) -> [u32; 2] {
    [cell.row(), cell.column()]
}

fn cell([row, column]: [u32; 2]) -> Cell {
    Cell::new(row, column)
}

/// Serializes a maze as pretty-printed JSON.
pub fn encode(graph: &WallGraph) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&MazeDocument::from_graph(graph))?)
}

/// Parses a JSON maze document.
pub fn decode(input: &str) -> Result<WallGraph, FormatError> {
    let document: MazeDocument = serde_json::from_str(input)?;
    document.into_graph()
}
