//! Walls an exploring agent has sensed so far.

use micromaze_core::{Cell, Direction, GridSize, WallId, WallView};

use crate::grid::WallGrid;

/// Partial knowledge of a maze that only ever grows.
///
/// The perimeter is known before the first reading. Every other segment is
/// treated as open until sensed, so planners running over this view stay
/// optimistic about unexplored territory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeenWalls {
    walls: WallGrid,
    discovered: usize,
}

impl SeenWalls {
    /// Creates the knowledge of an agent that has not sensed anything yet.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        let mut walls = WallGrid::empty(size);
        walls.fill_perimeter();
        Self {
            walls,
            discovered: 0,
        }
    }

    /// Copies the walled sides of `cell` from `truth` and returns the segments seen for the first time.
    ///
    /// Segments already known, including the perimeter, are not reported again.
    pub fn reveal_around<V>(&mut self, truth: &V, cell: Cell) -> Vec<WallId>
    where
        V: WallView + ?Sized,
    {
        if !self.walls.size().contains(cell) {
            return Vec::new();
        }

        let mut newly_seen = Vec::new();
        for direction in Direction::ALL {
            if !truth.has_wall(cell, direction) {
                continue;
            }
            let wall = WallId::adjacent(cell, direction);
            if self.walls.set(wall, true) == Some(false) {
                self.discovered += 1;
                newly_seen.push(wall);
            }
        }
        newly_seen
    }

    /// Number of walls revealed by sensing, perimeter excluded.
    #[must_use]
    pub const fn discovered(&self) -> usize {
        self.discovered
    }

    /// Reports whether the segment is known to be walled.
    #[must_use]
    pub fn contains(&self, wall: WallId) -> bool {
        self.walls.get(wall).unwrap_or(false)
    }
}

impl WallView for SeenWalls {
    fn size(&self) -> GridSize {
        self.walls.size()
    }

    fn has_wall(&self, cell: Cell, direction: Direction) -> bool {
        self.walls.has_wall(cell, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WallGraph;

    #[test]
    fn perimeter_is_known_up_front() {
        let seen = SeenWalls::new(GridSize::Sixteen);
        assert!(seen.has_wall(Cell::new(15, 0), Direction::West));
        assert!(seen.has_wall(Cell::new(15, 0), Direction::South));
        assert!(!seen.has_wall(Cell::new(15, 0), Direction::East));
        assert_eq!(seen.discovered(), 0);
    }

    #[test]
    fn reveal_reports_each_wall_once() {
        let mut truth = WallGraph::new(GridSize::Sixteen);
        let cell = Cell::new(15, 0);
        let _ = truth
            .add_wall_safe(cell, Direction::East)
            .expect("interior wall");

        let mut seen = SeenWalls::new(GridSize::Sixteen);
        let first = seen.reveal_around(&truth, cell);
        assert_eq!(first, vec![WallId::Vertical { row: 15, column: 1 }]);
        assert_eq!(seen.discovered(), 1);

        let east = Cell::new(15, 1);
        assert!(seen.reveal_around(&truth, east).is_empty());
        assert!(seen.reveal_around(&truth, cell).is_empty());
        assert_eq!(seen.discovered(), 1);
        assert!(seen.contains(WallId::Vertical { row: 15, column: 1 }));
    }

    #[test]
    fn cells_outside_the_grid_reveal_nothing() {
        let truth = WallGraph::new(GridSize::Sixteen);
        let mut seen = SeenWalls::new(GridSize::Sixteen);
        assert!(seen.reveal_around(&truth, Cell::new(40, 40)).is_empty());
        assert!(seen.has_wall(Cell::new(40, 40), Direction::North));
    }
}
