//! Dense storage for the two wall arrays of a maze.

use micromaze_core::{Cell, ConfigError, Direction, GridSize, WallId};

/// Horizontal and vertical wall flags stored in row-major order.
///
/// The horizontal array has `side + 1` rows of `side` flags and the vertical
/// array has `side` rows of `side + 1` flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct WallGrid {
    size: GridSize,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

impl WallGrid {
    pub(crate) fn empty(size: GridSize) -> Self {
        let side = size.side() as usize;
        Self {
            size,
            horizontal: vec![false; (side + 1) * side],
            vertical: vec![false; side * (side + 1)],
        }
    }

    pub(crate) fn from_rows(
        size: GridSize,
        horizontal: &[Vec<bool>],
        vertical: &[Vec<bool>],
    ) -> Result<Self, ConfigError> {
        let side = size.side() as usize;
        check_shape("horizontal", horizontal, side + 1, side)?;
        check_shape("vertical", vertical, side, side + 1)?;
        Ok(Self {
            size,
            horizontal: horizontal.concat(),
            vertical: vertical.concat(),
        })
    }

    pub(crate) const fn size(&self) -> GridSize {
        self.size
    }

    pub(crate) fn get(&self, wall: WallId) -> Option<bool> {
        match self.slot(wall)? {
            Slot::Horizontal(index) => self.horizontal.get(index).copied(),
            Slot::Vertical(index) => self.vertical.get(index).copied(),
        }
    }

    /// Stores the flag and returns its previous value.
    pub(crate) fn set(&mut self, wall: WallId, present: bool) -> Option<bool> {
        let flag = match self.slot(wall)? {
            Slot::Horizontal(index) => self.horizontal.get_mut(index)?,
            Slot::Vertical(index) => self.vertical.get_mut(index)?,
        };
        Some(std::mem::replace(flag, present))
    }

    pub(crate) fn has_wall(&self, cell: Cell, direction: Direction) -> bool {
        if !self.size.contains(cell) {
            return true;
        }
        self.get(WallId::adjacent(cell, direction)).unwrap_or(true)
    }

    pub(crate) fn fill_perimeter(&mut self) {
        let size = self.size;
        for wall in all_walls(size).filter(|wall| wall.is_perimeter(size)) {
            let _ = self.set(wall, true);
        }
    }

    pub(crate) fn set_interior(&mut self, present: bool) {
        let size = self.size;
        for wall in all_walls(size).filter(|wall| !wall.is_perimeter(size)) {
            let _ = self.set(wall, present);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .filter(|present| **present)
            .count()
    }

    pub(crate) fn horizontal_rows(&self) -> Vec<Vec<bool>> {
        self.horizontal
            .chunks(self.size.side() as usize)
            .map(<[bool]>::to_vec)
            .collect()
    }

    pub(crate) fn vertical_rows(&self) -> Vec<Vec<bool>> {
        self.vertical
            .chunks(self.size.side() as usize + 1)
            .map(<[bool]>::to_vec)
            .collect()
    }

    fn slot(&self, wall: WallId) -> Option<Slot> {
        if !wall.is_within(self.size) {
            return None;
        }
        let side = self.size.side() as usize;
        match wall {
            WallId::Horizontal { row, column } => {
                Some(Slot::Horizontal(row as usize * side + column as usize))
            }
            WallId::Vertical { row, column } => {
                Some(Slot::Vertical(row as usize * (side + 1) + column as usize))
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Horizontal(usize),
    Vertical(usize),
}

/// Every wall segment of a grid, horizontal segments first, each in row-major order.
pub(crate) fn all_walls(size: GridSize) -> impl Iterator<Item = WallId> {
    let side = size.side();
    let horizontal = (0..=side)
        .flat_map(move |row| (0..side).map(move |column| WallId::Horizontal { row, column }));
    let vertical = (0..side)
        .flat_map(move |row| (0..=side).map(move |column| WallId::Vertical { row, column }));
    horizontal.chain(vertical)
}

fn check_shape(
    array: &'static str,
    rows: &[Vec<bool>],
    expected_rows: usize,
    expected_columns: usize,
) -> Result<(), ConfigError> {
    let mismatch = if rows.len() != expected_rows {
        Some(rows.first().map_or(0, Vec::len))
    } else {
        rows.iter()
            .map(Vec::len)
            .find(|columns| *columns != expected_columns)
    };

    match mismatch {
        None => Ok(()),
        Some(columns) => Err(ConfigError::WallShape {
            array,
            expected_rows,
            expected_columns,
            rows: rows.len(),
            columns,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_previous_state() {
        let mut grid = WallGrid::empty(GridSize::Sixteen);
        let wall = WallId::Vertical { row: 3, column: 4 };
        assert_eq!(grid.set(wall, true), Some(false));
        assert_eq!(grid.set(wall, true), Some(true));
        assert_eq!(grid.get(wall), Some(true));
        assert_eq!(grid.set(WallId::Vertical { row: 16, column: 0 }, true), None);
    }

    #[test]
    fn perimeter_fill_walls_exactly_the_border() {
        let mut grid = WallGrid::empty(GridSize::Sixteen);
        grid.fill_perimeter();
        assert_eq!(grid.count(), 4 * 16);
        assert!(grid.has_wall(Cell::new(0, 5), Direction::North));
        assert!(!grid.has_wall(Cell::new(0, 5), Direction::South));
    }

    #[test]
    fn interior_fill_leaves_the_perimeter_alone() {
        let mut grid = WallGrid::empty(GridSize::Sixteen);
        grid.set_interior(true);
        assert_eq!(grid.count(), 2 * 16 * 17 - 4 * 16);
        grid.fill_perimeter();
        grid.set_interior(false);
        assert_eq!(grid.count(), 4 * 16);
    }

    #[test]
    fn rows_round_trip_through_from_rows() {
        let mut grid = WallGrid::empty(GridSize::Sixteen);
        grid.fill_perimeter();
        let _ = grid.set(WallId::Horizontal { row: 7, column: 2 }, true);
        let rebuilt = WallGrid::from_rows(
            GridSize::Sixteen,
            &grid.horizontal_rows(),
            &grid.vertical_rows(),
        )
        .expect("shapes match");
        assert_eq!(rebuilt, grid);
    }

    #[test]
    fn from_rows_rejects_ragged_arrays() {
        let grid = WallGrid::empty(GridSize::Sixteen);
        let mut vertical = grid.vertical_rows();
        let _ = vertical[4].pop();
        let error = WallGrid::from_rows(GridSize::Sixteen, &grid.horizontal_rows(), &vertical)
            .expect_err("ragged row");
        assert!(matches!(
            error,
            ConfigError::WallShape {
                array: "vertical",
                columns: 16,
                ..
            }
        ));
    }
}
