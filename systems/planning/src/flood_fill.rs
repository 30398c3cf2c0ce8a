//! Flood-fill cost map built by a multi-source breadth-first search.

use std::collections::VecDeque;

use micromaze_core::{Cell, Direction, GridSize, WallView};

use crate::PlanOutcome;

/// Cost assigned to cells no target can be reached from.
pub const UNREACHABLE: u16 = u16::MAX;

/// Dense step-count grid seeded from a set of target cells.
///
/// Each reachable cell stores the number of moves to its nearest target;
/// every other cell stores [`UNREACHABLE`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CostMap {
    size: GridSize,
    costs: Vec<u16>,
}

impl CostMap {
    /// Labels every cell of `view` with its distance to the nearest target.
    ///
    /// Targets outside the grid are ignored.
    #[must_use]
    pub fn compute<V>(view: &V, targets: &[Cell]) -> Self
    where
        V: WallView + ?Sized,
    {
        let size = view.size();
        let mut costs = vec![UNREACHABLE; size.cell_count()];
        let mut queue = VecDeque::new();

        for &target in targets {
            let Some(index) = size.index(target) else {
                continue;
            };
            if costs[index] == 0 {
                continue;
            }
            costs[index] = 0;
            queue.push_back(target);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = size.index(cell) else {
                continue;
            };
            let current = costs[current_index];
            if current >= UNREACHABLE.saturating_sub(1) {
                continue;
            }
            let next_cost = current + 1;

            for direction in Direction::ALL {
                let Some(neighbor) = view.open_neighbor(cell, direction) else {
                    continue;
                };
                let Some(neighbor_index) = size.index(neighbor) else {
                    continue;
                };
                if costs[neighbor_index] <= next_cost {
                    continue;
                }
                costs[neighbor_index] = next_cost;
                queue.push_back(neighbor);
            }
        }

        Self { size, costs }
    }

    /// Side length of the mapped grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Costs stored in row-major order.
    #[must_use]
    pub fn costs(&self) -> &[u16] {
        &self.costs
    }

    /// Cost recorded for the cell, if it lies within the grid.
    #[must_use]
    pub fn cost(&self, cell: Cell) -> Option<u16> {
        self.size
            .index(cell)
            .and_then(|index| self.costs.get(index).copied())
    }

    /// Reports whether some target can be reached from the cell.
    #[must_use]
    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.cost(cell).is_some_and(|cost| cost != UNREACHABLE)
    }

    /// Best improving move from `cell` for an agent facing `heading`.
    ///
    /// Only open moves into strictly cheaper cells qualify. Among those the
    /// cheapest neighbour wins, then the smallest turn (straight, quarter
    /// turn, reversal), then north, east, south, west order.
    #[must_use]
    pub fn best_move<V>(&self, view: &V, cell: Cell, heading: Direction) -> Option<Direction>
    where
        V: WallView + ?Sized,
    {
        let current = self.cost(cell)?;
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let neighbor = view.open_neighbor(cell, direction)?;
                let cost = self.cost(neighbor)?;
                (cost < current).then_some((cost, heading.quarter_turns_to(direction), direction))
            })
            .min_by_key(|(cost, turns, _)| (*cost, *turns))
            .map(|(_, _, direction)| direction)
    }
}

/// Descends the cost map from `start`, initially facing north, until a goal is reached.
pub fn plan<V>(view: &V, start: Cell, goals: &[Cell], turn_weight: f64) -> PlanOutcome
where
    V: WallView + ?Sized,
{
    let map = CostMap::compute(view, goals);
    if !map.is_reachable(start) {
        return PlanOutcome::unreachable(start);
    }

    let mut path = vec![start];
    let mut cell = start;
    let mut heading = Direction::North;
    while let Some(direction) = map.best_move(view, cell, heading) {
        let Some(next) = view.open_neighbor(cell, direction) else {
            break;
        };
        path.push(next);
        cell = next;
        heading = direction;
    }

    if map.cost(cell) == Some(0) {
        PlanOutcome::reached(path, turn_weight)
    } else {
        PlanOutcome::unreachable(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromaze_world::WallGraph;

    #[test]
    fn compute_sets_targets_to_zero() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let map = CostMap::compute(&graph, &[Cell::new(2, 1)]);

        assert_eq!(map.cost(Cell::new(2, 1)), Some(0));
        assert_eq!(map.cost(Cell::new(1, 1)), Some(1));
        assert_eq!(map.cost(Cell::new(0, 1)), Some(2));
        assert_eq!(map.cost(Cell::new(0, 0)), Some(3));
        assert_eq!(map.cost(Cell::new(16, 0)), None);
    }

    #[test]
    fn compute_respects_walls() {
        let mut graph = WallGraph::new(GridSize::Sixteen);
        let enclosed = Cell::new(0, 0);
        for direction in [Direction::East, Direction::South] {
            let _ = graph
                .add_wall_safe(enclosed, direction)
                .expect("interior wall");
        }
        let map = CostMap::compute(&graph, &[Cell::new(2, 1)]);

        assert_eq!(map.cost(enclosed), Some(UNREACHABLE));
        assert!(!map.is_reachable(enclosed));
        assert_eq!(map.cost(Cell::new(0, 1)), Some(2));
    }

    #[test]
    fn best_move_prefers_going_straight() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let map = CostMap::compute(&graph, &[Cell::new(0, 15)]);
        let cell = Cell::new(15, 0);

        assert_eq!(
            map.best_move(&graph, cell, Direction::North),
            Some(Direction::North)
        );
        assert_eq!(
            map.best_move(&graph, cell, Direction::East),
            Some(Direction::East)
        );
        assert_eq!(
            map.best_move(&graph, cell, Direction::South),
            Some(Direction::East)
        );
        assert_eq!(
            map.best_move(&graph, cell, Direction::West),
            Some(Direction::North)
        );
    }

    #[test]
    fn best_move_is_none_on_a_target() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let goal = Cell::new(4, 4);
        let map = CostMap::compute(&graph, &[goal]);
        assert_eq!(map.best_move(&graph, goal, Direction::North), None);
    }
}
