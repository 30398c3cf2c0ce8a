use micromaze_core::{Cell, Direction, GridSize, WallView};
use micromaze_system_generator::{GeneratorConfig, MazeGenerator};
use micromaze_system_planning::{
    dijkstra, plan, wall_follower, CostMap, PlanStatus, Strategy, UNREACHABLE,
};
use micromaze_world::WallGraph;

fn generated(config: GeneratorConfig, seed: u64) -> WallGraph {
    let mut graph = WallGraph::new(GridSize::Sixteen);
    let mut generator = MazeGenerator::new(config, seed).expect("valid config");
    let _ = generator.generate(&mut graph).expect("maze generated");
    graph
}

/// Single corridor from the start north to row 7, then east to the goal block.
fn corridor() -> WallGraph {
    let mut graph = WallGraph::new(GridSize::Sixteen);
    graph.fill_interior();
    for row in 8..16 {
        let _ = graph
            .remove_wall(Cell::new(row, 0), Direction::North)
            .expect("interior wall");
    }
    for column in 0..7 {
        let _ = graph
            .remove_wall(Cell::new(7, column), Direction::East)
            .expect("interior wall");
    }
    graph
}

#[test]
fn every_strategy_follows_the_only_corridor() {
    let graph = corridor();
    for strategy in Strategy::ALL {
        let outcome = plan(strategy, &graph, graph.start(), graph.goals(), 1.0).expect("plan");
        assert_eq!(
            outcome.status,
            PlanStatus::Reached {
                steps: 15,
                turns: 1,
                cost: 16.0,
            },
            "{strategy}"
        );
        assert_eq!(outcome.path.first(), Some(&Cell::new(15, 0)));
        assert_eq!(outcome.path.last(), Some(&Cell::new(7, 7)));
    }
}

#[test]
fn disconnected_goals_are_unreachable_for_every_strategy() {
    let mut graph = WallGraph::new(GridSize::Sixteen);
    let start = graph.start();
    for direction in [Direction::North, Direction::East] {
        let _ = graph
            .add_wall_safe(start, direction)
            .expect("interior wall");
    }
    for strategy in Strategy::ALL {
        let outcome = plan(strategy, &graph, start, graph.goals(), 1.0).expect("plan");
        assert_eq!(outcome.status, PlanStatus::Unreachable, "{strategy}");
        assert_eq!(outcome.path, vec![start]);
    }
}

#[test]
fn negative_turn_weights_are_rejected() {
    let graph = WallGraph::new(GridSize::Sixteen);
    assert!(plan(Strategy::Dijkstra, &graph, graph.start(), graph.goals(), -1.0).is_err());
    assert!(plan(Strategy::FloodFill, &graph, graph.start(), graph.goals(), f64::NAN).is_err());
}

#[test]
fn unweighted_dijkstra_matches_shortest_path_length() {
    for seed in 0..16 {
        let graph = generated(GeneratorConfig::default(), seed);
        let map = CostMap::compute(&graph, graph.goals());
        let shortest = usize::from(map.cost(graph.start()).expect("start inside grid"));

        let outcome = dijkstra::orthogonal(&graph, graph.start(), graph.goals(), 0.0);
        match outcome.status {
            PlanStatus::Reached { steps, .. } => assert_eq!(steps, shortest, "seed {seed}"),
            other => panic!("seed {seed}: {other}"),
        }
    }
}

#[test]
fn turn_weight_trades_steps_for_fewer_turns() {
    for seed in 0..8 {
        let graph = generated(GeneratorConfig::default(), seed);
        let free = dijkstra::orthogonal(&graph, graph.start(), graph.goals(), 0.0);
        let weighted = dijkstra::orthogonal(&graph, graph.start(), graph.goals(), 3.0);
        let (
            PlanStatus::Reached { steps: free_steps, turns: free_turns, .. },
            PlanStatus::Reached { steps, turns, .. },
        ) = (free.status, weighted.status)
        else {
            panic!("seed {seed}: both searches should reach a goal");
        };
        assert!(steps >= free_steps, "seed {seed}");
        assert!(turns <= free_turns, "seed {seed}");
    }
}

#[test]
fn paths_only_cross_open_edges() {
    let graph = generated(GeneratorConfig::default(), 3);
    let outcome = dijkstra::orthogonal(&graph, graph.start(), graph.goals(), 2.0);
    for pair in outcome.path.windows(2) {
        let direction = pair[0].direction_to(pair[1]).expect("adjacent cells");
        assert!(!graph.has_wall(pair[0], direction));
    }
}

#[test]
fn diagonal_moves_shorten_open_routes() {
    let graph = WallGraph::new(GridSize::Sixteen);
    let goal = [Cell::new(8, 7)];
    let outcome = dijkstra::diagonal(&graph, graph.start(), &goal, 0.0);
    let PlanStatus::Reached { steps, turns, cost } = outcome.status else {
        panic!("open grid is reachable");
    };
    assert_eq!(steps, 7);
    assert_eq!(turns, 0);
    assert!((cost - 7.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
}

#[test]
fn diagonal_search_is_never_costlier_than_orthogonal() {
    for seed in 0..8 {
        let graph = generated(GeneratorConfig::default(), seed);
        let orthogonal = dijkstra::orthogonal(&graph, graph.start(), graph.goals(), 1.0);
        let diagonal = dijkstra::diagonal(&graph, graph.start(), graph.goals(), 1.0);
        let (PlanStatus::Reached { cost: straight, .. }, PlanStatus::Reached { cost: angled, .. }) =
            (orthogonal.status, diagonal.status)
        else {
            panic!("seed {seed}: both searches should reach a goal");
        };
        assert!(angled <= straight + 1e-9, "seed {seed}");
    }
}

#[test]
fn flood_fill_is_zero_on_goals_and_grows_by_one() {
    for seed in 0..8 {
        let graph = generated(GeneratorConfig::default(), seed);
        let map = CostMap::compute(&graph, graph.goals());
        for goal in graph.goals() {
            assert_eq!(map.cost(*goal), Some(0));
        }
        for cell in graph.size().cells() {
            let cost = map.cost(cell).expect("cell inside grid");
            assert_ne!(cost, UNREACHABLE, "generated mazes are connected");
            let neighbours: Vec<u16> = Direction::ALL
                .into_iter()
                .filter_map(|direction| graph.open_neighbor(cell, direction))
                .filter_map(|neighbour| map.cost(neighbour))
                .collect();
            assert!(neighbours.iter().all(|other| other.abs_diff(cost) <= 1));
            if cost > 0 {
                assert!(neighbours.contains(&(cost - 1)), "seed {seed} at {cell}");
            }
        }
    }
}

#[test]
fn flood_fill_descent_is_a_shortest_path() {
    let graph = generated(GeneratorConfig::default(), 9);
    let map = CostMap::compute(&graph, graph.goals());
    let outcome = plan(Strategy::FloodFill, &graph, graph.start(), graph.goals(), 0.0).expect("plan");
    let costs: Vec<u16> = outcome
        .path
        .iter()
        .map(|cell| map.cost(*cell).expect("cell inside grid"))
        .collect();
    assert!(costs.windows(2).all(|pair| pair[1] + 1 == pair[0]));
    assert_eq!(costs.last(), Some(&0));
}

#[test]
fn wall_follower_solves_spanning_tree_mazes() {
    for seed in 0..12 {
        let mut graph = generated(GeneratorConfig::perfect(), seed);
        graph.set_goals([Cell::new(7, 7)]).expect("single goal");
        let outcome = wall_follower::plan(&graph, graph.start(), graph.goals(), 0.0);
        assert!(outcome.status.is_reached(), "seed {seed}: {}", outcome.status);
        assert_eq!(outcome.path.last(), Some(&Cell::new(7, 7)));
    }
}

#[test]
fn wall_follower_solves_spanning_trees_from_an_inner_start() {
    for seed in 0..40 {
        let mut graph = WallGraph::new(GridSize::Sixteen);
        graph.set_goals([Cell::new(7, 7)]).expect("single goal");
        graph.set_start(Cell::new(15, 5)).expect("start");
        let mut generator =
            MazeGenerator::new(GeneratorConfig::perfect(), seed).expect("valid config");
        let _ = generator.generate(&mut graph).expect("maze generated");

        let outcome = wall_follower::plan(&graph, graph.start(), graph.goals(), 0.0);
        assert!(outcome.status.is_reached(), "seed {seed}: {}", outcome.status);
    }
}

#[test]
fn walled_off_goal_block_is_unreachable_for_every_strategy() {
    let mut graph = WallGraph::new(GridSize::Sixteen);
    for (cell, sides) in [
        (Cell::new(7, 7), [Direction::North, Direction::West]),
        (Cell::new(7, 8), [Direction::North, Direction::East]),
        (Cell::new(8, 7), [Direction::South, Direction::West]),
        (Cell::new(8, 8), [Direction::South, Direction::East]),
    ] {
        for direction in sides {
            let _ = graph.add_wall_safe(cell, direction).expect("interior wall");
        }
    }

    for strategy in Strategy::ALL {
        let outcome =
            plan(strategy, &graph, graph.start(), graph.goals(), 1.0).expect("valid weight");
        assert_eq!(outcome.status, PlanStatus::Unreachable, "{strategy}");
        assert_eq!(outcome.status.to_string(), "goal unreachable");
    }
}
