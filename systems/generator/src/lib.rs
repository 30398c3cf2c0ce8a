#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized maze generation system.
//!
//! Each attempt carves a spanning tree with a depth-first backtracker, opens
//! extra loops, repairs isolated posts and finally verifies that every goal
//! is reachable from the start. Failed attempts are discarded and retried up
//! to a size-scaled budget; the caller's maze is only replaced on success.

use micromaze_core::{Cell, ConfigError, Direction, EditError, GridSize, Post, WallId};
use micromaze_world::{query, WallGraph};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, warn};

/// Probability with which each interior wall is removed to create loops.
pub const DEFAULT_LOOP_PROBABILITY: f64 = 0.15;

/// Tuning knobs controlling maze generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    loop_probability: f64,
    repair_posts: bool,
    max_attempts: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            loop_probability: DEFAULT_LOOP_PROBABILITY,
            repair_posts: true,
            max_attempts: None,
        }
    }
}

impl GeneratorConfig {
    /// Configuration producing a bare spanning tree: no loops and no post repair.
    #[must_use]
    pub fn perfect() -> Self {
        Self {
            loop_probability: 0.0,
            repair_posts: false,
            max_attempts: None,
        }
    }

    /// Sets the per-wall loop injection probability.
    #[must_use]
    pub fn with_loop_probability(mut self, loop_probability: f64) -> Self {
        self.loop_probability = loop_probability;
        self
    }

    /// Enables or disables opening an edge at every fully enclosed interior post.
    #[must_use]
    pub fn with_repair_posts(mut self, repair_posts: bool) -> Self {
        self.repair_posts = repair_posts;
        self
    }

    /// Overrides the attempt budget, which otherwise scales with the grid size.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Per-wall loop injection probability.
    #[must_use]
    pub const fn loop_probability(&self) -> f64 {
        self.loop_probability
    }

    /// Whether enclosed interior posts are repaired.
    #[must_use]
    pub const fn repair_posts(&self) -> bool {
        self.repair_posts
    }

    /// Number of attempts allowed for a grid of the given size.
    #[must_use]
    pub fn attempt_budget(&self, size: GridSize) -> u32 {
        self.max_attempts.unwrap_or(2 * size.side())
    }

    /// Checks that the configuration describes a usable generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.loop_probability) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability(self.loop_probability))
        }
    }
}

/// Failures reported by the generator.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    /// No attempt produced a maze whose goals are reachable from the start.
    #[error("no reachable maze found after {attempts} attempts")]
    Exhausted {
        /// Number of attempts that were made.
        attempts: u32,
    },
    /// A carving step was refused by the maze.
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Summary of a successful generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Attempt that succeeded, counting from one.
    pub attempts: u32,
    /// Interior walls removed by loop injection.
    pub walls_removed_for_loops: usize,
    /// Interior posts that received an opened edge during repair.
    pub posts_repaired: usize,
    /// Walls present in the final maze, perimeter included.
    pub wall_count: usize,
    /// Cells other than the start with a single open side.
    pub dead_ends: usize,
}

/// Seeded maze generator; the same seed and configuration always yield the same maze.
#[derive(Debug)]
pub struct MazeGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a generator seeded with `seed`.
    pub fn new(config: GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Configuration the generator runs with.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Replaces the walls of `graph` with a freshly generated maze.
    ///
    /// The start cell and goal set of `graph` are kept. On failure `graph`
    /// is left untouched.
    pub fn generate(&mut self, graph: &mut WallGraph) -> Result<GenerationReport, GenerationError> {
        let budget = self.config.attempt_budget(graph.size());

        for attempt in 1..=budget {
            let mut candidate = graph.clone();
            let (walls_removed_for_loops, posts_repaired) = self.carve(&mut candidate)?;

            let reachable = query::reaches_all(&candidate, candidate.start(), candidate.goals());
            let center_open = candidate.post_open_edges(candidate.size().center_post()) > 0;
            if reachable && center_open {
                let report = GenerationReport {
                    attempts: attempt,
                    walls_removed_for_loops,
                    posts_repaired,
                    wall_count: candidate.wall_count(),
                    dead_ends: query::dead_ends(&candidate, candidate.start()).len(),
                };
                debug!(?report, "maze generated");
                *graph = candidate;
                return Ok(report);
            }

            debug!(attempt, reachable, center_open, "rejected generated maze");
        }

        warn!(attempts = budget, "maze generation exhausted its attempt budget");
        Err(GenerationError::Exhausted { attempts: budget })
    }

    fn carve(&mut self, graph: &mut WallGraph) -> Result<(usize, usize), GenerationError> {
        let size = graph.size();
        let start = graph.start();
        let protected = start_box_wall(size, start);

        graph.fill_interior();
        self.backtrack(graph, protected)?;

        let walls_removed_for_loops = self.inject_loops(graph, protected)?;
        let posts_repaired = if self.config.repair_posts {
            self.repair_posts(graph, protected)?
        } else {
            0
        };
        Ok((walls_removed_for_loops, posts_repaired))
    }

    fn backtrack(
        &mut self,
        graph: &mut WallGraph,
        protected: Option<WallId>,
    ) -> Result<(), GenerationError> {
        let size = graph.size();
        let mut visited = vec![false; size.cell_count()];
        let start = graph.start();
        let mut stack = vec![start];
        mark(&mut visited, size, start);

        // The first carve always opens the north side of the start.
        let north = WallId::adjacent(start, Direction::North);
        if let Some(next) = start.neighbor(Direction::North) {
            if !north.is_perimeter(size) {
                let _ = graph.remove_segment(north)?;
                mark(&mut visited, size, next);
                stack.push(next);
            }
        }

        while let Some(&cell) = stack.last() {
            let unvisited: Vec<(Cell, WallId)> = Direction::ALL
                .into_iter()
                .filter_map(|direction| {
                    let neighbor = cell.neighbor(direction)?;
                    let index = size.index(neighbor)?;
                    let wall = WallId::adjacent(cell, direction);
                    (!visited[index] && Some(wall) != protected).then_some((neighbor, wall))
                })
                .collect();

            if unvisited.is_empty() {
                let _ = stack.pop();
                continue;
            }

            let (next, wall) = unvisited[self.rng.gen_range(0..unvisited.len())];
            let _ = graph.remove_segment(wall)?;
            mark(&mut visited, size, next);
            stack.push(next);
        }
        Ok(())
    }

    fn inject_loops(
        &mut self,
        graph: &mut WallGraph,
        protected: Option<WallId>,
    ) -> Result<usize, GenerationError> {
        let mut removed = 0;
        for wall in graph.interior_walls() {
            if Some(wall) == protected || !graph.wall(wall) {
                continue;
            }
            if self.rng.gen_bool(self.config.loop_probability) && graph.remove_segment(wall)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn repair_posts(
        &mut self,
        graph: &mut WallGraph,
        protected: Option<WallId>,
    ) -> Result<usize, GenerationError> {
        let size = graph.size();
        let mut repaired = 0;
        for post in interior_posts(size) {
            if graph.post_open_edges(post) > 0 {
                continue;
            }
            let candidates: Vec<WallId> = post
                .incident_walls(size)
                .into_iter()
                .filter(|wall| Some(*wall) != protected)
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let wall = candidates[self.rng.gen_range(0..candidates.len())];
            if graph.remove_segment(wall)? {
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}

/// Wall kept closed on the east side of the start cell, unless that side is the perimeter.
#[must_use]
pub fn start_box_wall(size: GridSize, start: Cell) -> Option<WallId> {
    let wall = WallId::adjacent(start, Direction::East);
    (!wall.is_perimeter(size)).then_some(wall)
}

/// Every post whose four incident segments lie inside the grid, in row-major order.
pub fn interior_posts(size: GridSize) -> impl Iterator<Item = Post> {
    let side = size.side();
    (1..side).flat_map(move |row| (1..side).map(move |column| Post::new(row, column)))
}

fn mark(visited: &mut [bool], size: GridSize, cell: Cell) {
    if let Some(index) = size.index(cell) {
        visited[index] = true;
    }
}
