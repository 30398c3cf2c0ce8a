#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating, solving and simulating micromaze mazes.

mod settings;

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use micromaze_core::{Cell, GridSize};
use micromaze_format::{text, Encoding};
use micromaze_system_exploration::Simulator;
use micromaze_system_generator::MazeGenerator;
use micromaze_system_planning::{plan, CostMap, Strategy};
use micromaze_world::WallGraph;
use tracing_subscriber::EnvFilter;

use crate::settings::{GeneratorSettings, Settings, SimulationSettings};

/// Micromouse maze generator, solver and discovery simulator.
#[derive(Debug, Parser)]
#[command(name = "micromaze", version)]
struct Cli {
    /// TOML settings file with `[generator]` and `[simulation]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generates a maze and writes it to a file or standard output.
    Generate {
        /// Side length of the grid, 16 or 32.
        #[arg(long, default_value_t = 16)]
        size: u32,
        /// Destination file; `.json` selects the JSON document.
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        generator: GeneratorSettings,
    },
    /// Plans a route from the start to the goals with one or every strategy.
    Solve {
        /// Maze file to read.
        maze: PathBuf,
        /// Strategy to run; every strategy runs when omitted.
        #[arg(long, short)]
        strategy: Option<Strategy>,
        /// Extra cost charged for every change of heading.
        #[arg(long)]
        turn_weight: Option<f64>,
        /// Draws the chosen path over the maze.
        #[arg(long)]
        draw: bool,
    },
    /// Prints the flood-fill distance of every cell to the nearest goal.
    Flood {
        /// Maze file to read.
        maze: PathBuf,
    },
    /// Runs the explore, return and speed-run protocol on a maze.
    Simulate {
        /// Maze file to read.
        maze: PathBuf,
        /// Prints the status of every tick.
        #[arg(long, short)]
        verbose: bool,
        #[command(flatten)]
        simulation: SimulationSettings,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            size,
            output,
            generator,
        } => generate(size, output.as_deref(), generator.or(settings.generator)),
        Command::Solve {
            maze,
            strategy,
            turn_weight,
            draw,
        } => {
            let simulation = SimulationSettings {
                turn_weight,
                max_ticks: None,
            }
            .or(settings.simulation);
            solve(&maze, strategy, simulation.turn_weight(), draw)
        }
        Command::Flood { maze } => flood(&maze),
        Command::Simulate {
            maze,
            verbose,
            simulation,
        } => simulate(&maze, verbose, &simulation.or(settings.simulation)),
    }
}

fn generate(size: u32, output: Option<&Path>, settings: GeneratorSettings) -> Result<()> {
    let size = GridSize::try_from(size).context("invalid --size")?;
    let mut generator = MazeGenerator::new(settings.config(), settings.seed())
        .context("invalid generator settings")?;
    let mut maze = WallGraph::new(size);
    let report = generator
        .generate(&mut maze)
        .with_context(|| format!("failed to generate a {size} maze"))?;
    tracing::info!(
        seed = settings.seed(),
        attempts = report.attempts,
        walls = report.wall_count,
        loops = report.walls_removed_for_loops,
        repaired = report.posts_repaired,
        dead_ends = report.dead_ends,
        "maze generated"
    );

    match output {
        Some(path) => {
            let encoded = Encoding::for_path(path).encode(&maze)?;
            fs::write(path, encoded)
                .with_context(|| format!("failed to write maze to {}", path.display()))?;
        }
        None => print!("{}", text::encode(&maze)),
    }
    Ok(())
}

fn solve(path: &Path, strategy: Option<Strategy>, turn_weight: f64, draw: bool) -> Result<()> {
    let maze = load_maze(path)?;
    let strategies = match strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };

    for strategy in strategies {
        let outcome = plan(strategy, &maze, maze.start(), maze.goals(), turn_weight)
            .context("invalid planner settings")?;
        println!("{strategy}: {}", outcome.status);
        let route: Vec<String> = outcome.path.iter().map(Cell::to_string).collect();
        println!("  {}", route.join(" -> "));
        if draw {
            print!("{}", overlay(&text::encode(&maze), &outcome.path));
        }
    }
    Ok(())
}

fn flood(path: &Path) -> Result<()> {
    let maze = load_maze(path)?;
    let costs = CostMap::compute(&maze, maze.goals());
    let side = maze.size().side();

    let mut out = String::new();
    for row in 0..side {
        for column in 0..side {
            let _ = match costs.cost(Cell::new(row, column)) {
                Some(cost) => write!(out, "{cost:>4}"),
                None => write!(out, "{:>4}", "--"),
            };
        }
        out.push('\n');
    }
    print!("{out}");
    Ok(())
}

fn simulate(path: &Path, verbose: bool, settings: &SimulationSettings) -> Result<()> {
    let maze = load_maze(path)?;
    let mut simulator =
        Simulator::new(&maze, settings.config()).context("invalid simulation settings")?;

    let max_ticks = settings.max_ticks();
    for _ in 0..max_ticks {
        let snapshot = simulator.advance();
        if verbose {
            println!("{:>6} {:<15} {}", snapshot.tick, snapshot.phase, snapshot.status);
        }
        if snapshot.is_finished() {
            break;
        }
    }

    let last = simulator.current();
    println!(
        "tick {}, {} runs, {} walls seen: {}",
        last.tick, last.run_count, last.discovered, last.status
    );
    match last.outcome {
        Some(outcome) if outcome.is_failure() => bail!("simulation ended with {outcome}"),
        Some(_) => Ok(()),
        None => bail!("simulation did not finish within {max_ticks} ticks"),
    }
}

fn load_maze(path: &Path) -> Result<WallGraph> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze file {}", path.display()))?;
    Encoding::for_path(path)
        .decode(&source)
        .with_context(|| format!("failed to decode maze file {}", path.display()))
}

/// Marks the cells of `path` with `*` in a text drawing, keeping start and goal markers.
fn overlay(drawing: &str, path: &[Cell]) -> String {
    let mut lines: Vec<Vec<u8>> = drawing.lines().map(|line| line.as_bytes().to_vec()).collect();
    for cell in path {
        let line = 2 * cell.row() as usize + 1;
        let column = 4 * cell.column() as usize + 2;
        if let Some(mark) = lines.get_mut(line).and_then(|line| line.get_mut(column)) {
            if *mark == b' ' {
                *mark = b'*';
            }
        }
    }
    lines
        .into_iter()
        .map(|line| String::from_utf8_lossy(&line).into_owned() + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn strategies_parse_from_their_names() {
        let cli = Cli::try_parse_from(["micromaze", "solve", "maze.txt", "--strategy", "flood-fill"])
            .expect("arguments parse");
        assert!(matches!(
            cli.command,
            Command::Solve {
                strategy: Some(Strategy::FloodFill),
                ..
            }
        ));
        assert!(Cli::try_parse_from(["micromaze", "solve", "maze.txt", "-s", "astar"]).is_err());
    }

    #[test]
    fn overlay_marks_open_fields_only() {
        let maze = WallGraph::new(GridSize::Sixteen);
        let path = [Cell::new(15, 0), Cell::new(14, 0), Cell::new(14, 1)];
        let drawn = overlay(&text::encode(&maze), &path);
        let lines: Vec<&str> = drawn.lines().collect();

        assert_eq!(&lines[31][..4], "| S ");
        assert_eq!(&lines[29][..8], "| *   * ");
    }
}
