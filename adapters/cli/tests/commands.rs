use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn micromaze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_micromaze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run the micromaze binary")
}

fn scratch(name: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!("micromaze-cli-{}", std::process::id()));
    fs::create_dir_all(&directory).expect("scratch directory");
    directory.join(name)
}

#[test]
fn generated_maze_is_solved_by_every_strategy() {
    let maze = scratch("generated.json");
    let maze = maze.to_str().expect("utf-8 path");

    let generated = micromaze(&["generate", "--seed", "3", "--output", maze]);
    assert!(generated.status.success(), "{generated:?}");

    let solved = micromaze(&["solve", maze, "--turn-weight", "0.5"]);
    assert!(solved.status.success(), "{solved:?}");
    let stdout = String::from_utf8_lossy(&solved.stdout);
    for name in ["dijkstra", "diagonal", "flood-fill"] {
        assert!(
            stdout
                .lines()
                .any(|line| line.starts_with(&format!("{name}: goal reached"))),
            "{name} missing from {stdout}"
        );
    }
}

#[test]
fn generate_prints_a_drawing_without_output_file() {
    let printed = micromaze(&["generate", "--seed", "1", "--size", "32"]);
    assert!(printed.status.success(), "{printed:?}");
    let stdout = String::from_utf8_lossy(&printed.stdout);
    assert_eq!(stdout.lines().count(), 65);
}

#[test]
fn simulation_succeeds_on_a_generated_maze() {
    let maze = scratch("simulated.txt");
    let maze = maze.to_str().expect("utf-8 path");
    assert!(micromaze(&["generate", "--seed", "5", "--output", maze])
        .status
        .success());

    let simulated = micromaze(&["simulate", maze, "--max-ticks", "20000"]);
    assert!(simulated.status.success(), "{simulated:?}");
    assert!(String::from_utf8_lossy(&simulated.stdout).contains("runs"));
}

#[test]
fn settings_file_supplies_generator_values() {
    let settings = scratch("settings.toml");
    fs::write(&settings, "[generator]\nseed = 9\n").expect("settings written");
    let settings = settings.to_str().expect("utf-8 path");

    let from_file = micromaze(&["--config", settings, "generate"]);
    let from_flag = micromaze(&["generate", "--seed", "9"]);
    assert!(from_file.status.success(), "{from_file:?}");
    assert_eq!(from_file.stdout, from_flag.stdout);
}

#[test]
fn unreadable_maze_is_reported() {
    let missing = scratch("missing.txt");
    let output = micromaze(&["flood", missing.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read maze file"));
}

#[test]
fn flood_prints_zero_on_the_goal_block() {
    let maze = scratch("flooded.txt");
    let maze = maze.to_str().expect("utf-8 path");
    assert!(micromaze(&["generate", "--seed", "2", "--output", maze])
        .status
        .success());

    let flooded = micromaze(&["flood", maze]);
    assert!(flooded.status.success(), "{flooded:?}");
    let stdout = String::from_utf8_lossy(&flooded.stdout);
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 16);
    assert!(rows.iter().all(|row| row.len() == 64));
    for row in [7, 8] {
        assert_eq!(&rows[row][28..32], "   0");
        assert_eq!(&rows[row][32..36], "   0");
    }
}

#[test]
fn solve_draws_the_chosen_path() {
    let maze = scratch("drawn.txt");
    let maze = maze.to_str().expect("utf-8 path");
    assert!(micromaze(&["generate", "--seed", "6", "--output", maze])
        .status
        .success());

    let solved = micromaze(&["solve", maze, "--strategy", "dijkstra", "--draw"]);
    assert!(solved.status.success(), "{solved:?}");
    let stdout = String::from_utf8_lossy(&solved.stdout);
    assert!(stdout.starts_with("dijkstra: goal reached"));
    assert_eq!(stdout.lines().count(), 2 + 33);
    assert!(stdout.contains('*'));
}
