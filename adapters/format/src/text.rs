//! Fixed-width text drawing of a maze.
//!
//! A maze of side `N` is drawn on `2N + 1` lines of `4N + 1` characters.
//! Even lines hold posts `o` separated by horizontal walls `---` or gaps;
//! odd lines hold vertical walls `|` or gaps separated by three-character
//! cell fields ` S `, ` G ` or blanks.
//!
//! ```text
//! o---o---o
//! | G     |
//! o   o---o
//! | S |   |
//! o---o---o
//! ```

use micromaze_core::{Cell, GridSize, WallId};
use micromaze_world::WallGraph;

use crate::FormatError;

const POST: &str = "o";
const HORIZONTAL_WALL: &str = "---";
const GAP: &str = "   ";
const VERTICAL_WALL: &str = "|";
const VERTICAL_GAP: &str = " ";
const START: &str = " S ";
const GOAL: &str = " G ";

/// Draws the maze, one line per grid row and wall row, each terminated by a newline.
#[must_use]
pub fn encode(graph: &WallGraph) -> String {
    let side = graph.size().side();
    let mut out = String::with_capacity((2 * side as usize + 1) * (4 * side as usize + 2));

    for row in 0..=side {
        for column in 0..side {
            out.push_str(POST);
            let wall = graph.wall(WallId::Horizontal { row, column });
            out.push_str(if wall { HORIZONTAL_WALL } else { GAP });
        }
        out.push_str(POST);
        out.push('\n');

        if row == side {
            break;
        }

        for column in 0..=side {
            let wall = graph.wall(WallId::Vertical { row, column });
            out.push_str(if wall { VERTICAL_WALL } else { VERTICAL_GAP });
            if column == side {
                break;
            }
            let cell = Cell::new(row, column);
            let field = if cell == graph.start() {
                START
            } else if graph.is_goal(cell) {
                GOAL
            } else {
                GAP
            };
            out.push_str(field);
        }
        out.push('\n');
    }
    out
}

/// Parses a maze drawing.
///
/// Carriage returns and trailing blank lines are ignored. The perimeter is
/// always walled in the result, whatever the drawing shows.
pub fn decode(input: &str) -> Result<WallGraph, FormatError> {
    let mut lines: Vec<&str> = input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        let _ = lines.pop();
    }

    let size = lines
        .len()
        .checked_sub(1)
        .filter(|rows| rows % 2 == 0)
        .and_then(|rows| u32::try_from(rows / 2).ok())
        .and_then(|side| GridSize::try_from(side).ok())
        .ok_or(FormatError::RowCount { rows: lines.len() })?;
    let side = size.side() as usize;
    let width = 4 * side + 1;

    let mut horizontal = vec![vec![false; side]; side + 1];
    let mut vertical = vec![vec![false; side + 1]; side];
    let mut start = None;
    let mut goals = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let found = line.chars().count();
        if found != width {
            return Err(FormatError::RowWidth {
                line: line_number,
                expected: width,
                found,
            });
        }
        if let Some((position, character)) =
            line.chars().enumerate().find(|(_, character)| !character.is_ascii())
        {
            return Err(FormatError::Token {
                line: line_number,
                column: position + 1,
                found: character.to_string(),
                expected: "an ASCII maze character",
            });
        }
        let reader = LineReader {
            line,
            number: line_number,
        };
        let row = index / 2;

        if index % 2 == 0 {
            for column in 0..side {
                reader.expect(4 * column, POST, "a post `o`")?;
                horizontal[row][column] =
                    reader.flag(4 * column + 1, HORIZONTAL_WALL, GAP, "`---` or three spaces")?;
            }
            reader.expect(4 * side, POST, "a post `o`")?;
            continue;
        }

        for column in 0..=side {
            vertical[row][column] =
                reader.flag(4 * column, VERTICAL_WALL, VERTICAL_GAP, "`|` or a space")?;
            if column == side {
                break;
            }
            let offset = 4 * column + 1;
            let cell = cell_at(row, column);
            match reader.token(offset, GAP.len()) {
                START => {
                    if start.replace(cell).is_some() {
                        return Err(FormatError::DuplicateStart {
                            line: line_number,
                            column: offset + 1,
                        });
                    }
                }
                GOAL => goals.push(cell),
                GAP => {}
                other => return Err(reader.unexpected(offset, other, "` S `, ` G ` or three spaces")),
            }
        }
    }

    let start = start.ok_or(FormatError::MissingStart)?;
    WallGraph::from_parts(size, &horizontal, &vertical, start, goals).map_err(FormatError::from)
}

fn cell_at(row: usize, column: usize) -> Cell {
    // Both indices are below the grid side, which fits in u32.
    Cell::new(row as u32, column as u32)
}

struct LineReader<'a> {
    line: &'a str,
    number: usize,
}

impl<'a> LineReader<'a> {
    fn token(&self, offset: usize, length: usize) -> &'a str {
        self.line.get(offset..offset + length).unwrap_or("")
    }

    fn expect(&self, offset: usize, token: &str, expected: &'static str) -> Result<(), FormatError> {
        let found = self.token(offset, token.len());
        if found == token {
            Ok(())
        } else {
            Err(self.unexpected(offset, found, expected))
        }
    }

    fn flag(
        &self,
        offset: usize,
        wall: &str,
        gap: &str,
        expected: &'static str,
    ) -> Result<bool, FormatError> {
        match self.token(offset, wall.len()) {
            found if found == wall => Ok(true),
            found if found == gap => Ok(false),
            found => Err(self.unexpected(offset, found, expected)),
        }
    }

    fn unexpected(&self, offset: usize, found: &str, expected: &'static str) -> FormatError {
        FormatError::Token {
            line: self.number,
            column: offset + 1,
            found: found.to_owned(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromaze_core::{Direction, WallView};

    #[test]
    fn empty_maze_draws_perimeter_start_and_goals() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let drawing = encode(&graph);
        let lines: Vec<&str> = drawing.lines().collect();

        assert_eq!(lines.len(), 33);
        assert!(lines.iter().all(|line| line.len() == 65));
        assert_eq!(lines[0], format!("o{}", "---o".repeat(16)));
        assert_eq!(&lines[31][..8], "| S     ");
        assert_eq!(&lines[15][29..36], " G   G ");
    }

    #[test]
    fn decode_reads_walls_and_markers() {
        let mut graph = WallGraph::new(GridSize::Sixteen);
        let _ = graph
            .add_wall_safe(Cell::new(3, 4), Direction::East)
            .expect("interior wall");
        let _ = graph
            .add_wall_safe(Cell::new(3, 4), Direction::South)
            .expect("interior wall");

        let decoded = decode(&encode(&graph)).expect("drawing decodes");
        assert!(decoded.has_wall(Cell::new(3, 4), Direction::East));
        assert!(decoded.has_wall(Cell::new(4, 4), Direction::North));
        assert!(!decoded.has_wall(Cell::new(3, 4), Direction::North));
        assert_eq!(decoded, graph);
    }

    #[test]
    fn carriage_returns_and_trailing_blank_lines_are_ignored() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let windows = encode(&graph).replace('\n', "\r\n") + "\r\n\n  \n";
        assert_eq!(decode(&windows).expect("drawing decodes"), graph);
    }

    #[test]
    fn wrong_row_count_is_rejected() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let drawing = encode(&graph);
        let truncated: String = drawing.lines().skip(2).map(|line| format!("{line}\n")).collect();
        assert!(matches!(
            decode(&truncated),
            Err(FormatError::RowCount { rows: 31 })
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let mut lines: Vec<String> = encode(&graph).lines().map(str::to_owned).collect();
        lines[4].push(' ');
        let error = decode(&lines.join("\n")).expect_err("ragged row");
        assert!(matches!(
            error,
            FormatError::RowWidth {
                line: 5,
                expected: 65,
                found: 66,
            }
        ));
    }

    #[test]
    fn unknown_tokens_report_their_position() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let mut lines: Vec<String> = encode(&graph).lines().map(str::to_owned).collect();
        lines[2].replace_range(5..8, "-x-");
        let error = decode(&lines.join("\n")).expect_err("bad token");
        assert!(matches!(
            error,
            FormatError::Token {
                line: 3,
                column: 6,
                ..
            }
        ));
    }

    #[test]
    fn start_must_appear_exactly_once() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let drawing = encode(&graph);

        let missing = drawing.replace(" S ", "   ");
        assert!(matches!(decode(&missing), Err(FormatError::MissingStart)));

        let mut lines: Vec<String> = drawing.lines().map(str::to_owned).collect();
        lines[1].replace_range(1..4, " S ");
        let duplicated = lines.join("\n");
        assert!(matches!(
            decode(&duplicated),
            Err(FormatError::DuplicateStart { line: 32, column: 2 })
        ));
    }

    #[test]
    fn drawing_without_goals_is_a_config_error() {
        let graph = WallGraph::new(GridSize::Sixteen);
        let drawing = encode(&graph).replace(" G ", "   ");
        assert!(matches!(
            decode(&drawing),
            Err(FormatError::Config(micromaze_core::ConfigError::EmptyGoals))
        ));
    }
}
