#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Load and save contract for micromaze mazes.
//!
//! Two encodings are supported: the fixed-width [`text`] drawing used by maze
//! files and the [`json`] document exchanged with the viewer tools. Both
//! decode into a validated [`WallGraph`].

pub mod json;
pub mod text;

pub use crate::json::MazeDocument;

use std::path::Path;

use micromaze_core::ConfigError;
use micromaze_world::WallGraph;
use thiserror::Error;

/// Errors raised while decoding or encoding a maze.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The drawing does not have `2N + 1` rows for a supported grid size.
    #[error("maze drawing has {rows} rows; expected 33 for 16x16 or 65 for 32x32")]
    RowCount {
        /// Rows found after dropping trailing blank lines.
        rows: usize,
    },
    /// A row of the drawing does not have `4N + 1` columns.
    #[error("line {line} has {found} columns; expected {expected}")]
    RowWidth {
        /// One-based line number.
        line: usize,
        /// Width required by the grid size.
        expected: usize,
        /// Width that was found.
        found: usize,
    },
    /// A token of the drawing is not one the encoding defines.
    #[error("line {line}, column {column}: found {found:?}, expected {expected}")]
    Token {
        /// One-based line number.
        line: usize,
        /// One-based column of the first character of the token.
        column: usize,
        /// Token that was found.
        found: String,
        /// Description of the accepted tokens.
        expected: &'static str,
    },
    /// No cell is marked as the start.
    #[error("maze drawing has no start cell")]
    MissingStart,
    /// More than one cell is marked as the start.
    #[error("line {line}, column {column}: second start cell")]
    DuplicateStart {
        /// One-based line number.
        line: usize,
        /// One-based column of the cell field.
        column: usize,
    },
    /// The JSON document is malformed.
    #[error("invalid maze document: {0}")]
    Json(#[from] serde_json::Error),
    /// The decoded maze violates a maze invariant.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Encodings a maze file may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Fixed-width text drawing.
    Text,
    /// JSON interchange document.
    Json,
}

impl Encoding {
    /// Encoding implied by a file path: `.json` selects JSON, anything else text.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json {
            Self::Json
        } else {
            Self::Text
        }
    }

    /// Decodes a maze in this encoding.
    pub fn decode(self, input: &str) -> Result<WallGraph, FormatError> {
        match self {
            Self::Text => text::decode(input),
            Self::Json => json::decode(input),
        }
    }

    /// Encodes a maze in this encoding.
    pub fn encode(self, graph: &WallGraph) -> Result<String, FormatError> {
        match self {
            Self::Text => Ok(text::encode(graph)),
            Self::Json => json::encode(graph),
        }
    }
}
