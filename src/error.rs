use thiserror::Error;

use crate::api::GraphState;

pub type RigResult<T> = Result<T, RigError>;

#[derive(Debug, Error)]
pub enum RigError {
    /// Malformed or insufficient curve text. `line` is 1-based, `0` when the
    /// failure is not tied to a single line.
    #[error("curve parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("degenerate curve: {samples} usable sample(s), at least 2 required")]
    DegenerateCurve { samples: usize },

    #[error("command `{command}` is not valid in state {state:?}")]
    InvalidCommand {
        command: &'static str,
        state: GraphState,
    },

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
