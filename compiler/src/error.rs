use scriptgen_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output folder {0} would overwrite the input")]
    OutputOverlapsInput(String),

    #[error("No class found in {0}")]
    NoClassFound(String),

    #[error("Bracket '{delimiter}' at line {line} is not closed")]
    UnclosedBracket {
        delimiter: char,
        line:      usize,
    },

    #[error("Bracket '{delimiter}' at line {line} closes nothing")]
    UnmatchedBracket {
        delimiter: char,
        line:      usize,
    },

    #[error("Class {class} reads field \"{field}\" which is never declared")]
    UndeclaredField {
        class: String,
        field: String,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    #[error("Codec error: {0}")]
    Codec(String),
}
