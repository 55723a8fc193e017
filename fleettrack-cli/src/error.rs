use std::io;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Failures that end the command shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("end of input")]
    EndOfInput,
}

/// Operator input that could not be parsed; aborts only the current command.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid latitude or longitude value.")]
    Coordinate(#[source] ParseFloatError),

    #[error("Invalid duration value.")]
    Duration(#[source] ParseIntError),
}
