//! Output-related errors

use std::fmt;
use std::error::Error;

pub enum OutputError {
    Grid(String, Option<String>),
    Write(String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputError::Grid(s, c) => if let Some(cause) = c {
                write!(f, "'{}' does not specify a valid source grid because {}", s, cause)
            } else {
                write!(f, "'{}' does not specify a valid source grid", s)
            },
            OutputError::Write(s) => write!(f, "failed to write source profile to '{}'", s),
        }
    }
}

impl fmt::Debug for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for OutputError {}

impl OutputError {
    pub fn grid_explained(spec: &str, cause: &str) -> Self {
        Self::Grid(spec.to_owned(), Some(cause.to_owned()))
    }
}
