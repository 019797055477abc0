//! Error taxonomy
//!
//! These travel inside `anyhow::Error`; use `downcast_ref` to match on them.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failures that stop a program before it runs
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open file {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unmatched '[' at position {position}")]
    UnmatchedOpen { position: usize },

    #[error("unmatched ']' at position {position}")]
    UnmatchedClose { position: usize },
}

/// Failures while a program runs
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// Tape growth went past the configured cell limit
    #[error("out of memory: address {address} exceeds the tape limit of {limit} cells")]
    OutOfMemory { address: isize, limit: usize },

    #[error("program is already finished")]
    AlreadyFinished,
}
