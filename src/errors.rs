/*!
 * Error types for the subfix application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while parsing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A block is missing or has a malformed timestamp line; fatal for the whole file
    #[error("Malformed subtitle block {block} at line {line}: {message}")]
    ParseError {
        /// 1-based block number within the file
        block: usize,
        /// 1-based line number of the offending line
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The file contains no subtitle blocks at all
    #[error("No subtitle blocks found in input")]
    Empty,
}

/// Errors that can occur when calling an external text-correction capability
#[derive(Error, Debug)]
pub enum CorrectorError {
    /// The capability is not available (missing tables, unreachable service)
    #[error("Corrector unavailable: {0}")]
    Unavailable(String),

    /// Error when making a request to the grammar service fails
    #[error("Grammar service request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a grammar service response fails
    #[error("Failed to parse grammar service response: {0}")]
    ParseError(String),

    /// The grammar service did not answer within the configured deadline
    #[error("Grammar service timed out after {0}s")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a text corrector
    #[error("Corrector error: {0}")]
    Corrector(#[from] CorrectorError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
