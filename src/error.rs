//! Error handling for chart-golden.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the current test case.
///
/// Comparison findings (mismatching, missing or extra files) are not errors;
/// they are collected into a [`crate::compare::Comparison`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised while walking a results or expected tree
    #[error("Directory walk error: {0}.")]
    WalkDirError(#[from] walkdir::Error),

    #[error("Failed to unmarshal YAML of document {index}: {source}.\n{content}")]
    InvalidDocument {
        index: usize,
        content: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Document {index} is not a mapping:\n{content}")]
    NotAMapping { index: usize, content: String },

    #[error("Resource with missing name in document {index}:\n{content}")]
    MissingName { index: usize, content: String },

    #[error("Resource with missing kind in document {index}:\n{content}")]
    MissingKind { index: usize, content: String },

    #[error("Resource in document {index} has {field} '{value}' which is not a relative path.")]
    InvalidIdentity { index: usize, field: &'static str, value: String },

    /// Represents failures creating an output directory or writing a file into it
    #[error("Failed to write '{}': {source}.", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors in test case or run configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Chart directory '{chart}' does not exist.")]
    ChartDoesNotExistError { chart: String },

    /// Represents a failed invocation of the templating tool
    #[error("Failed to run: {command}\n{output}")]
    TemplateToolError { command: String, output: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
