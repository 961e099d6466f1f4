// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for the cpl application.
//!
//! Configuration problems, git failures and hook failures are fatal and map
//! to a setup error exit code. Rule violations are reported separately as
//! [`LintError`] so the caller can tell a style failure from a broken setup.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cpl operations.
#[derive(Error, Debug)]
pub enum CplError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Lint failures (rule violations)
    #[error("{0}")]
    Lint(#[from] LintError),

    // Commit message errors
    #[error("Commit message error: {0}")]
    Commit(#[from] CommitError),

    // Hook errors
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // UI/Interactive errors
    #[error("UI error: {0}")]
    Ui(String),

    // User cancelled operation
    #[error("Operation cancelled by user")]
    Cancelled,

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl CplError {
    /// Process exit code for this error.
    ///
    /// Rule violations exit with `1`; everything else is a setup problem and
    /// exits with `2`.
    pub fn exit_code(&self) -> i32 {
        match self {
            CplError::Lint(_) => 1,
            _ => 2,
        }
    }
}

impl From<dialoguer::Error> for CplError {
    fn from(err: dialoguer::Error) -> Self {
        CplError::Ui(err.to_string())
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Rule '{rule}' is not defined by the '{base}' rule set")]
    UnknownRule { rule: String, base: String },

    #[error("Cannot resolve base rule set '{name}'")]
    UnresolvedBase { name: String },

    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidIgnore { pattern: String, message: String },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Invalid commit reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}

/// Lint failures.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Commit message check failed: {errors} errors, {warnings} warnings")]
    Failed { errors: usize, warnings: usize },

    #[error("Warnings are not allowed in strict mode: {warnings} warnings")]
    StrictWarnings { warnings: usize },
}

/// Commit message errors.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Empty commit message")]
    EmptyMessage,

    #[error("Commit message is not valid UTF-8: {source_name}")]
    InvalidEncoding { source_name: String },

    #[error("Failed to read commit message from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },
}

/// Hook-related errors.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Failed to install hook '{hook}': {message}")]
    InstallFailed { hook: String, message: String },

    #[error("Hook already exists: {hook}")]
    AlreadyExists { hook: String },

    #[error("Hook not found: {hook}")]
    NotFound { hook: String },

    #[error("Failed to remove hook '{hook}': {message}")]
    RemoveFailed { hook: String, message: String },
}

/// Result type alias for cpl operations.
pub type Result<T> = std::result::Result<T, CplError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CplError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
