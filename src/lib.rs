// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! cpl - Commit Policy Linter
//!
//! Checks commit messages against a conventional commit policy: a base rule
//! set, local rule overrides and ignore predicates that exempt whole
//! messages (such as dependency bot commits) from linting.
//!
//! # Example
//!
//! ```no_run
//! use cpl::config::PolicyConfig;
//! use cpl::rules::Linter;
//!
//! let config = PolicyConfig::load().unwrap();
//! let linter = Linter::new(&config).unwrap();
//!
//! let report = linter.lint("feat(parser): support trailers").unwrap();
//! println!("{}", report.summary());
//! ```

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod rules;

pub use config::PolicyConfig;
pub use error::{CplError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of cpl.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match GIT_SHA {
            Some(sha) => format!("{} ({})", VERSION, &sha[..7.min(sha.len())]),
            None => VERSION.to_string(),
        }
    }

}
