// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for cpl.
//!
//! This module handles the commit policy: its schema, the canonical default,
//! discovery and loading from disk, and the exemption predicates.

pub mod default;
mod ignore;
mod loader;
mod schema;

pub use default::{canonical_policy, default_config};
pub use ignore::{build_ignore, Ignore, IgnoreSet, RegexIgnore};
pub use loader::{find_config_file, find_config_file_from, load_config, parse_config, CONFIG_FILES};
pub use schema::*;
