// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Reads the messages of existing commits so they can be linted after the fact.

mod repo;

pub use repo::{
    get_commit_message, get_commit_range, open_repo, resolve_commit, Repository,
};
