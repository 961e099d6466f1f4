// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command-line interface for cpl.

pub mod args;
mod dispatch;

pub use args::{Cli, Commands};
pub use dispatch::run;
