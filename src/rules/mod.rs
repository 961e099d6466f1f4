// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule engine module for commit validation.
//!
//! This module resolves a policy's rules against the base set it extends and
//! evaluates them. Exemption predicates run first; an exempt message is not
//! evaluated at all.

mod builtin;
mod case;
pub mod conventional;
mod engine;
mod validator;

pub use builtin::{ActiveRule, Rule, RuleKind, RuleParam};
pub use case::TextCase;
pub use engine::{resolve_rules, Linter};
pub use validator::{LintIssue, LintReport};
