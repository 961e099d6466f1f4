// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Hook script templates.

use std::str::FromStr;

/// Marker line identifying scripts written by cpl.
pub const HOOK_MARKER: &str = "# cpl Git Hook";

/// Git hooks cpl can install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookTemplate {
    /// Lints the message file git passes as `$1`.
    CommitMsg,
}

impl HookTemplate {
    /// Get all templates.
    pub fn all() -> &'static [HookTemplate] {
        &[HookTemplate::CommitMsg]
    }

    /// File name under `.git/hooks`.
    pub fn filename(&self) -> &'static str {
        match self {
            HookTemplate::CommitMsg => "commit-msg",
        }
    }

    /// Generate the hook script.
    pub fn generate(&self) -> String {
        let body = match self {
            HookTemplate::CommitMsg => {
                r#"if ! command -v cpl >/dev/null 2>&1; then
    echo "cpl: not found in PATH; install it or remove .git/hooks/commit-msg" >&2
    exit 1
fi

exec cpl lint --edit "$1""#
            }
        };

        format!(
            "#!/bin/sh\n{}\n# Generated by cpl v{}\n# Do not edit: reinstall with `cpl hooks install --force`.\n\n{}\n",
            HOOK_MARKER,
            crate::version::VERSION,
            body
        )
    }
}

impl FromStr for HookTemplate {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit-msg" | "commit_msg" => Ok(HookTemplate::CommitMsg),
            _ => Err(()),
        }
    }
}
