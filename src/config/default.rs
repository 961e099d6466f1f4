// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The canonical commit policy.

use std::collections::BTreeMap;

use super::schema::{IgnoreConfig, IgnoreKind, OutputConfig, PolicyConfig, RuleConfig, DEFAULT_BASE};

/// Maximum header and body line length of the canonical policy.
pub const MAX_LINE_LENGTH: i64 = 80;

/// Header written by Dependabot version-update commits.
pub const DEPENDABOT_HEADER_PATTERN: &str = r"^chore\(deps(-dev)?\): bump ";

/// Sign-off trailer Dependabot adds to its commits.
pub const DEPENDABOT_SIGNOFF: &str = "Signed-off-by: dependabot[bot]";

/// Build the canonical policy.
///
/// Extends the conventional rule set, caps header and body lines at 80
/// characters, and exempts Dependabot commits from linting entirely.
pub fn canonical_policy() -> PolicyConfig {
    let mut rules = BTreeMap::new();
    rules.insert("header-max-length".to_string(), RuleConfig::max(MAX_LINE_LENGTH));
    rules.insert("body-max-line-length".to_string(), RuleConfig::max(MAX_LINE_LENGTH));

    PolicyConfig {
        extends: DEFAULT_BASE.to_string(),
        rules,
        ignores: vec![
            IgnoreConfig::new("dependabot-header", IgnoreKind::Regex, DEPENDABOT_HEADER_PATTERN),
            IgnoreConfig::new("dependabot-signoff", IgnoreKind::Contains, DEPENDABOT_SIGNOFF),
        ],
        default_ignores: false,
        help_url: None,
        output: OutputConfig::default(),
    }
}

/// Get the default configuration.
pub fn default_config() -> PolicyConfig {
    canonical_policy()
}

/// The canonical policy as a configuration file, written by `cpl init`.
pub fn example_config() -> &'static str {
    r#"# cpl configuration
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Base rule set. "conventional" or "none".
extends = "conventional"

# Also skip merge, revert and fixup!/squash! commits.
default_ignores = false

# Overrides replace the base entry wholesale: [severity, applicability, value]
# severity: 0 = off, 1 = warning, 2 = error
[rules]
header-max-length = [2, "always", 80]
body-max-line-length = [2, "always", 80]

# A commit matching any ignore is exempt from every rule.
[[ignores]]
name = "dependabot-header"
kind = "regex"
pattern = '^chore\(deps(-dev)?\): bump '

[[ignores]]
name = "dependabot-signoff"
kind = "contains"
pattern = "Signed-off-by: dependabot[bot]"

[output]
color = true
format = "text"
"#
}
