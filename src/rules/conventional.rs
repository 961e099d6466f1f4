// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Base rule sets a policy can extend.

use std::collections::BTreeMap;

use crate::config::{Applicability, RuleConfig, RuleValue, Severity};

use super::builtin::RuleKind;

/// Names accepted for the conventional commits base set.
pub const CONVENTIONAL_ALIASES: &[&str] = &["conventional", "@commitlint/config-conventional"];

/// Name of the base set in which every known rule is switched off.
pub const EMPTY_BASE: &str = "none";

/// Commit types allowed by the conventional base set.
pub const CONVENTIONAL_TYPES: &[&str] = &[
    "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert", "style", "test",
];

/// Look up a base rule set by name.
pub fn base_rules(name: &str) -> Option<BTreeMap<String, RuleConfig>> {
    if CONVENTIONAL_ALIASES.contains(&name) {
        Some(conventional_rules())
    } else if name == EMPTY_BASE {
        Some(
            RuleKind::all()
                .iter()
                .map(|kind| {
                    (
                        kind.as_str().to_string(),
                        RuleConfig::new(Severity::Off, Applicability::Always, None),
                    )
                })
                .collect(),
        )
    } else {
        None
    }
}

/// The conventional commits rule set.
pub fn conventional_rules() -> BTreeMap<String, RuleConfig> {
    use Applicability::{Always, Never};
    use Severity::{Error, Warning};

    let entries = [
        (RuleKind::BodyLeadingBlank, RuleConfig::new(Warning, Always, None)),
        (RuleKind::BodyMaxLineLength, RuleConfig::max(100)),
        (RuleKind::FooterLeadingBlank, RuleConfig::new(Warning, Always, None)),
        (RuleKind::FooterMaxLineLength, RuleConfig::max(100)),
        (RuleKind::HeaderMaxLength, RuleConfig::max(100)),
        (RuleKind::HeaderTrim, RuleConfig::new(Error, Always, None)),
        (
            RuleKind::SubjectCase,
            RuleConfig::new(
                Error,
                Never,
                list(&["sentence-case", "start-case", "pascal-case", "upper-case"]),
            ),
        ),
        (RuleKind::SubjectEmpty, RuleConfig::new(Error, Never, None)),
        (RuleKind::SubjectFullStop, RuleConfig::new(Error, Never, text("."))),
        (RuleKind::TypeCase, RuleConfig::new(Error, Always, text("lower-case"))),
        (RuleKind::TypeEmpty, RuleConfig::new(Error, Never, None)),
        (RuleKind::TypeEnum, RuleConfig::new(Error, Always, list(CONVENTIONAL_TYPES))),
    ];

    entries
        .into_iter()
        .map(|(kind, rule)| (kind.as_str().to_string(), rule))
        .collect()
}

fn list(items: &[&str]) -> Option<RuleValue> {
    Some(RuleValue::List(items.iter().map(|s| s.to_string()).collect()))
}

fn text(s: &str) -> Option<RuleValue> {
    Some(RuleValue::Text(s.to_string()))
}
