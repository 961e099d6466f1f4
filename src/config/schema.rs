// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines the policy structure that can be loaded from cpl.toml. Rules are
//! written the way conventional commit linters write them, as
//! `[severity, applicability, value]` arrays.

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the base rule set used when `extends` is omitted.
pub const DEFAULT_BASE: &str = "conventional";

/// The commit policy.
///
/// `PolicyConfig::default()` is the canonical policy. A file on disk starts
/// from an empty policy instead: fields it omits are empty, not canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Base rule set this policy extends.
    #[serde(default = "default_extends")]
    pub extends: String,

    /// Rule overrides. Each replaces the base entry of the same name wholesale.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,

    /// Exemption predicates, evaluated in order.
    #[serde(default)]
    pub ignores: Vec<IgnoreConfig>,

    /// Also exempt merge, revert and autosquash commits.
    #[serde(default)]
    pub default_ignores: bool,

    /// Link printed after a failed lint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_extends() -> String {
    DEFAULT_BASE.to_string()
}

impl PolicyConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }

    /// An empty policy: conventional base, no overrides, no ignores.
    pub fn empty() -> Self {
        Self {
            extends: default_extends(),
            rules: BTreeMap::new(),
            ignores: Vec::new(),
            default_ignores: false,
            help_url: None,
            output: OutputConfig::default(),
        }
    }

    /// Check the policy for errors that would make linting meaningless.
    ///
    /// Resolves the base set, checks every override against it and compiles
    /// every ignore pattern.
    pub fn validate(&self) -> crate::error::Result<()> {
        crate::rules::resolve_rules(self)?;
        super::ignore::IgnoreSet::from_config(self)?;
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        super::default::canonical_policy()
    }
}

/// Enforcement level of a rule.
///
/// Written numerically: `0` off, `1` warning, `2` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Off,
    Warning,
    Error,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, String> {
        match level {
            0 => Ok(Severity::Off),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            other => Err(format!("severity must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Off => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Off => "off",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Whether a rule's condition must hold or must not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    #[default]
    Always,
    Never,
}

impl Applicability {
    /// Apply to the raw outcome of a rule's condition.
    pub fn holds(self, condition: bool) -> bool {
        match self {
            Applicability::Always => condition,
            Applicability::Never => !condition,
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "always"),
            Applicability::Never => write!(f, "never"),
        }
    }
}

/// Third element of a rule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl RuleValue {
    /// Positive integer threshold, if this value is one.
    pub fn as_threshold(&self) -> Option<usize> {
        match self {
            RuleValue::Number(n) if *n > 0 => usize::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The value as a list of strings; a single string becomes a one-element list.
    pub fn as_list(&self) -> Option<Vec<&str>> {
        match self {
            RuleValue::Text(s) => Some(vec![s.as_str()]),
            RuleValue::List(items) => Some(items.iter().map(String::as_str).collect()),
            RuleValue::Number(_) => None,
        }
    }

    /// The value as a single string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Number(n) => write!(f, "{}", n),
            RuleValue::Text(s) => write!(f, "{:?}", s),
            RuleValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// One rule entry: `(severity, applicability, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub severity: Severity,
    pub applicability: Applicability,
    pub value: Option<RuleValue>,
}

impl RuleConfig {
    /// Create a rule entry.
    pub fn new(severity: Severity, applicability: Applicability, value: Option<RuleValue>) -> Self {
        Self {
            severity,
            applicability,
            value,
        }
    }

    /// Error-level "always" rule with a numeric threshold.
    pub fn max(threshold: i64) -> Self {
        Self::new(
            Severity::Error,
            Applicability::Always,
            Some(RuleValue::Number(threshold)),
        )
    }

    /// Whether the rule is evaluated at all.
    pub fn is_enabled(&self) -> bool {
        self.severity != Severity::Off
    }
}

impl fmt::Display for RuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}", u8::from(self.severity), self.applicability)?;
        if let Some(ref value) = self.value {
            write!(f, ", {}", value)?;
        }
        write!(f, "]")
    }
}

impl Serialize for RuleConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.value.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.severity)?;
        seq.serialize_element(&self.applicability)?;
        if let Some(ref value) = self.value {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuleConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleConfigVisitor;

        impl<'de> Visitor<'de> for RuleConfigVisitor {
            type Value = RuleConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an array [severity, applicability, value?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RuleConfig, A::Error> {
                let severity: Severity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let applicability: Applicability = seq.next_element()?.unwrap_or_default();
                let value: Option<RuleValue> = seq.next_element()?;

                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(RuleConfig {
                    severity,
                    applicability,
                    value,
                })
            }
        }

        deserializer.deserialize_seq(RuleConfigVisitor)
    }
}

/// How an ignore pattern is matched against the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreKind {
    /// Regular expression search. `^` anchors to the start of the message.
    Regex,
    /// Literal substring search.
    Contains,
    /// Literal prefix.
    Prefix,
}

/// A configured exemption predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Name used in logs; defaults to the pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Match strategy.
    pub kind: IgnoreKind,

    /// Pattern or literal text.
    pub pattern: String,
}

impl IgnoreConfig {
    /// Create a named ignore entry.
    pub fn new(name: &str, kind: IgnoreKind, pattern: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            kind,
            pattern: pattern.to_string(),
        }
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to use colors.
    pub color: bool,

    /// Default report format.
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}
