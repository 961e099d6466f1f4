// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in validation rules.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::commit::CommitMessage;
use crate::config::{Applicability, RuleConfig, RuleValue, Severity};
use crate::error::{ConfigError, CplError, Result};

use super::case::TextCase;
use super::validator::LintIssue;

lazy_static! {
    /// Lines containing a URL are exempt from line-length limits.
    static ref URL_REGEX: Regex = Regex::new(r"[a-zA-Z][a-zA-Z0-9+.-]*://\S+").unwrap();
}

/// Trait for rules evaluated against a parsed commit.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Check the commit message and return an issue if validation fails.
    fn check(&self, message: &CommitMessage) -> Option<LintIssue>;

    /// Get the rule name.
    fn name(&self) -> &str;
}

/// Every rule the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    BodyLeadingBlank,
    BodyMaxLineLength,
    FooterLeadingBlank,
    FooterMaxLineLength,
    HeaderMaxLength,
    HeaderTrim,
    SubjectCase,
    SubjectEmpty,
    SubjectFullStop,
    TypeCase,
    TypeEmpty,
    TypeEnum,
}

impl RuleKind {
    /// Get the configuration name of the rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::BodyLeadingBlank => "body-leading-blank",
            RuleKind::BodyMaxLineLength => "body-max-line-length",
            RuleKind::FooterLeadingBlank => "footer-leading-blank",
            RuleKind::FooterMaxLineLength => "footer-max-line-length",
            RuleKind::HeaderMaxLength => "header-max-length",
            RuleKind::HeaderTrim => "header-trim",
            RuleKind::SubjectCase => "subject-case",
            RuleKind::SubjectEmpty => "subject-empty",
            RuleKind::SubjectFullStop => "subject-full-stop",
            RuleKind::TypeCase => "type-case",
            RuleKind::TypeEmpty => "type-empty",
            RuleKind::TypeEnum => "type-enum",
        }
    }

    /// Get all rule kinds.
    pub fn all() -> &'static [RuleKind] {
        &[
            RuleKind::BodyLeadingBlank,
            RuleKind::BodyMaxLineLength,
            RuleKind::FooterLeadingBlank,
            RuleKind::FooterMaxLineLength,
            RuleKind::HeaderMaxLength,
            RuleKind::HeaderTrim,
            RuleKind::SubjectCase,
            RuleKind::SubjectEmpty,
            RuleKind::SubjectFullStop,
            RuleKind::TypeCase,
            RuleKind::TypeEmpty,
            RuleKind::TypeEnum,
        ]
    }

    /// Turn the configured value into the parameter this rule needs.
    ///
    /// Disabled rules without a value are accepted as-is; any value that is
    /// present is checked regardless of severity.
    fn param(&self, rule: &RuleConfig) -> std::result::Result<RuleParam, String> {
        let value = match (&rule.value, rule.severity) {
            (None, Severity::Off) => return Ok(RuleParam::None),
            (value, _) => value.as_ref(),
        };

        match self {
            RuleKind::BodyMaxLineLength | RuleKind::FooterMaxLineLength | RuleKind::HeaderMaxLength => {
                value
                    .and_then(RuleValue::as_threshold)
                    .map(RuleParam::Threshold)
                    .ok_or_else(|| {
                        format!(
                            "threshold must be a positive integer, got {}",
                            value.map_or("nothing".to_string(), |v| v.to_string())
                        )
                    })
            }
            RuleKind::SubjectCase | RuleKind::TypeCase => {
                let names = value
                    .and_then(RuleValue::as_list)
                    .filter(|names| !names.is_empty())
                    .ok_or_else(|| "expects a case name or a list of case names".to_string())?;
                names
                    .into_iter()
                    .map(str::parse::<TextCase>)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map(RuleParam::Cases)
            }
            RuleKind::SubjectFullStop => match value {
                None => Ok(RuleParam::Text(".".to_string())),
                Some(v) => v
                    .as_text()
                    .filter(|s| !s.is_empty())
                    .map(|s| RuleParam::Text(s.to_string()))
                    .ok_or_else(|| format!("expects a non-empty string, got {}", v)),
            },
            RuleKind::TypeEnum => value
                .and_then(RuleValue::as_list)
                .map(|items| RuleParam::List(items.into_iter().map(String::from).collect()))
                .ok_or_else(|| "expects a list of allowed types".to_string()),
            RuleKind::BodyLeadingBlank
            | RuleKind::FooterLeadingBlank
            | RuleKind::HeaderTrim
            | RuleKind::SubjectEmpty
            | RuleKind::TypeEmpty => Ok(RuleParam::None),
        }
    }
}

impl FromStr for RuleKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RuleKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated rule parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleParam {
    None,
    Threshold(usize),
    Cases(Vec<TextCase>),
    Text(String),
    List(Vec<String>),
}

/// A configured rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct ActiveRule {
    kind: RuleKind,
    severity: Severity,
    applicability: Applicability,
    param: RuleParam,
}

impl ActiveRule {
    /// Validate a configured rule.
    pub fn from_config(name: &str, rule: &RuleConfig) -> Result<Self> {
        let kind = name.parse::<RuleKind>().map_err(|_| {
            CplError::Config(ConfigError::UnknownRule {
                rule: name.to_string(),
                base: "built-in".to_string(),
            })
        })?;

        let param = kind.param(rule).map_err(|message| {
            CplError::Config(ConfigError::InvalidValue {
                key: format!("rules.{}", name),
                message,
            })
        })?;

        Ok(Self {
            kind,
            severity: rule.severity,
            applicability: rule.applicability,
            param,
        })
    }

    fn threshold(&self) -> usize {
        match self.param {
            RuleParam::Threshold(max) => max,
            _ => usize::MAX,
        }
    }

    fn issue(&self, message: String, line: Option<usize>, suggestion: Option<String>) -> LintIssue {
        LintIssue {
            rule: self.kind.as_str().to_string(),
            severity: self.severity,
            message,
            suggestion,
            line,
        }
    }

    fn must(&self) -> &'static str {
        match self.applicability {
            Applicability::Always => "must",
            Applicability::Never => "must not",
        }
    }

    fn check_max_length(&self, message: &CommitMessage) -> Option<LintIssue> {
        let max = self.threshold();
        let len = message.header_len();

        if self.applicability.holds(len <= max) {
            return None;
        }

        let (text, suggestion) = match self.applicability {
            Applicability::Always => (
                format!(
                    "header must not be longer than {} characters, current length is {}",
                    max, len
                ),
                Some(format!("Shorten the header to {} characters or less", max)),
            ),
            Applicability::Never => (
                format!(
                    "header must be longer than {} characters, current length is {}",
                    max, len
                ),
                None,
            ),
        };

        Some(self.issue(text, Some(1), suggestion))
    }

    fn check_max_line_length(
        &self,
        section_name: &str,
        section: Option<&str>,
        first_line: Option<usize>,
    ) -> Option<LintIssue> {
        let section = section?;
        let max = self.threshold();

        let offending = section
            .lines()
            .enumerate()
            .filter(|(_, line)| !URL_REGEX.is_match(line))
            .map(|(idx, line)| (idx, line.chars().count()))
            .find(|(_, len)| *len > max);

        if self.applicability.holds(offending.is_none()) {
            return None;
        }

        let start = first_line.unwrap_or(1);
        match (self.applicability, offending) {
            (Applicability::Always, Some((idx, len))) => Some(self.issue(
                format!(
                    "{}'s lines must not be longer than {} characters, line {} is {}",
                    section_name,
                    max,
                    start + idx,
                    len
                ),
                Some(start + idx),
                Some(format!("Wrap {} lines at {} characters", section_name, max)),
            )),
            _ => Some(self.issue(
                format!("{}'s lines must be longer than {} characters", section_name, max),
                Some(start),
                None,
            )),
        }
    }

    fn check_leading_blank(
        &self,
        section_name: &str,
        present: bool,
        leading_blank: bool,
        line: Option<usize>,
    ) -> Option<LintIssue> {
        if !present || self.applicability.holds(leading_blank) {
            return None;
        }

        let text = match self.applicability {
            Applicability::Always => format!("{} must have leading blank line", section_name),
            Applicability::Never => format!("{} may not have leading blank line", section_name),
        };
        let suggestion = match self.applicability {
            Applicability::Always => Some(format!("Add a blank line before the {}", section_name)),
            Applicability::Never => None,
        };

        Some(self.issue(text, line, suggestion))
    }

    fn check_empty(&self, section_name: &str, value: Option<&str>) -> Option<LintIssue> {
        let empty = value.map_or(true, |v| v.trim().is_empty());

        if self.applicability.holds(empty) {
            return None;
        }

        let text = match self.applicability {
            Applicability::Always => format!("{} must be empty", section_name),
            Applicability::Never => format!("{} may not be empty", section_name),
        };
        let suggestion = match self.applicability {
            Applicability::Never => Some("Use the format type(scope): subject".to_string()),
            Applicability::Always => None,
        };

        Some(self.issue(text, Some(1), suggestion))
    }

    fn check_case(&self, section_name: &str, value: Option<&str>) -> Option<LintIssue> {
        let value = value?;

        // Subjects like "1.0.0" or "2024" have no case to speak of.
        if self.kind == RuleKind::SubjectCase
            && !value.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
        {
            return None;
        }

        let RuleParam::Cases(ref cases) = self.param else {
            return None;
        };

        if self.applicability.holds(cases.iter().any(|case| case.matches(value))) {
            return None;
        }

        let names: Vec<&str> = cases.iter().map(TextCase::as_str).collect();
        Some(self.issue(
            format!("{} {} be {}", section_name, self.must(), names.join(", ")),
            Some(1),
            None,
        ))
    }

    fn check_full_stop(&self, message: &CommitMessage) -> Option<LintIssue> {
        let subject = message.subject.as_deref()?;
        let RuleParam::Text(ref stop) = self.param else {
            return None;
        };

        if self.applicability.holds(subject.ends_with(stop.as_str())) {
            return None;
        }

        let (text, suggestion) = match self.applicability {
            Applicability::Always => (format!("subject must end with {:?}", stop), None),
            Applicability::Never => (
                format!("subject may not end with {:?}", stop),
                Some("Remove the trailing punctuation".to_string()),
            ),
        };

        Some(self.issue(text, Some(1), suggestion))
    }

    fn check_type_enum(&self, message: &CommitMessage) -> Option<LintIssue> {
        let commit_type = message.commit_type.as_deref()?;
        let RuleParam::List(ref allowed) = self.param else {
            return None;
        };

        if self
            .applicability
            .holds(allowed.iter().any(|t| t == commit_type))
        {
            return None;
        }

        Some(self.issue(
            format!(
                "type '{}' {} be one of [{}]",
                commit_type,
                self.must(),
                allowed.join(", ")
            ),
            Some(1),
            None,
        ))
    }

    fn check_header_trim(&self, message: &CommitMessage) -> Option<LintIssue> {
        let trimmed = message.header.trim() == message.header;

        if self.applicability.holds(trimmed) {
            return None;
        }

        let text = match self.applicability {
            Applicability::Always => "header must not be surrounded by whitespace",
            Applicability::Never => "header must be surrounded by whitespace",
        };

        Some(self.issue(text.to_string(), Some(1), None))
    }
}

impl Rule for ActiveRule {
    fn check(&self, message: &CommitMessage) -> Option<LintIssue> {
        if self.severity == Severity::Off {
            return None;
        }

        match self.kind {
            RuleKind::HeaderMaxLength => self.check_max_length(message),
            RuleKind::BodyMaxLineLength => {
                self.check_max_line_length("body", message.body.as_deref(), message.body_line)
            }
            RuleKind::FooterMaxLineLength => {
                self.check_max_line_length("footer", message.footer.as_deref(), message.footer_line)
            }
            RuleKind::BodyLeadingBlank => self.check_leading_blank(
                "body",
                message.body.is_some(),
                message.body_leading_blank,
                message.body_line,
            ),
            RuleKind::FooterLeadingBlank => self.check_leading_blank(
                "footer",
                message.footer.is_some(),
                message.footer_leading_blank,
                message.footer_line,
            ),
            RuleKind::HeaderTrim => self.check_header_trim(message),
            RuleKind::SubjectCase => self.check_case("subject", message.subject.as_deref()),
            RuleKind::SubjectEmpty => self.check_empty("subject", message.subject.as_deref()),
            RuleKind::SubjectFullStop => self.check_full_stop(message),
            RuleKind::TypeCase => self.check_case("type", message.commit_type.as_deref()),
            RuleKind::TypeEmpty => self.check_empty("type", message.commit_type.as_deref()),
            RuleKind::TypeEnum => self.check_type_enum(message),
        }
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleValue;

    fn rule(name: &str, config: RuleConfig) -> ActiveRule {
        ActiveRule::from_config(name, &config).unwrap()
    }

    fn parse(text: &str) -> CommitMessage {
        CommitMessage::parse(text).unwrap()
    }

    #[test]
    fn test_header_max_length_boundary() {
        let rule = rule("header-max-length", RuleConfig::max(80));

        let exact = format!("feat: {}", "a".repeat(74));
        assert_eq!(exact.chars().count(), 80);
        assert!(rule.check(&parse(&exact)).is_none());

        let over = format!("feat: {}", "a".repeat(75));
        let issue = rule.check(&parse(&over)).unwrap();
        assert_eq!(issue.rule, "header-max-length");
        assert_eq!(issue.severity, Severity::Error);
        assert!(issue.message.contains("80"));
        assert!(issue.message.contains("81"));
        assert_eq!(issue.line, Some(1));
    }

    #[test]
    fn test_header_max_length_never() {
        let rule = rule(
            "header-max-length",
            RuleConfig::new(Severity::Warning, Applicability::Never, Some(RuleValue::Number(10))),
        );
        assert!(rule.check(&parse("feat: short")).is_some());
        assert!(rule.check(&parse("feat: long enough header")).is_none());
    }

    #[test]
    fn test_body_max_line_length_reports_line() {
        let rule = rule("body-max-line-length", RuleConfig::max(80));
        let text = format!("fix: x\n\nshort line\n{}", "b".repeat(81));
        let issue = rule.check(&parse(&text)).unwrap();
        assert_eq!(issue.line, Some(4));
        assert!(issue.message.contains("line 4 is 81"));
    }

    #[test]
    fn test_body_max_line_length_skips_urls() {
        let rule = rule("body-max-line-length", RuleConfig::max(20));
        let text = "fix: x\n\nsee https://example.com/a/very/long/path/that/goes/on";
        assert!(rule.check(&parse(text)).is_none());
    }

    #[test]
    fn test_body_rule_without_body_passes() {
        let rule = rule("body-max-line-length", RuleConfig::max(1));
        assert!(rule.check(&parse("fix: no body")).is_none());
    }

    #[test]
    fn test_footer_max_line_length() {
        let rule = rule("footer-max-line-length", RuleConfig::max(30));
        let text =
            "fix: x\n\nbody\n\nCloses #1\nSigned-off-by: Someone With A Long Name <someone@example.com>";
        let issue = rule.check(&parse(text)).unwrap();
        assert_eq!(issue.line, Some(6));
    }

    #[test]
    fn test_leading_blank() {
        let rule = rule(
            "body-leading-blank",
            RuleConfig::new(Severity::Warning, Applicability::Always, None),
        );
        assert!(rule.check(&parse("fix: x\nglued body")).is_some());
        assert!(rule.check(&parse("fix: x\n\nspaced body")).is_none());
        assert!(rule.check(&parse("fix: x")).is_none());
    }

    #[test]
    fn test_subject_and_type_empty() {
        let subject = rule(
            "subject-empty",
            RuleConfig::new(Severity::Error, Applicability::Never, None),
        );
        let commit_type = rule(
            "type-empty",
            RuleConfig::new(Severity::Error, Applicability::Never, None),
        );

        let plain = parse("update stuff");
        assert!(subject.check(&plain).is_some());
        assert!(commit_type.check(&plain).is_some());

        let conventional = parse("feat: add parser");
        assert!(subject.check(&conventional).is_none());
        assert!(commit_type.check(&conventional).is_none());
    }

    #[test]
    fn test_subject_case_never() {
        let rule = rule(
            "subject-case",
            RuleConfig::new(
                Severity::Error,
                Applicability::Never,
                Some(RuleValue::List(vec![
                    "sentence-case".to_string(),
                    "upper-case".to_string(),
                ])),
            ),
        );
        assert!(rule.check(&parse("feat: Add parser")).is_some());
        assert!(rule.check(&parse("feat: ADD PARSER")).is_some());
        assert!(rule.check(&parse("feat: add Parser")).is_none());
    }

    #[test]
    fn test_subject_case_skips_subjects_without_leading_letter() {
        let rule = rule(
            "subject-case",
            RuleConfig::new(
                Severity::Error,
                Applicability::Never,
                Some(RuleValue::List(vec![
                    "sentence-case".to_string(),
                    "start-case".to_string(),
                    "pascal-case".to_string(),
                    "upper-case".to_string(),
                ])),
            ),
        );
        assert!(rule.check(&parse("chore(release): 1.0.0")).is_none());
        assert!(rule.check(&parse("chore: 2024")).is_none());
        assert!(rule.check(&parse("chore: #12 Cleanup")).is_none());
        assert!(rule.check(&parse("chore: Release 2024")).is_some());
    }

    #[test]
    fn test_type_case_still_checks_non_letters() {
        let rule = rule(
            "type-case",
            RuleConfig::new(
                Severity::Error,
                Applicability::Never,
                Some(RuleValue::Text("upper-case".to_string())),
            ),
        );
        assert!(rule.check(&parse("1x: thing")).is_none());
        assert!(rule.check(&parse("12: thing")).is_some());
    }

    #[test]
    fn test_type_case() {
        let rule = rule(
            "type-case",
            RuleConfig::new(
                Severity::Error,
                Applicability::Always,
                Some(RuleValue::Text("lower-case".to_string())),
            ),
        );
        assert!(rule.check(&parse("Feat: add parser")).is_some());
        assert!(rule.check(&parse("feat: add parser")).is_none());
    }

    #[test]
    fn test_subject_full_stop() {
        let rule = rule(
            "subject-full-stop",
            RuleConfig::new(Severity::Error, Applicability::Never, None),
        );
        assert!(rule.check(&parse("feat: add parser.")).is_some());
        assert!(rule.check(&parse("feat: add parser")).is_none());
    }

    #[test]
    fn test_type_enum() {
        let rule = rule(
            "type-enum",
            RuleConfig::new(
                Severity::Error,
                Applicability::Always,
                Some(RuleValue::List(vec!["feat".to_string(), "fix".to_string()])),
            ),
        );
        let issue = rule.check(&parse("wip: half done")).unwrap();
        assert!(issue.message.contains("[feat, fix]"));
        assert!(rule.check(&parse("fix: done")).is_none());
    }

    #[test]
    fn test_header_trim() {
        let rule = rule(
            "header-trim",
            RuleConfig::new(Severity::Error, Applicability::Always, None),
        );
        assert!(rule.check(&parse(" feat: indented")).is_some());
        assert!(rule.check(&parse("feat: tidy")).is_none());
    }

    #[test]
    fn test_off_rule_never_reports() {
        let rule = rule(
            "header-max-length",
            RuleConfig::new(Severity::Off, Applicability::Always, Some(RuleValue::Number(1))),
        );
        assert!(rule.check(&parse("feat: anything at all")).is_none());
    }

    #[test]
    fn test_invalid_params() {
        let bad = [
            ("header-max-length", RuleConfig::max(0)),
            (
                "header-max-length",
                RuleConfig::new(Severity::Error, Applicability::Always, None),
            ),
            (
                "subject-case",
                RuleConfig::new(
                    Severity::Error,
                    Applicability::Never,
                    Some(RuleValue::Text("title-case".to_string())),
                ),
            ),
            (
                "type-enum",
                RuleConfig::new(Severity::Error, Applicability::Always, Some(RuleValue::Number(3))),
            ),
            (
                "header-max-length",
                RuleConfig::new(Severity::Off, Applicability::Always, Some(RuleValue::Number(-1))),
            ),
        ];

        for (name, config) in bad {
            assert!(
                matches!(
                    ActiveRule::from_config(name, &config),
                    Err(CplError::Config(ConfigError::InvalidValue { .. }))
                ),
                "{} {} should be rejected",
                name,
                config
            );
        }
    }

    #[test]
    fn test_rule_kind_roundtrip_names() {
        for kind in RuleKind::all() {
            assert_eq!(kind.as_str().parse::<RuleKind>(), Ok(*kind));
        }
        assert!("header-min-width".parse::<RuleKind>().is_err());
    }
}
