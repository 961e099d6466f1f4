// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule engine for commit validation.

use std::collections::BTreeMap;

use crate::commit::{strip_comments, CommitMessage};
use crate::config::{IgnoreSet, PolicyConfig, RuleConfig, Severity};
use crate::error::{ConfigError, CplError, Result};
use crate::git;

use super::builtin::{ActiveRule, Rule};
use super::conventional::base_rules;
use super::validator::LintReport;

/// Resolve the effective rule set of a policy.
///
/// Starts from the base set named by `extends` and replaces entries with the
/// policy's overrides. An override must name a rule of the base set, and
/// every resulting entry must carry a valid value.
pub fn resolve_rules(policy: &PolicyConfig) -> Result<BTreeMap<String, RuleConfig>> {
    let mut rules = base_rules(&policy.extends).ok_or_else(|| {
        CplError::Config(ConfigError::UnresolvedBase {
            name: policy.extends.clone(),
        })
    })?;

    for (name, rule) in &policy.rules {
        match rules.get_mut(name) {
            Some(slot) => *slot = rule.clone(),
            None => {
                return Err(CplError::Config(ConfigError::UnknownRule {
                    rule: name.clone(),
                    base: policy.extends.clone(),
                }))
            }
        }
    }

    for (name, rule) in &rules {
        ActiveRule::from_config(name, rule)?;
    }

    Ok(rules)
}

/// Rule engine for validating commit messages.
#[derive(Debug)]
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
    ignores: IgnoreSet,
    help_url: Option<String>,
}

impl Linter {
    /// Create a linter for the given policy.
    pub fn new(policy: &PolicyConfig) -> Result<Self> {
        let resolved = resolve_rules(policy)?;

        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        for (name, rule) in &resolved {
            if rule.severity == Severity::Off {
                continue;
            }
            rules.push(Box::new(ActiveRule::from_config(name, rule)?));
        }

        let ignores = IgnoreSet::from_config(policy)?;

        tracing::debug!(
            rules = rules.len(),
            ignores = ignores.len(),
            "Linter ready"
        );

        Ok(Self {
            rules,
            ignores,
            help_url: policy.help_url.clone(),
        })
    }

    /// Add a custom rule to the engine.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// The exemption predicates of this linter.
    pub fn ignores(&self) -> &IgnoreSet {
        &self.ignores
    }

    /// Whether the message bypasses all rules.
    pub fn should_exempt(&self, message: &str) -> bool {
        self.ignores.should_exempt(&strip_comments(message))
    }

    /// Lint raw commit message text.
    ///
    /// Ignores are checked before parsing. An exempt message is never parsed,
    /// so even an otherwise unparseable message passes.
    pub fn lint(&self, message: &str) -> Result<LintReport> {
        let cleaned = strip_comments(message);

        if let Some(name) = self.ignores.matching(&cleaned) {
            tracing::debug!(ignore = name, "Commit exempt from linting");
            let mut report = LintReport::new(cleaned);
            report.ignored_by = Some(name.to_string());
            return Ok(report);
        }

        let parsed = CommitMessage::parse(&cleaned)?;
        Ok(self.validate(&parsed))
    }

    /// Evaluate every rule against a parsed message.
    pub fn validate(&self, message: &CommitMessage) -> LintReport {
        let mut report = LintReport::new(message.raw.clone());
        report.help_url = self.help_url.clone();

        for rule in &self.rules {
            if let Some(issue) = rule.check(message) {
                tracing::debug!(rule = rule.name(), "Rule violated");
                match issue.severity {
                    Severity::Error => report.errors.push(issue),
                    Severity::Warning => report.warnings.push(issue),
                    Severity::Off => {}
                }
            }
        }

        report
    }

    /// Check a specific commit by reference.
    pub fn check_commit(&self, reference: &str) -> Result<LintReport> {
        let message = git::get_commit_message(reference)?;
        let mut report = self.lint(&message)?;
        report.commit_sha = git::resolve_commit(reference).ok();
        Ok(report)
    }

    /// Check a range of commits.
    pub fn check_range(&self, range: &str) -> Result<Vec<LintReport>> {
        let commits = git::get_commit_range(range)?;
        let mut reports = Vec::with_capacity(commits.len());

        for (oid, message) in commits {
            let mut report = self.lint(&message)?;
            report.commit_sha = Some(oid);
            reports.push(report);
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{canonical_policy, Applicability, RuleValue};
    use crate::rules::LintIssue;

    fn canonical() -> Linter {
        Linter::new(&canonical_policy()).unwrap()
    }

    #[test]
    fn test_resolve_overrides_replace_wholesale() {
        let rules = resolve_rules(&canonical_policy()).unwrap();
        assert_eq!(rules["header-max-length"], RuleConfig::max(80));
        assert_eq!(rules["body-max-line-length"], RuleConfig::max(80));
        // Untouched base rules stay as they were.
        assert_eq!(rules["footer-max-line-length"], RuleConfig::max(100));
    }

    #[test]
    fn test_resolve_override_drops_base_value() {
        let mut policy = PolicyConfig::empty();
        policy.rules.insert(
            "subject-full-stop".to_string(),
            RuleConfig::new(Severity::Warning, Applicability::Never, None),
        );
        let rules = resolve_rules(&policy).unwrap();
        assert_eq!(rules["subject-full-stop"].value, None);
        assert_eq!(rules["subject-full-stop"].severity, Severity::Warning);
    }

    #[test]
    fn test_resolve_unknown_rule() {
        let mut policy = PolicyConfig::empty();
        policy
            .rules
            .insert("scope-enum".to_string(), RuleConfig::max(3));
        assert!(matches!(
            resolve_rules(&policy),
            Err(CplError::Config(ConfigError::UnknownRule { .. }))
        ));
    }

    #[test]
    fn test_header_over_limit_fails() {
        let report = canonical().lint(&"x".repeat(81)).unwrap();
        assert!(!report.is_valid());
        let issue = report
            .errors
            .iter()
            .find(|e| e.rule == "header-max-length")
            .unwrap();
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_token_paragraph_faces_body_line_limit() {
        let message = format!(
            "fix: parser\n\nexplanation paragraph\n\nReason: {}",
            "r".repeat(85)
        );
        let report = canonical().lint(&message).unwrap();
        assert!(!report.is_valid());
        let issue = report
            .errors
            .iter()
            .find(|e| e.rule == "body-max-line-length")
            .unwrap();
        assert_eq!(issue.line, Some(5));
    }

    #[test]
    fn test_release_subjects_pass() {
        for message in ["chore(release): 1.0.0", "chore: 2024"] {
            let report = canonical().lint(message).unwrap();
            assert!(report.is_valid(), "{}: {:?}", message, report.errors);
        }
    }

    #[test]
    fn test_header_at_limit_passes_length_rule() {
        let header = format!("feat: {}", "a".repeat(74));
        let report = canonical().lint(&header).unwrap();
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_long_dependabot_header_passes() {
        let header = format!("chore(deps): bump {} from 1.0.0 to 2.0.0", "x".repeat(100));
        let report = canonical().lint(&header).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.ignored_by.as_deref(), Some("dependabot-header"));
    }

    #[test]
    fn test_short_dependabot_header_is_exempt() {
        let report = canonical()
            .lint("chore(deps-dev): bump eslint from 8 to 9")
            .unwrap();
        assert!(report.is_ignored());
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn test_signoff_exempts_every_rule() {
        let message = format!(
            "Bump Things.\n{}\n\nSigned-off-by: dependabot[bot] <support@github.com>",
            "y".repeat(81)
        );
        let report = canonical().lint(&message).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.ignored_by.as_deref(), Some("dependabot-signoff"));
    }

    #[test]
    fn test_body_line_over_limit_fails_without_signoff() {
        let message = format!("fix: wrap body\n\n{}", "y".repeat(81));
        let report = canonical().lint(&message).unwrap();
        assert!(report
            .errors
            .iter()
            .any(|e| e.rule == "body-max-line-length"));
    }

    #[test]
    fn test_comments_do_not_count() {
        let message = format!("fix: small\n\n# {}\n", "c".repeat(200));
        let report = canonical().lint(&message).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let report = canonical().lint("fix: glued\nbody right after header").unwrap();
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.rule == "body-leading-blank"));
    }

    #[test]
    fn test_non_conventional_header_fails() {
        let report = canonical().lint("update stuff").unwrap();
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.rule == "type-empty"));
        assert!(report.errors.iter().any(|e| e.rule == "subject-empty"));
    }

    #[test]
    fn test_empty_message_is_fatal() {
        assert!(canonical().lint("# just a comment\n").is_err());
    }

    #[test]
    fn test_empty_message_matching_nothing_is_still_fatal() {
        let mut policy = canonical_policy();
        policy.rules.clear();
        let linter = Linter::new(&policy).unwrap();
        assert!(linter.lint("").is_err());
    }

    #[test]
    fn test_should_exempt() {
        let linter = canonical();
        assert!(linter.should_exempt("chore(deps): bump a from 1 to 2"));
        assert!(!linter.should_exempt("chore: bump a from 1 to 2"));
    }

    #[test]
    fn test_custom_rule() {
        #[derive(Debug)]
        struct NoTodo;

        impl Rule for NoTodo {
            fn check(&self, message: &CommitMessage) -> Option<LintIssue> {
                message.raw.contains("TODO").then(|| LintIssue {
                    rule: "no-todo".to_string(),
                    severity: Severity::Error,
                    message: "commit message mentions TODO".to_string(),
                    suggestion: None,
                    line: None,
                })
            }

            fn name(&self) -> &str {
                "no-todo"
            }
        }

        let mut linter = canonical();
        linter.add_rule(Box::new(NoTodo));
        let report = linter.lint("feat: add parser\n\nTODO: tests").unwrap();
        assert!(report.errors.iter().any(|e| e.rule == "no-todo"));
    }

    #[test]
    fn test_help_url_carried() {
        let mut policy = canonical_policy();
        policy.help_url = Some("https://example.com/commits".to_string());
        let linter = Linter::new(&policy).unwrap();
        let report = linter.lint("update stuff").unwrap();
        assert_eq!(report.help_url.as_deref(), Some("https://example.com/commits"));
    }

    #[test]
    fn test_warning_override_downgrades() {
        let mut policy = canonical_policy();
        policy.rules.insert(
            "header-max-length".to_string(),
            RuleConfig::new(
                Severity::Warning,
                Applicability::Always,
                Some(RuleValue::Number(80)),
            ),
        );
        let linter = Linter::new(&policy).unwrap();
        let report = linter.lint(&format!("feat: {}", "a".repeat(90))).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
