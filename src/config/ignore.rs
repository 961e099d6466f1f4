// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Exemption predicates.
//!
//! An ignore exempts a commit from every rule. Predicates are compiled once
//! when the policy is loaded and are pure afterwards.

use regex::Regex;

use crate::error::{ConfigError, CplError, Result};

use super::schema::{IgnoreConfig, IgnoreKind, PolicyConfig};

/// A predicate deciding whether a commit message bypasses all rules.
pub trait Ignore: std::fmt::Debug + Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Whether the message is exempt.
    fn matches(&self, message: &str) -> bool;
}

/// Regular expression search over the whole message.
#[derive(Debug)]
pub struct RegexIgnore {
    name: String,
    regex: Regex,
}

impl RegexIgnore {
    /// Compile a regex ignore.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            CplError::Config(ConfigError::InvalidIgnore {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })?;

        Ok(Self {
            name: name.into(),
            regex,
        })
    }
}

impl Ignore for RegexIgnore {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }
}

/// Literal substring search.
#[derive(Debug)]
pub struct ContainsIgnore {
    name: String,
    needle: String,
}

impl Ignore for ContainsIgnore {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, message: &str) -> bool {
        message.contains(&self.needle)
    }
}

/// Literal prefix match.
#[derive(Debug)]
pub struct PrefixIgnore {
    name: String,
    prefix: String,
}

impl Ignore for PrefixIgnore {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, message: &str) -> bool {
        message.starts_with(&self.prefix)
    }
}

/// Messages git and common workflows generate that are not worth linting.
const DEFAULT_IGNORE_PATTERNS: &[(&str, &str)] = &[
    ("merge-pull-request", r"^Merge pull request "),
    ("merge-branch", r"^Merge (remote-tracking )?branch "),
    ("merge-tag", r"^Merge tag "),
    ("merge-into", r"^Merged? \S.* (in|into) \S"),
    ("automatic-merge", r"^Automatic merge"),
    ("auto-merged", r"^Auto-merged \S.* into \S"),
    ("revert", r#"^(R|r)evert "#),
    ("autosquash", r"^(amend|fixup|squash)! "),
    ("initial-commit", r"(?i)^initial commit(\r?\n|$)"),
];

/// Build a predicate from its configuration.
pub fn build_ignore(config: &IgnoreConfig) -> Result<Box<dyn Ignore>> {
    let name = config
        .name
        .clone()
        .unwrap_or_else(|| config.pattern.clone());

    if config.pattern.is_empty() {
        return Err(CplError::Config(ConfigError::InvalidIgnore {
            pattern: name,
            message: "pattern must not be empty".to_string(),
        }));
    }

    let ignore: Box<dyn Ignore> = match config.kind {
        IgnoreKind::Regex => Box::new(RegexIgnore::new(name, &config.pattern)?),
        IgnoreKind::Contains => Box::new(ContainsIgnore {
            name,
            needle: config.pattern.clone(),
        }),
        IgnoreKind::Prefix => Box::new(PrefixIgnore {
            name,
            prefix: config.pattern.clone(),
        }),
    };

    Ok(ignore)
}

/// The ordered sequence of predicates of a policy.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    ignores: Vec<Box<dyn Ignore>>,
}

impl IgnoreSet {
    /// Compile all ignores of a policy.
    ///
    /// Configured ignores come first, in declaration order, followed by the
    /// default ignores when enabled.
    pub fn from_config(config: &PolicyConfig) -> Result<Self> {
        let mut ignores = config
            .ignores
            .iter()
            .map(build_ignore)
            .collect::<Result<Vec<_>>>()?;

        if config.default_ignores {
            for (name, pattern) in DEFAULT_IGNORE_PATTERNS {
                ignores.push(Box::new(RegexIgnore::new(*name, pattern)?));
            }
        }

        Ok(Self { ignores })
    }

    /// Name of the first predicate that exempts the message.
    pub fn matching(&self, message: &str) -> Option<&str> {
        self.ignores
            .iter()
            .find(|ignore| ignore.matches(message))
            .map(|ignore| ignore.name())
    }

    /// Whether any predicate exempts the message.
    pub fn should_exempt(&self, message: &str) -> bool {
        self.matching(message).is_some()
    }

    /// Names of all predicates, in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.ignores.iter().map(|ignore| ignore.name()).collect()
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.ignores.len()
    }

    /// Whether there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.ignores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default::canonical_policy;

    fn canonical() -> IgnoreSet {
        IgnoreSet::from_config(&canonical_policy()).unwrap()
    }

    #[test]
    fn test_dependabot_header() {
        let set = canonical();
        assert_eq!(
            set.matching("chore(deps): bump lodash from 4.0.0 to 4.1.0"),
            Some("dependabot-header")
        );
        assert!(set.should_exempt("chore(deps-dev): bump eslint from 8 to 9"));
    }

    #[test]
    fn test_dependabot_header_is_anchored_and_case_sensitive() {
        let set = canonical();
        assert!(!set.should_exempt("fix: chore(deps): bump lodash"));
        assert!(!set.should_exempt("Chore(deps): bump lodash"));
        assert!(!set.should_exempt("chore(deps): Bump lodash"));
        assert!(!set.should_exempt("chore(deps):bump lodash"));
        assert!(!set.should_exempt("chore(depsdev): bump lodash"));
        assert!(!set.should_exempt("chore: bump lodash"));
    }

    #[test]
    fn test_dependabot_header_only_at_message_start() {
        let set = canonical();
        assert!(!set.should_exempt("feat: x\n\nchore(deps): bump lodash"));
    }

    #[test]
    fn test_dependabot_signoff() {
        let set = canonical();
        let message = "build: update things\n\nSigned-off-by: dependabot[bot] <support@github.com>";
        assert_eq!(set.matching(message), Some("dependabot-signoff"));
    }

    #[test]
    fn test_dependabot_signoff_is_exact() {
        let set = canonical();
        assert!(!set.should_exempt("x\n\nsigned-off-by: dependabot[bot]"));
        assert!(!set.should_exempt("x\n\nSigned-off-by: dependabot"));
        assert!(!set.should_exempt("x\n\nSigned-off-by: dependabot-bot"));
        // Non-ASCII hyphens do not count.
        assert!(!set.should_exempt("x\n\nSigned\u{2011}off\u{2011}by: dependabot[bot]"));
    }

    #[test]
    fn test_order_independence() {
        let mut policy = canonical_policy();
        let forward = IgnoreSet::from_config(&policy).unwrap();
        policy.ignores.reverse();
        let reversed = IgnoreSet::from_config(&policy).unwrap();

        let samples = [
            "chore(deps): bump a from 1 to 2",
            "chore(deps-dev): bump b from 1 to 2\n\nSigned-off-by: dependabot[bot]",
            "feat: x\n\nSigned-off-by: dependabot[bot]",
            "feat: plain commit",
            "",
        ];
        for sample in samples {
            assert_eq!(forward.should_exempt(sample), reversed.should_exempt(sample));
        }
    }

    #[test]
    fn test_prefix_ignore() {
        let config = IgnoreConfig::new("release", IgnoreKind::Prefix, "chore(release):");
        let ignore = build_ignore(&config).unwrap();
        assert!(ignore.matches("chore(release): 1.2.0"));
        assert!(!ignore.matches("feat: chore(release):"));
    }

    #[test]
    fn test_invalid_regex_fails() {
        let config = IgnoreConfig::new("broken", IgnoreKind::Regex, "(unclosed");
        assert!(matches!(
            build_ignore(&config),
            Err(CplError::Config(ConfigError::InvalidIgnore { .. }))
        ));
    }

    #[test]
    fn test_empty_pattern_fails() {
        let config = IgnoreConfig::new("everything", IgnoreKind::Contains, "");
        assert!(build_ignore(&config).is_err());
    }

    #[test]
    fn test_default_ignores() {
        let mut policy = PolicyConfig::empty();
        assert!(IgnoreSet::from_config(&policy).unwrap().is_empty());

        policy.default_ignores = true;
        let set = IgnoreSet::from_config(&policy).unwrap();
        assert!(set.should_exempt("Merge branch 'main' into feature"));
        assert!(set.should_exempt("Merge pull request #12 from org/branch"));
        assert!(set.should_exempt("Revert \"feat: add thing\""));
        assert!(set.should_exempt("fixup! feat: add thing"));
        assert!(set.should_exempt("Initial commit"));
        assert!(!set.should_exempt("feat: merge branch handling"));
        assert!(!set.should_exempt("Initial commit of the parser"));
    }
}
