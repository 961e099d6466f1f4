// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message structure and parsing.
//!
//! Parsing is lenient: a header that is not in conventional form still
//! parses, it just has no type, scope or subject. Whether that is acceptable
//! is up to the rules.

use crate::error::{CommitError, CplError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Conventional commit header: `type(scope)!: subject`.
    static ref HEADER_REGEX: Regex =
        Regex::new(r"^(?P<type>\w*)(?:\((?P<scope>[^)]*)\))?!?: (?P<subject>.*)$").unwrap();

    /// Line that opens the footer: a breaking change note or an issue
    /// reference (`Closes #12`, `Fixes: acme/app#3`).
    static ref FOOTER_TOKEN_REGEX: Regex = Regex::new(
        r"^(?:BREAKING[ -]CHANGE: |[A-Za-z][A-Za-z-]*:? +(?:[\w.-]+/[\w.-]+)?#\d+)"
    )
    .unwrap();
}

/// Line git places above the diff in verbose commit templates.
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// A commit message split into the sections the rules operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    /// The full message after comment stripping.
    pub raw: String,
    /// First line.
    pub header: String,
    /// Conventional type, if the header is in conventional form.
    pub commit_type: Option<String>,
    /// Conventional scope.
    pub scope: Option<String>,
    /// Conventional subject.
    pub subject: Option<String>,
    /// Free-form body.
    pub body: Option<String>,
    /// Everything from the first breaking change note or issue reference on.
    pub footer: Option<String>,
    /// Whether the body is preceded by a blank line.
    pub body_leading_blank: bool,
    /// Whether the footer is preceded by a blank line.
    pub footer_leading_blank: bool,
    /// 1-based line number of the first body line.
    pub body_line: Option<usize>,
    /// 1-based line number of the first footer line.
    pub footer_line: Option<usize>,
}

impl CommitMessage {
    /// Parse a commit message.
    ///
    /// Git comments are stripped first. An empty message is an error rather
    /// than a trivially passing commit.
    pub fn parse(message: &str) -> Result<Self> {
        let cleaned = strip_comments(message);

        if cleaned.trim().is_empty() {
            return Err(CplError::Commit(CommitError::EmptyMessage));
        }

        let lines: Vec<&str> = cleaned.lines().collect();
        let header = lines[0].to_string();

        let (commit_type, scope, subject) = match HEADER_REGEX.captures(&header) {
            Some(caps) => (
                caps.name("type")
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.is_empty()),
                caps.name("scope")
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.is_empty()),
                caps.name("subject")
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.trim().is_empty()),
            ),
            None => (None, None, None),
        };

        let rest = &lines[1..];
        let footer_start = find_footer_start(rest);

        let body_lines = &rest[..footer_start];
        let footer_lines = &rest[footer_start..];

        let (body, body_offset) = join_section(body_lines);
        let (footer, footer_offset) = join_section(footer_lines);

        let body_leading_blank = body.is_none() || rest.first().map_or(true, |l| l.trim().is_empty());
        let footer_leading_blank = footer.is_none()
            || (footer_start > 0 && rest[footer_start - 1].trim().is_empty());

        Ok(Self {
            raw: cleaned.clone(),
            header,
            commit_type,
            scope,
            subject,
            // Header is line 1, `rest` starts on line 2.
            body_line: body_offset.map(|o| o + 2),
            footer_line: footer_offset.map(|o| o + footer_start + 2),
            body,
            footer,
            body_leading_blank,
            footer_leading_blank,
        })
    }

    /// Get the header length in characters.
    pub fn header_len(&self) -> usize {
        self.header.chars().count()
    }
}

/// Remove git comment lines and everything below a scissors line.
///
/// Trailing blank lines are dropped and leading blank lines are skipped so
/// the header is always the first line.
pub fn strip_comments(message: &str) -> String {
    let mut kept = Vec::new();

    for line in message.lines() {
        if line == SCISSORS {
            break;
        }
        if line.starts_with('#') {
            continue;
        }
        kept.push(line.trim_end_matches('\r'));
    }

    let start = kept
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(kept.len());
    let end = kept
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);

    kept[start..end].join("\n")
}

/// Whether a line can open the footer.
fn opens_footer(line: &str) -> bool {
    FOOTER_TOKEN_REGEX.is_match(line)
}

/// Index into `rest` where the footer begins, or `rest.len()` when there is none.
///
/// The footer runs from the first footer token to the end of the message.
/// An issue reference must start a paragraph; a breaking change note is
/// recognised even when glued to the body. Other `Token: value` lines,
/// sign-offs included, stay in the body.
fn find_footer_start(rest: &[&str]) -> usize {
    rest.iter()
        .enumerate()
        .position(|(idx, line)| {
            if !opens_footer(line) {
                return false;
            }
            let opens_paragraph = idx == 0 || rest[idx - 1].trim().is_empty();
            let breaking = line.starts_with("BREAKING CHANGE") || line.starts_with("BREAKING-CHANGE");
            opens_paragraph || breaking
        })
        .unwrap_or(rest.len())
}

/// Trim blank lines around a section and join it.
///
/// Returns the joined text and the offset of its first line within `lines`.
fn join_section(lines: &[&str]) -> (Option<String>, Option<usize>) {
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return (None, None);
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);

    (Some(lines[first..=last].join("\n")), Some(first))
}
