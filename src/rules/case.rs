// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Text case detection for `*-case` rules.

use std::fmt;
use std::str::FromStr;

/// A named text case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Lower,
    Upper,
    Sentence,
    Start,
    Pascal,
    Camel,
    Kebab,
    Snake,
}

impl TextCase {
    /// Get the configuration name of the case.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextCase::Lower => "lower-case",
            TextCase::Upper => "upper-case",
            TextCase::Sentence => "sentence-case",
            TextCase::Start => "start-case",
            TextCase::Pascal => "pascal-case",
            TextCase::Camel => "camel-case",
            TextCase::Kebab => "kebab-case",
            TextCase::Snake => "snake-case",
        }
    }

    /// Whether `text` is written in this case.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextCase::Lower => text == text.to_lowercase(),
            TextCase::Upper => text == text.to_uppercase(),
            TextCase::Sentence => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => {
                        let rest = chars.as_str();
                        first.is_uppercase() && rest == rest.to_lowercase()
                    }
                    None => false,
                }
            }
            TextCase::Start => {
                let mut words = text.split_whitespace().peekable();
                words.peek().is_some()
                    && words.all(|word| word.chars().next().map_or(false, |c| !c.is_lowercase()))
            }
            TextCase::Pascal => {
                text.chars().next().map_or(false, char::is_uppercase)
                    && text.chars().all(char::is_alphanumeric)
            }
            TextCase::Camel => {
                text.chars().next().map_or(false, char::is_lowercase)
                    && text.chars().all(char::is_alphanumeric)
            }
            TextCase::Kebab => is_delimited_lower(text, '-'),
            TextCase::Snake => is_delimited_lower(text, '_'),
        }
    }
}

/// Lowercase alphanumeric words joined by a single delimiter.
fn is_delimited_lower(text: &str, delimiter: char) -> bool {
    !text.is_empty()
        && text.split(delimiter).all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_digit() || (c.is_alphabetic() && c.is_lowercase()))
        })
}

impl FromStr for TextCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lower-case" | "lowercase" => Ok(TextCase::Lower),
            "upper-case" | "uppercase" => Ok(TextCase::Upper),
            "sentence-case" | "sentencecase" => Ok(TextCase::Sentence),
            "start-case" | "startcase" => Ok(TextCase::Start),
            "pascal-case" | "pascalcase" => Ok(TextCase::Pascal),
            "camel-case" | "camelcase" => Ok(TextCase::Camel),
            "kebab-case" | "kebabcase" => Ok(TextCase::Kebab),
            "snake-case" | "snakecase" => Ok(TextCase::Snake),
            other => Err(format!("unknown case '{}'", other)),
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_upper() {
        assert!(TextCase::Lower.matches("add new parser"));
        assert!(!TextCase::Lower.matches("add New parser"));
        assert!(TextCase::Upper.matches("ADD PARSER"));
        assert!(!TextCase::Upper.matches("Add parser"));
    }

    #[test]
    fn test_sentence() {
        assert!(TextCase::Sentence.matches("Add new parser"));
        assert!(!TextCase::Sentence.matches("add new parser"));
        assert!(!TextCase::Sentence.matches("Add New parser"));
        assert!(!TextCase::Sentence.matches(""));
    }

    #[test]
    fn test_start() {
        assert!(TextCase::Start.matches("Add New Parser"));
        assert!(!TextCase::Start.matches("Add new Parser"));
        assert!(!TextCase::Start.matches("  "));
    }

    #[test]
    fn test_pascal_camel() {
        assert!(TextCase::Pascal.matches("AddParser"));
        assert!(!TextCase::Pascal.matches("Add parser"));
        assert!(TextCase::Camel.matches("addParser"));
        assert!(!TextCase::Camel.matches("AddParser"));
    }

    #[test]
    fn test_kebab_snake() {
        assert!(TextCase::Kebab.matches("add-new-parser"));
        assert!(!TextCase::Kebab.matches("add--parser"));
        assert!(TextCase::Snake.matches("add_new_parser"));
        assert!(!TextCase::Snake.matches("add_New"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("sentence-case".parse::<TextCase>(), Ok(TextCase::Sentence));
        assert_eq!("lowercase".parse::<TextCase>(), Ok(TextCase::Lower));
        assert!("title-case".parse::<TextCase>().is_err());
    }
}
