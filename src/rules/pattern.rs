//! Pattern rule
//!
//! Flags every non-overlapping match of a regex, unless the text captured by
//! the first group starts with an exempt word. An exempted match does not
//! consume its text: scanning resumes one character after where it started.

use std::sync::LazyLock;

use regex::Regex;

use crate::rules::{Finding, Rule};
use crate::settings::Settings;

const DEFAULT_PATTERN: &str = r"purple\shair\sis\s(.*)";
const DEFAULT_EXEMPTION: &str = "fabulous";
const DEFAULT_ADVISORIES: [&str; 2] = ["Did you mean 'fabulous'?", "Or are you a hater?"];

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PATTERN).expect("default pattern is valid"));

#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    exemption: Option<String>,
    advisories: Vec<String>,
}

impl PatternRule {
    /// Creates a rule from a regex. The exemption, if any, is checked against
    /// capture group 1, or the whole match when the pattern has no groups.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            exemption: None,
            advisories: Vec::new(),
        })
    }

    pub fn with_exemption(mut self, exemption: impl Into<String>) -> Self {
        self.exemption = Some(exemption.into());
        self
    }

    pub fn with_advisories<I, S>(mut self, advisories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.advisories = advisories.into_iter().map(Into::into).collect();
        self
    }

    fn is_exempt(&self, captured: &str) -> bool {
        self.exemption
            .as_deref()
            .is_some_and(|exemption| captured.starts_with(exemption))
    }
}

impl Default for PatternRule {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_REGEX.clone(),
            exemption: Some(DEFAULT_EXEMPTION.to_string()),
            advisories: DEFAULT_ADVISORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Rule for PatternRule {
    fn check(&self, text: &str, settings: &Settings) -> Vec<Finding> {
        let limit = settings.max_number_of_problems;
        let mut findings = Vec::new();
        let mut at = 0;

        while findings.len() < limit && at <= text.len() {
            let Some(captures) = self.pattern.captures_at(text, at) else {
                break;
            };
            let Some(matched) = captures.get(0) else {
                break;
            };

            let captured = captures.get(1).unwrap_or(matched).as_str();
            if self.is_exempt(captured) || matched.is_empty() {
                at = next_char_boundary(text, matched.start());
                continue;
            }

            findings.push(Finding {
                span: matched.range(),
                message: format!("incorrect syntax {}", matched.as_str()),
                advisories: self.advisories.clone(),
            });
            at = matched.end();
        }

        findings
    }
}

fn next_char_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| offset + c.len_utf8())
}
