//! Diagnostic rules
//! - pattern.rs: Regex-driven rule with an exemption on the captured remainder

pub mod pattern;

pub use pattern::PatternRule;

use std::ops::Range;

use crate::settings::Settings;

/// One problem found by a rule, located by byte offsets into the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub span: Range<usize>,
    pub message: String,
    /// Advisory notes attached as related information when the editor
    /// supports it
    pub advisories: Vec<String>,
}

/// A pure validation strategy over a document's text.
///
/// Implementations must return findings in document order and produce no
/// more than `settings.max_number_of_problems` of them.
pub trait Rule: Send + Sync {
    fn check(&self, text: &str, settings: &Settings) -> Vec<Finding>;
}
