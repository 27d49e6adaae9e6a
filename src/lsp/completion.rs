//! Completion provider
//!
//! The candidate list is fixed. Each item carries a numeric tag in its
//! `data` field and the resolve phase looks enrichment up by that tag alone,
//! so nothing is stored between the two requests.

use serde_json::{Value, json};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};

struct Candidate {
    tag: u64,
    label: &'static str,
}

const CANDIDATES: [Candidate; 2] = [
    Candidate {
        tag: 1,
        label: "TypeScript",
    },
    Candidate {
        tag: 2,
        label: "JavaScript",
    },
];

pub fn completion_items() -> Vec<CompletionItem> {
    CANDIDATES
        .iter()
        .map(|candidate| CompletionItem {
            label: candidate.label.to_string(),
            kind: Some(CompletionItemKind::TEXT),
            data: Some(json!(candidate.tag)),
            ..Default::default()
        })
        .collect()
}

/// Attaches detail and documentation for a known tag. Items with a missing
/// or unknown tag are returned untouched.
pub fn resolve_completion_item(mut item: CompletionItem) -> CompletionItem {
    let candidate = item
        .data
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|tag| CANDIDATES.iter().find(|candidate| candidate.tag == tag));

    if let Some(candidate) = candidate {
        item.detail = Some(format!("{} details", candidate.label));
        item.documentation = Some(Documentation::String(format!(
            "{} documentation",
            candidate.label
        )));
    }

    item
}
