use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location,
};

use crate::config::DIAGNOSTIC_SOURCE;
use crate::document::{DocumentSnapshot, LineIndex};
use crate::rules::{Finding, Rule};
use crate::settings::Settings;

/// Runs `rule` over a document and converts its findings into LSP
/// diagnostics. Advisory notes become related information only when the
/// editor negotiated support for it.
pub fn generate_diagnostics(
    rule: &dyn Rule,
    document: &DocumentSnapshot,
    settings: &Settings,
    related_information: bool,
) -> Vec<Diagnostic> {
    let index = LineIndex::new(&document.text);

    rule.check(&document.text, settings)
        .into_iter()
        .map(|Finding { span, message, advisories }| {
            let range = index.range(span);
            let related = (related_information && !advisories.is_empty()).then(|| {
                advisories
                    .into_iter()
                    .map(|message| DiagnosticRelatedInformation {
                        location: Location {
                            uri: document.uri.clone(),
                            range,
                        },
                        message,
                    })
                    .collect()
            });

            Diagnostic {
                range,
                severity: Some(DiagnosticSeverity::WARNING),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message,
                related_information: related,
                ..Default::default()
            }
        })
        .collect()
}
