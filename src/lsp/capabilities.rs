//! Capability negotiation
//!
//! Reads the editor's optional capabilities once at `initialize` and
//! declares what this server offers in return.

use tower_lsp::lsp_types::{
    ClientCapabilities, CompletionOptions, Registration, ServerCapabilities,
    TextDocumentSyncCapability, TextDocumentSyncKind,
};

/// Method the server registers for when the editor supports configuration pulls
pub const DID_CHANGE_CONFIGURATION: &str = "workspace/didChangeConfiguration";

/// Optional editor features recorded for the lifetime of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCapabilities {
    /// Editor answers `workspace/configuration` requests
    pub dynamic_configuration: bool,
    /// Editor reports workspace folder changes
    pub workspace_folders: bool,
    /// Editor renders related information on diagnostics
    pub diagnostic_related_information: bool,
}

impl SessionCapabilities {
    pub fn negotiate(capabilities: &ClientCapabilities) -> Self {
        let workspace = capabilities.workspace.as_ref();
        let related_information = capabilities
            .text_document
            .as_ref()
            .and_then(|text_document| text_document.publish_diagnostics.as_ref())
            .and_then(|publish| publish.related_information);

        Self {
            dynamic_configuration: workspace
                .and_then(|workspace| workspace.configuration)
                .unwrap_or(false),
            workspace_folders: workspace
                .and_then(|workspace| workspace.workspace_folders)
                .unwrap_or(false),
            diagnostic_related_information: related_information.unwrap_or(false),
        }
    }
}

pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Dynamic registration for configuration change notifications
pub fn configuration_registration() -> Registration {
    Registration {
        id: format!("{}-{}", env!("CARGO_PKG_NAME"), DID_CHANGE_CONFIGURATION),
        method: DID_CHANGE_CONFIGURATION.to_string(),
        register_options: None,
    }
}
