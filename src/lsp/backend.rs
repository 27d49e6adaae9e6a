use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use futures::future::join_all;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

use crate::document::{DocumentSnapshot, DocumentStore};
use crate::lsp::capabilities::{
    SessionCapabilities, configuration_registration, server_capabilities,
};
use crate::lsp::completion::{completion_items, resolve_completion_item};
use crate::lsp::diagnostics::generate_diagnostics;
use crate::rules::{PatternRule, Rule};
use crate::settings::{Settings, SettingsCache, SettingsSource};

pub struct Backend {
    client: Client,
    session: OnceLock<SessionCapabilities>,
    documents: Mutex<DocumentStore>,
    settings: SettingsCache,
    rule: Arc<dyn Rule>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        let settings_source: Arc<dyn SettingsSource> = Arc::new(client.clone());
        Self::build(client, settings_source, Arc::new(PatternRule::default()))
    }

    /// Creates a backend with an explicit settings source and rule
    pub fn build(
        client: Client,
        settings_source: Arc<dyn SettingsSource>,
        rule: Arc<dyn Rule>,
    ) -> Self {
        Self {
            client,
            session: OnceLock::new(),
            documents: Mutex::new(DocumentStore::new()),
            settings: SettingsCache::new(settings_source),
            rule,
        }
    }

    fn session(&self) -> SessionCapabilities {
        self.session.get().copied().unwrap_or_default()
    }

    fn documents(&self) -> MutexGuard<'_, DocumentStore> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Recomputes and publishes diagnostics for one document.
    ///
    /// The pass is dropped without publishing if fetching settings fails, or
    /// if by the time settings arrive the document was changed, closed or
    /// reopened, or its settings entry was invalidated. Whatever superseded
    /// the pass triggers its own revalidation.
    async fn revalidate(&self, snapshot: DocumentSnapshot) {
        let resolved = match self.settings.get(&snapshot.uri).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Skipping validation of {}: {}", snapshot.uri, e);
                return;
            }
        };

        let current = self.settings.is_current(&snapshot.uri, &resolved)
            && self.documents().is_current(&snapshot);
        if !current {
            debug!(
                "Discarding superseded validation of {} (version {})",
                snapshot.uri, snapshot.version
            );
            return;
        }

        let diagnostics = generate_diagnostics(
            self.rule.as_ref(),
            &snapshot,
            &resolved.settings,
            self.session().diagnostic_related_information,
        );

        debug!(
            "Publishing {} diagnostics for {} (version {})",
            diagnostics.len(),
            snapshot.uri,
            snapshot.version
        );

        self.client
            .publish_diagnostics(snapshot.uri, diagnostics, Some(snapshot.version))
            .await;
    }

    async fn revalidate_all(&self) {
        let snapshots = self.documents().snapshots();
        info!("Revalidating {} open documents", snapshots.len());
        join_all(
            snapshots
                .into_iter()
                .map(|snapshot| self.revalidate(snapshot)),
        )
        .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let session = SessionCapabilities::negotiate(&params.capabilities);
        info!("Negotiated session capabilities: {:?}", session);

        match self.session.set(session) {
            Ok(()) => self.settings.set_scoped(session.dynamic_configuration),
            Err(_) => warn!("Session already initialized, keeping first negotiation"),
        }

        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;

        let session = self.session();
        if session.dynamic_configuration {
            match self
                .client
                .register_capability(vec![configuration_registration()])
                .await
            {
                Ok(()) => info!("Registered for configuration change notifications"),
                Err(e) => error!("Failed to register for configuration changes: {}", e),
            }
        }
        if session.workspace_folders {
            debug!("Observing workspace folder changes");
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutdown requested");
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;

        let snapshot = self.documents().open(uri, text, version);

        self.client
            .log_message(
                MessageType::LOG,
                format!("Document opened: {}", snapshot.uri),
            )
            .await;

        self.revalidate(snapshot).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let VersionedTextDocumentIdentifier { uri, version } = params.text_document;

        let Some(change) = params.content_changes.into_iter().last() else {
            debug!("Change notification for {} carried no content", uri);
            return;
        };
        if change.range.is_some() {
            warn!(
                "Ignoring ranged change for {}: only full document sync is supported",
                uri
            );
            return;
        }

        let Some(snapshot) = self.documents().change(&uri, change.text, version) else {
            warn!("Ignoring change for unopened document {}", uri);
            return;
        };

        self.revalidate(snapshot).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let was_open = self.documents().close(&uri);
        let evicted = self.settings.evict(&uri);

        debug!(
            "Document closed: {} (open: {}, settings evicted: {})",
            uri, was_open, evicted
        );
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if self.settings.is_scoped() {
            let cleared = self.settings.clear();
            debug!("Configuration changed, cleared {} cached settings", cleared);
        } else {
            let settings = Settings::from_change_notification(&params.settings);
            info!("Global settings replaced: {:?}", settings);
            self.settings.set_global(settings);
        }

        self.revalidate_all().await;
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        if !self.session().workspace_folders {
            debug!("Ignoring workspace folder change without negotiated support");
            return;
        }

        info!(
            "Workspace folders changed: {} added, {} removed",
            params.event.added.len(),
            params.event.removed.len()
        );
        self.client
            .log_message(MessageType::LOG, "Workspace folder change event received.")
            .await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        info!("{} watched files changed", params.changes.len());
        self.client
            .log_message(MessageType::LOG, "File change event received.")
            .await;
    }

    async fn completion(&self, _params: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(Some(CompletionResponse::Array(completion_items())))
    }

    async fn completion_resolve(&self, params: CompletionItem) -> Result<CompletionItem> {
        Ok(resolve_completion_item(params))
    }
}
