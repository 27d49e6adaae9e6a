//! Test harness that plays the editor side of an LSP session
#![allow(dead_code)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::Service;
use tower_lsp::jsonrpc::{Error, Request, Response};
use tower_lsp::lsp_types::PublishDiagnosticsParams;
use tower_lsp::{ClientSocket, LspService};

use plaintext_lsp::lsp::backend::Backend;

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// How the fake editor answers `workspace/configuration` requests
pub enum ConfigurationReply {
    /// Answer every item with this section value
    Settings(Value),
    /// Forward the request to the test, which answers with `FakeClient::reply`
    Manual,
}

/// Editor capabilities with configuration pull, workspace folders and
/// diagnostic related information
pub fn full_capabilities() -> Value {
    json!({
        "workspace": { "configuration": true, "workspaceFolders": true },
        "textDocument": { "publishDiagnostics": { "relatedInformation": true } }
    })
}

/// Editor capabilities without configuration pull
pub fn push_capabilities(related_information: bool) -> Value {
    json!({
        "textDocument": { "publishDiagnostics": { "relatedInformation": related_information } }
    })
}

pub fn create_initialize_request(id: i64, capabilities: Value) -> Request {
    Request::build("initialize")
        .params(json!({
            "processId": null,
            "rootUri": null,
            "capabilities": capabilities,
        }))
        .id(id)
        .finish()
}

pub fn create_initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn create_shutdown_request(id: i64) -> Request {
    Request::build("shutdown").id(id).finish()
}

pub fn create_did_open_notification(uri: &str, version: i32, text: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(json!({
            "textDocument": {
                "uri": uri,
                "languageId": "plaintext",
                "version": version,
                "text": text,
            }
        }))
        .finish()
}

pub fn create_did_change_notification(uri: &str, version: i32, text: &str) -> Request {
    Request::build("textDocument/didChange")
        .params(json!({
            "textDocument": { "uri": uri, "version": version },
            "contentChanges": [{ "text": text }],
        }))
        .finish()
}

pub fn create_did_close_notification(uri: &str) -> Request {
    Request::build("textDocument/didClose")
        .params(json!({ "textDocument": { "uri": uri } }))
        .finish()
}

pub fn create_did_change_configuration_notification(settings: Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(json!({ "settings": settings }))
        .finish()
}

pub fn create_completion_request(id: i64, uri: &str, line: u32, character: u32) -> Request {
    Request::build("textDocument/completion")
        .params(json!({
            "textDocument": { "uri": uri },
            "position": { "line": line, "character": character },
        }))
        .id(id)
        .finish()
}

pub fn create_completion_resolve_request(id: i64, item: Value) -> Request {
    Request::build("completionItem/resolve")
        .params(item)
        .id(id)
        .finish()
}

/// Editor end of the session: receives everything the server sends and
/// answers server-to-client requests.
pub struct FakeClient {
    messages: mpsc::UnboundedReceiver<Request>,
    replies: mpsc::UnboundedSender<Response>,
}

impl FakeClient {
    /// Waits for the next message with `method`, skipping any others
    pub async fn wait_for_message(&mut self, method: &str) -> Option<Request> {
        let messages = &mut self.messages;
        tokio::time::timeout(TIMEOUT, async {
            while let Some(message) = messages.recv().await {
                if message.method() == method {
                    return Some(message);
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
    }

    pub async fn wait_for_diagnostics(&mut self) -> PublishDiagnosticsParams {
        let notification = self
            .wait_for_message("textDocument/publishDiagnostics")
            .await
            .expect("Expected publishDiagnostics notification");
        serde_json::from_value(notification.params().unwrap().clone()).unwrap()
    }

    /// Waits for a `window/logMessage` notification carrying `text`
    pub async fn wait_for_log_message(&mut self, text: &str) -> bool {
        let messages = &mut self.messages;
        tokio::time::timeout(TIMEOUT, async {
            while let Some(message) = messages.recv().await {
                let logged = message
                    .params()
                    .and_then(|params| params.get("message"))
                    .and_then(Value::as_str);
                if message.method() == "window/logMessage" && logged == Some(text) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false)
    }

    /// True if no message with `method` arrives within the quiet period
    pub async fn stays_quiet(&mut self, method: &str) -> bool {
        let messages = &mut self.messages;
        let arrived = tokio::time::timeout(QUIET_PERIOD, async {
            while let Some(message) = messages.recv().await {
                if message.method() == method {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);
        !arrived
    }

    pub fn reply(&self, request: &Request, result: Value) {
        let id = request.id().cloned().expect("request has an id");
        self.replies.send(Response::from_ok(id, result)).unwrap();
    }

    pub fn reply_error(&self, request: &Request) {
        let id = request.id().cloned().expect("request has an id");
        self.replies
            .send(Response::from_error(id, Error::internal_error()))
            .unwrap();
    }
}

pub fn spawn_fake_client(socket: ClientSocket, reply: ConfigurationReply) -> FakeClient {
    let (mut requests, mut responses) = socket.split();
    let (message_tx, message_rx) = mpsc::unbounded_channel();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Response>();

    let auto_reply = reply_tx.clone();
    tokio::spawn(async move {
        while let Some(request) = requests.next().await {
            if let Some(id) = request.id().cloned() {
                match (request.method(), &reply) {
                    ("workspace/configuration", ConfigurationReply::Settings(settings)) => {
                        let items = request
                            .params()
                            .and_then(|params| params.get("items"))
                            .and_then(Value::as_array)
                            .map_or(0, Vec::len);
                        let result = Value::Array(vec![settings.clone(); items]);
                        let _ = auto_reply.send(Response::from_ok(id, result));
                    }
                    ("workspace/configuration", ConfigurationReply::Manual) => {}
                    _ => {
                        let _ = auto_reply.send(Response::from_ok(id, Value::Null));
                    }
                }
            }
            if message_tx.send(request).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(response) = reply_rx.recv().await {
            if responses.send(response).await.is_err() {
                break;
            }
        }
    });

    FakeClient {
        messages: message_rx,
        replies: reply_tx,
    }
}

/// Builds a server, runs the initialize handshake and returns both ends
pub async fn start_server(
    capabilities: Value,
    reply: ConfigurationReply,
) -> (LspService<Backend>, FakeClient) {
    let (mut service, socket) = LspService::build(Backend::new).finish();
    let client = spawn_fake_client(socket, reply);

    let response = service
        .call(create_initialize_request(1, capabilities))
        .await
        .unwrap()
        .expect("initialize returns a response");
    assert!(response.is_ok(), "initialize failed: {:?}", response);

    service
        .call(create_initialized_notification())
        .await
        .unwrap();

    (service, client)
}
