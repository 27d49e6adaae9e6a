// LSP protocol layer
// - server.rs: LSP server bootstrap over stdio
// - backend.rs: LanguageServer trait implementation and document sync glue
// - capabilities.rs: Capability negotiation
// - diagnostics.rs: Diagnostics generation
// - completion.rs: Completion list and resolve
pub mod backend;
pub mod capabilities;
pub mod completion;
pub mod diagnostics;
pub mod server;
