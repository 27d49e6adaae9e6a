use thiserror::Error;

/// Failure to obtain settings from the editor.
///
/// Cloneable because one in-flight fetch is shared by every revalidation
/// waiting on the same document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Configuration request failed: {0}")]
    Request(String),

    #[error("Invalid settings value: {0}")]
    Invalid(String),

    #[error("Configuration response contained no item")]
    MissingItem,
}
