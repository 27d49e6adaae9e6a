//! Configuration pull from the editor

use async_trait::async_trait;
use tower_lsp::Client;
use tower_lsp::lsp_types::{ConfigurationItem, Url};
use tracing::debug;

use crate::config::CONFIG_SECTION;
use crate::settings::error::SettingsError;
use crate::settings::types::Settings;

/// Fetches the settings that apply to one document scope
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsSource: Send + Sync + 'static {
    /// Requests the settings for `scope` from the editor
    ///
    /// # Returns
    /// * `Ok(Settings)` - The scope's settings, defaults when unconfigured
    /// * `Err(SettingsError)` - If the request fails or the value is malformed
    async fn fetch(&self, scope: &Url) -> Result<Settings, SettingsError>;
}

/// Pulls settings with a `workspace/configuration` request
#[async_trait]
impl SettingsSource for Client {
    async fn fetch(&self, scope: &Url) -> Result<Settings, SettingsError> {
        debug!("Requesting configuration for {}", scope);

        let items = vec![ConfigurationItem {
            scope_uri: Some(scope.clone()),
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let values = self
            .configuration(items)
            .await
            .map_err(|e| SettingsError::Request(e.to_string()))?;

        let value = values.into_iter().next().ok_or(SettingsError::MissingItem)?;
        Settings::from_value(value)
    }
}
