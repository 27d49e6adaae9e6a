// Settings layer
// - types.rs: Settings value and parsing
// - error.rs: SettingsError
// - source.rs: SettingsSource trait (configuration pull)
// - cache.rs: Per-document settings cache

pub mod cache;
pub mod error;
pub mod source;
pub mod types;

pub use cache::{ResolvedSettings, SettingsCache};
pub use error::SettingsError;
pub use source::SettingsSource;
pub use types::Settings;
