use std::path::PathBuf;

/// Settings section requested from the editor and looked up in pushed settings
pub const CONFIG_SECTION: &str = "plaintextLsp";

/// Default cap on diagnostics per document
pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 10000;

/// Source tag attached to every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "ex";

const APP_DIR: &str = "plaintext-lsp";

/// Returns the path to the data directory for plaintext-lsp.
/// Uses $XDG_DATA_HOME/plaintext-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/plaintext-lsp,
/// or ./plaintext-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("plaintext-lsp.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/plaintext-lsp"));
    }

    #[test]
    fn data_dir_with_env_ignores_empty_xdg_data_home() {
        let path = data_dir_with_env(Some(String::new()), Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/plaintext-lsp"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/plaintext-lsp"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./plaintext-lsp"));
    }
}
