use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typer";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where logs go: `$HOME/.local/state/typer`, or the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_config.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_json_file() {
        let path = AppDirs::config_path();
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn state_dir_is_app_specific() {
        if let Some(dir) = AppDirs::state_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
    }
}
