use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "studytrack";
const HISTORY_FILE: &str = "study_history.json";
const CONFIG_FILE: &str = "config.json";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/studytrack`, falling back to the platform data dir.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn history_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join(HISTORY_FILE))
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_{CONFIG_FILE}")))
    }

    pub fn log_dir() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_path_uses_expected_file_name() {
        let path = AppDirs::history_path();
        assert_eq!(path.file_name().unwrap(), HISTORY_FILE);
    }

    #[test]
    fn config_path_uses_expected_file_name() {
        let path = AppDirs::config_path();
        assert!(path.to_string_lossy().ends_with(CONFIG_FILE));
    }

    #[test]
    fn log_dir_sits_beside_history() {
        if let Some(state) = AppDirs::state_dir() {
            assert_eq!(AppDirs::log_dir(), state.join("logs"));
            assert_eq!(AppDirs::history_path(), state.join(HISTORY_FILE));
        }
    }
}
