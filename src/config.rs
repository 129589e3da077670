use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Compatibility constants
// =============================================================================

/// Database format epoch this build understands
pub const API_VERSION: u32 = 1;

/// Default static host serving `latest.json` and `<version>.zip`
pub const DEFAULT_SOURCE_SERVER_DB_PATH: &str =
    "https://raw.githubusercontent.com/victorbush/ego.nefscommon/master/InjectionDatabase";

/// Directory under the application directory holding installed databases
pub const DATABASE_DIR_NAME: &str = "InjectionDatabase";

/// Optional settings file looked up in the application directory
pub const SETTINGS_FILE_NAME: &str = "injection-db.json";

const LOG_FILE_NAME: &str = "injection-db.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Service settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the release host
    pub source_server_db_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_server_db_path: DEFAULT_SOURCE_SERVER_DB_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the directory containing the running executable,
/// or `.` if it cannot be determined.
pub fn app_dir() -> PathBuf {
    app_dir_from_exe(std::env::current_exe().ok())
}

/// Returns the root of the installed databases.
pub fn database_root(app_dir: &Path) -> PathBuf {
    app_dir.join(DATABASE_DIR_NAME)
}

pub fn settings_path(app_dir: &Path) -> PathBuf {
    app_dir.join(SETTINGS_FILE_NAME)
}

pub fn log_path(app_dir: &Path) -> PathBuf {
    app_dir.join(LOG_FILE_NAME)
}

fn app_dir_from_exe(exe: Option<PathBuf>) -> PathBuf {
    exe.as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
