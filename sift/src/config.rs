use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::errors::SearchError;
use crate::pager::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// File looked up in the working directory when no config path is given.
pub const CONFIG_FILE: &str = "sift.toml";

/// Configuration stored in `sift.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u64 {
    MAX_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory that relative record-file paths are resolved against.
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dir: default_data_dir() }
    }
}

fn default_data_dir() -> String {
    ".".to_string()
}

impl DataSettings {
    /// The data directory with any `${VAR}` placeholder expanded.
    pub fn resolved_dir(&self) -> Result<PathBuf, SearchError> {
        expand_env(&self.dir).map(PathBuf::from)
    }

    /// Resolve a record file path: absolute paths are kept, relative ones are
    /// joined onto the data directory.
    pub fn resolve(&self, file: &Path) -> Result<PathBuf, SearchError> {
        if file.is_absolute() {
            Ok(file.to_path_buf())
        } else {
            Ok(self.resolved_dir()?.join(file))
        }
    }
}

impl SiftConfig {
    pub fn from_toml(content: &str) -> Result<Self, SearchError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if given (it must exist), otherwise `sift.toml` in the
    /// working directory if present, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SearchError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Expand a whole-value `${VAR}` placeholder from the environment.
pub fn expand_env(value: &str) -> Result<String, SearchError> {
    if let Some(var_name) = value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        std::env::var(var_name).map_err(|_| SearchError::Other {
            message: Cow::Owned(format!("Environment variable {var_name} not set")),
        })
    } else {
        Ok(value.to_string())
    }
}
