use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filename used for the merged document when the client does not supply one.
pub const DEFAULT_OUTPUT_FILENAME: &str = "merged.pdf";

/// Options controlling how the merged document is serialized
///
/// By default every input stream is copied byte for byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Re-encode streams with Flate before saving (changes stored bytes)
    #[serde(default)]
    pub compress: bool,
}

/// Server configuration
///
/// Built once at process start and handed to the router; nothing reads
/// configuration from global state after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// Filename used when a request carries no `output_filename`
    #[serde(default = "default_output_filename")]
    pub default_output_filename: String,

    /// Merge output options
    #[serde(default)]
    pub merge: MergeOptions,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_upload_mb() -> usize {
    300
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
            default_output_filename: default_output_filename(),
            merge: MergeOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, crate::error::Error> {
        toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/pdf-merger/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(user_config) = crate::util::user_config_path()
            && user_config.exists()
        {
            match Self::from_file(&user_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", user_config.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Request body limit in bytes
    pub const fn body_limit_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
