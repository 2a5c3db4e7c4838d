use pdf_merger_core::{MergeOptions, ServerConfig};

/// Application state shared by all requests.
///
/// Immutable after startup; each request owns its own merge accumulator.
#[derive(Debug, Clone)]
pub struct AppState {
    config: ServerConfig,
}

impl AppState {
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn default_output_filename(&self) -> &str {
        &self.config.default_output_filename
    }

    pub const fn merge_options(&self) -> &MergeOptions {
        &self.config.merge
    }
}
