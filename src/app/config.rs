//! Application configuration
//!
//! Settings that come from the command line rather than `config.toml`.

/// Application configuration structure
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Tracing filter that replaces the verbosity-derived one
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Create a new application configuration
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            log_filter: None,
        }
    }

    pub fn with_log_filter(mut self, filter: Option<String>) -> Self {
        self.log_filter = filter;
        self
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> &str {
        if let Some(filter) = &self.log_filter {
            return filter;
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
