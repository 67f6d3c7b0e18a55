//! Configuration module for Gifter-Radar
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use gifter_radar::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("radar.toml")).unwrap();
//! println!("Searching {} streams per category", config.search.stream_budget);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CredentialsConfig, EndpointConfig, HttpConfig, OutputConfig, PacingConfig,
    SearchConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

impl Config {
    /// Checks every section for values the crawler cannot work with
    pub fn validate(&self) -> crate::ConfigResult<()> {
        validation::validate(self)
    }
}
