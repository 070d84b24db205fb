//! Configuration module for Living-Wage
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use living_wage::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("living_wage.toml")).unwrap();
//! println!("Scraping state {}", config.source.state_code);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
