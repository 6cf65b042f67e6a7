//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (CIRCUITKIT_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [signature]
//! vector_length = 16
//! prime_bound = 1000003
//!
//! [rewrite]
//! smooth_on_load = true
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! CIRCUITKIT_SIGNATURE__VECTOR_LENGTH=32
//! CIRCUITKIT_REWRITE__SMOOTH_ON_LOAD=false
//! ```

use figment::{providers::{Env, Format, Toml}, Figment};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signature: SignatureConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controls for `prob_equiv_signature` (spec.md §4.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// The length `k` of each variable's random vector
    #[serde(default = "default_vector_length")]
    pub vector_length: usize,

    /// The prime upper bound: each draw is `1/u` for `u` uniform in
    /// `[1, prime_bound]`. Must be at least
    /// `crate::dag::queries::MIN_SIGNATURE_PRIME`.
    #[serde(default = "default_prime_bound")]
    pub prime_bound: u64,

    /// Fixes the signature RNG for reproducible runs; `None` seeds from OS
    /// entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_vector_length() -> usize { 16 }
fn default_prime_bound() -> u64 { 1_000_003 }

impl Default for SignatureConfig {
    fn default() -> Self {
        SignatureConfig {
            vector_length: default_vector_length(),
            prime_bound: default_prime_bound(),
            seed: None,
        }
    }
}

/// Controls which rewrites a compile step applies automatically
/// (spec.md §4.4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Run `propagate_constants` immediately after parsing
    #[serde(default = "default_true")]
    pub propagate_constants_on_load: bool,

    /// Run `smooth` immediately after parsing
    #[serde(default)]
    pub smooth_on_load: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig { propagate_constants_on_load: true, smooth_on_load: false }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "text".to_string() }

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (CIRCUITKIT_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("CIRCUITKIT_").split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CIRCUITKIT_").split("__"))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signature: SignatureConfig::default(),
            rewrite: RewriteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_signature_bounds() {
        let config = Config::default();
        assert_eq!(config.signature.vector_length, 16);
        assert!(config.signature.prime_bound >= crate::dag::queries::MIN_SIGNATURE_PRIME);
        assert!(config.rewrite.propagate_constants_on_load);
    }

    #[test]
    fn config_serialization_round_trips_sections() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();

        assert!(toml_str.contains("[signature]"));
        assert!(toml_str.contains("[rewrite]"));
        assert!(toml_str.contains("[logging]"));
    }
}
