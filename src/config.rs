//! Configuration management for the IIIF inspector.
//!
//! This module provides the command-line interface:
//! - `serve` runs the JSON API
//! - `inspect` fetches one service and prints what it supports
//!
//! # Environment Variables
//!
//! Server options can be set via environment variables with the `IIIF_` prefix:
//!
//! - `IIIF_HOST` - Server bind address (default: 0.0.0.0)
//! - `IIIF_PORT` - Server port (default: 3000)
//! - `IIIF_CACHE_SIZE` - Max inspections to cache (default: 100)
//! - `IIIF_TIMEOUT` - Upstream request timeout in seconds (default: 30)
//! - `IIIF_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::registry::DEFAULT_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest accepted upstream timeout in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// IIIF Inspector - Inspect IIIF Image API services.
///
/// Fetches `info.json` documents, reports the service's compliance level and
/// capabilities, and builds canonical image request URLs.
#[derive(Parser, Debug, Clone)]
#[command(name = "iiif-inspector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeConfig),

    /// Inspect a single service and print a summary
    Inspect(InspectConfig),
}

/// Options for `serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IIIF_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IIIF_PORT")]
    pub port: u16,

    // =========================================================================
    // Upstream Configuration
    // =========================================================================
    /// Maximum number of inspected services to keep in cache.
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, env = "IIIF_CACHE_SIZE")]
    pub cache_size: usize,

    /// Timeout for fetching info.json, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "IIIF_TIMEOUT")]
    pub timeout: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "IIIF_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

/// Options for `inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// Service URL, info.json URL, or image request URL.
    pub input: String,

    /// Print the full inspection as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Timeout for fetching info.json, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "IIIF_TIMEOUT")]
    pub timeout: u64,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn validate_timeout(timeout: u64) -> Result<(), String> {
    if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
        return Err(format!(
            "timeout must be between 1 and {} seconds",
            MAX_TIMEOUT_SECS
        ));
    }
    Ok(())
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty. Set --host or IIIF_HOST".to_string());
        }

        if self.cache_size == 0 {
            return Err("cache_size must be greater than 0".to_string());
        }

        validate_timeout(self.timeout)?;

        if let Some(origins) = &self.cors_origins {
            if let Some(bad) = origins.iter().find(|o| o.trim().is_empty()) {
                return Err(format!("invalid CORS origin: {:?}", bad));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl InspectConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.trim().is_empty() {
            return Err("an input URL is required".to_string());
        }
        validate_timeout(self.timeout)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// =============================================================================
// Tests
// =============================================================================
