//! Configuration management for the ZPL relay.
//!
//! Configuration comes from command-line arguments via clap, with
//! environment variable fallbacks using the `ZPL_RELAY_` prefix.
//!
//! # Environment Variables
//!
//! - `ZPL_RELAY_HOST` - Server bind address (default: 0.0.0.0)
//! - `ZPL_RELAY_PORT` - Server port (default: 8080)
//! - `ZPL_RELAY_PRINTERS` - Path to the printer directory JSON file (required)
//! - `ZPL_RELAY_MAX_BODY_BYTES` - Largest accepted request body (default: 8 MiB)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::server::DEFAULT_MAX_BODY_BYTES;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CLI Arguments
// =============================================================================

/// ZPL Relay - forwards ZPL print jobs from a webhook to network label printers.
#[derive(Parser, Debug)]
#[command(name = "zpl-relay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the webhook server.
    Serve(ServeConfig),

    /// Validate a printer directory file and optionally probe each printer.
    Check(CheckConfig),
}

/// Options for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ZPL_RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ZPL_RELAY_PORT")]
    pub port: u16,

    /// Maximum request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "ZPL_RELAY_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // =========================================================================
    // Printer Directory
    // =========================================================================
    /// JSON file mapping tokens to printers.
    ///
    /// The file is re-read on every request, so edits apply without a restart.
    #[arg(long, env = "ZPL_RELAY_PRINTERS")]
    pub printers: PathBuf,

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

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Bind host must not be empty. Set --host or ZPL_RELAY_HOST".to_string());
        }

        if self.printers.as_os_str().is_empty() {
            return Err(
                "Printer directory file is required. Set --printers or ZPL_RELAY_PRINTERS"
                    .to_string(),
            );
        }

        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Options for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// JSON file mapping tokens to printers.
    #[arg(long, env = "ZPL_RELAY_PRINTERS")]
    pub printers: PathBuf,

    /// Attempt a TCP connection to every active printer.
    #[arg(long, default_value_t = false)]
    pub probe: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
