//! Printer directory: maps security tokens to printer configurations.
//!
//! The webhook resolves every request through a [`PrinterDirectory`]. Two
//! backends are provided:
//!
//! - [`MemoryDirectory`] - in-process store with administrative mutations
//! - [`FileDirectory`] - JSON file, re-read and validated on every lookup
//!
//! Both keep their records in a [`PrinterTable`], which enforces the storage
//! invariants: name, host and token are non-empty, and no two records share
//! a token (whether active or not).
//!
//! ```text
//! ┌──────────────┐   lookup_by_token   ┌────────────────────┐
//! │   Webhook    │ ──────────────────▶ │  PrinterDirectory  │
//! └──────────────┘                     └─────────┬──────────┘
//!                                        ┌───────┴────────┐
//!                                        ▼                ▼
//!                               MemoryDirectory     FileDirectory
//!                                        └───────┬────────┘
//!                                                ▼
//!                                          PrinterTable
//! ```

mod file;
mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::DirectoryError;

pub use file::{FileDirectory, PrinterFile};
pub use memory::MemoryDirectory;

// =============================================================================
// PrinterConfig
// =============================================================================

/// Configuration record for one network label printer.
///
/// `port` and `timeout_seconds` are stored as given; a value of zero means
/// "unset" and is resolved by the relay.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Human-readable label
    pub name: String,

    /// Hostname or IP address of the printer
    pub host: String,

    /// TCP port (0 = default)
    #[serde(default)]
    pub port: u16,

    /// Shared secret used by webhook callers
    pub token: String,

    /// Connect/write bound in seconds (0 = default)
    #[serde(default)]
    pub timeout_seconds: u64,

    /// Inactive printers are invisible to token lookup
    #[serde(default = "default_active")]
    pub active: bool,

    /// Free-form administrator notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

impl PrinterConfig {
    /// Create an active printer record with unset port and timeout.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: 0,
            token: token.into(),
            timeout_seconds: 0,
            active: true,
            notes: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Token with everything but the first four characters hidden.
    ///
    /// Short tokens are hidden entirely.
    pub fn masked_token(&self) -> String {
        let visible: String = self.token.chars().take(4).collect();
        if self.token.chars().count() <= 8 {
            "********".to_string()
        } else {
            format!("{}********", visible)
        }
    }

    /// Check the per-record storage invariants.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::EmptyName);
        }
        if self.host.trim().is_empty() {
            return Err(DirectoryError::MissingHost {
                name: self.name.clone(),
            });
        }
        if self.token.is_empty() {
            return Err(DirectoryError::EmptyToken {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

// The token is a credential; keep it out of debug output and logs.
impl fmt::Debug for PrinterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrinterConfig")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token", &self.masked_token())
            .field("timeout_seconds", &self.timeout_seconds)
            .field("active", &self.active)
            .field("notes", &self.notes)
            .finish()
    }
}

// =============================================================================
// PrinterDirectory Trait
// =============================================================================

/// Read access to printer configurations.
///
/// Implementations must not cache across calls in a way that hides
/// administrative changes: every lookup reflects the current store.
#[async_trait]
pub trait PrinterDirectory: Send + Sync {
    /// Find the active printer whose token equals `token` exactly.
    ///
    /// Returns `Ok(None)` for an empty, unknown or inactive token. `Err` is
    /// reserved for failures of the backing store.
    async fn lookup_by_token(&self, token: &str) -> Result<Option<PrinterConfig>, DirectoryError>;

    /// Enumerate every printer, active or not, in storage order.
    async fn list(&self) -> Result<Vec<PrinterConfig>, DirectoryError>;
}

// =============================================================================
// PrinterTable
// =============================================================================

/// A validated set of printer records with unique tokens.
#[derive(Debug, Clone, Default)]
pub struct PrinterTable {
    printers: Vec<PrinterConfig>,
}

impl PrinterTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, rejecting the first invalid or duplicate one.
    pub fn from_printers(
        printers: impl IntoIterator<Item = PrinterConfig>,
    ) -> Result<Self, DirectoryError> {
        let mut table = Self::new();
        for printer in printers {
            table.insert(printer)?;
        }
        Ok(table)
    }

    /// Add a record.
    pub fn insert(&mut self, printer: PrinterConfig) -> Result<(), DirectoryError> {
        printer.validate()?;
        if let Some(existing) = self.position(&printer.token) {
            return Err(DirectoryError::DuplicateToken {
                name: printer.name,
                existing: self.printers[existing].name.clone(),
            });
        }
        self.printers.push(printer);
        Ok(())
    }

    /// Replace the record currently holding `token`.
    ///
    /// The replacement may carry a new token, which must not collide with
    /// any other record.
    pub fn update(&mut self, token: &str, printer: PrinterConfig) -> Result<(), DirectoryError> {
        let index = self.position(token).ok_or(DirectoryError::UnknownToken)?;
        printer.validate()?;
        if let Some(other) = self.position(&printer.token) {
            if other != index {
                return Err(DirectoryError::DuplicateToken {
                    name: printer.name,
                    existing: self.printers[other].name.clone(),
                });
            }
        }
        self.printers[index] = printer;
        Ok(())
    }

    /// Remove and return the record holding `token`.
    pub fn remove(&mut self, token: &str) -> Result<PrinterConfig, DirectoryError> {
        let index = self.position(token).ok_or(DirectoryError::UnknownToken)?;
        Ok(self.printers.remove(index))
    }

    /// Find the active record holding `token`.
    pub fn find_active(&self, token: &str) -> Option<&PrinterConfig> {
        if token.is_empty() {
            return None;
        }
        self.printers
            .iter()
            .find(|p| tokens_match(&p.token, token))
            .filter(|p| p.active)
    }

    /// All records in insertion order.
    pub fn printers(&self) -> &[PrinterConfig] {
        &self.printers
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }

    fn position(&self, token: &str) -> Option<usize> {
        self.printers
            .iter()
            .position(|p| tokens_match(&p.token, token))
    }
}

/// Exact, constant-time token comparison.
fn tokens_match(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}

// =============================================================================
// Tests
// =============================================================================
