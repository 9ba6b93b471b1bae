//! In-memory printer directory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DirectoryError;

use super::{PrinterConfig, PrinterDirectory, PrinterTable};

/// Printer directory held in process memory.
///
/// Cloning is cheap and clones share the same records, so an administrative
/// handle can mutate the directory while the server reads from it. Every
/// change is visible to the next lookup.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    table: Arc<RwLock<PrinterTable>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory from an already validated table.
    pub fn from_table(table: PrinterTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }

    /// Create a directory from records, enforcing token uniqueness.
    pub fn with_printers(
        printers: impl IntoIterator<Item = PrinterConfig>,
    ) -> Result<Self, DirectoryError> {
        Ok(Self::from_table(PrinterTable::from_printers(printers)?))
    }

    /// Register a new printer.
    pub async fn insert(&self, printer: PrinterConfig) -> Result<(), DirectoryError> {
        self.table.write().await.insert(printer)
    }

    /// Replace the printer currently holding `token`.
    pub async fn update(&self, token: &str, printer: PrinterConfig) -> Result<(), DirectoryError> {
        self.table.write().await.update(token, printer)
    }

    /// Delete the printer holding `token`.
    pub async fn remove(&self, token: &str) -> Result<PrinterConfig, DirectoryError> {
        self.table.write().await.remove(token)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }
}

#[async_trait]
impl PrinterDirectory for MemoryDirectory {
    async fn lookup_by_token(&self, token: &str) -> Result<Option<PrinterConfig>, DirectoryError> {
        Ok(self.table.read().await.find_active(token).cloned())
    }

    async fn list(&self) -> Result<Vec<PrinterConfig>, DirectoryError> {
        Ok(self.table.read().await.printers().to_vec())
    }
}
