//! JSON file backed printer directory.
//!
//! The file holds a single object with a `printers` array:
//!
//! ```json
//! {
//!   "printers": [
//!     {
//!       "name": "Shipping",
//!       "host": "203.0.113.10",
//!       "port": 9100,
//!       "token": "k3x9-shipping",
//!       "timeout_seconds": 10,
//!       "active": true,
//!       "notes": "Zebra ZT410 behind the loading dock NAT"
//!     }
//!   ]
//! }
//! ```
//!
//! The file is read on every lookup, so edits take effect on the next
//! request without a restart. A file that fails validation (for example two
//! records sharing a token) makes every lookup fail rather than serving a
//! partially valid set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DirectoryError;

use super::{PrinterConfig, PrinterDirectory, PrinterTable};

/// On-disk layout of the directory file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterFile {
    #[serde(default)]
    pub printers: Vec<PrinterConfig>,
}

/// Printer directory stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileDirectory {
    path: PathBuf,
}

impl FileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the file.
    pub async fn load(&self) -> Result<PrinterTable, DirectoryError> {
        let path_str = self.path.display().to_string();

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DirectoryError::Io {
                path: path_str.clone(),
                source,
            })?;

        let file: PrinterFile =
            serde_json::from_slice(&data).map_err(|e| DirectoryError::Parse {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let table = PrinterTable::from_printers(file.printers)?;
        debug!(path = %path_str, printers = table.len(), "Loaded printer directory");
        Ok(table)
    }
}

#[async_trait]
impl PrinterDirectory for FileDirectory {
    async fn lookup_by_token(&self, token: &str) -> Result<Option<PrinterConfig>, DirectoryError> {
        if token.is_empty() {
            return Ok(None);
        }
        let table = self.load().await?;
        Ok(table.find_active(token).cloned())
    }

    async fn list(&self) -> Result<Vec<PrinterConfig>, DirectoryError> {
        Ok(self.load().await?.printers().to_vec())
    }
}
