//! File-based storage connection.
//!
//! All repositories share one base directory:
//!
//! ```text
//! data/
//! ├── payments.yaml       -- recurring payment templates
//! └── transactions.csv    -- materialized transactions
//! ```

use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            std::fs::create_dir_all(&base_directory)?;
            info!("Created storage directory: {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn get_payments_file_path(&self) -> PathBuf {
        self.base_directory.join("payments.yaml")
    }

    pub fn get_transactions_file_path(&self) -> PathBuf {
        self.base_directory.join("transactions.csv")
    }

    /// Write `content` to `path` atomically: temp file first, then rename.
    pub fn write_atomically(&self, path: &Path, content: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}
