//! Line-delimited JSON output sink.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use bbyscrape_scraper::NormalizedProduct;

/// Appends one serialized record per line. Imposes no dedup and no ordering
/// beyond write order.
pub struct JsonlWriter {
    out: BufWriter<File>,
}

impl JsonlWriter {
    /// Creates (truncating) the output file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directories or the file cannot be created.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Serializes one product as a single compact JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn write(&mut self, product: &NormalizedProduct) -> anyhow::Result<()> {
        let line = serde_json::to_string(product)?;
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error when the flush fails.
    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
