//! Report of documents that could not be annotated

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Collects `file,message` rows and appends them to the out file
#[derive(Debug, Default)]
pub struct UnprocessedReport {
    out_file: Option<PathBuf>,
    pending: Vec<(String, String)>,
    total: usize,
}

impl UnprocessedReport {
    /// Start a report, deleting any previous out file
    pub fn new(out_file: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = &out_file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove old out file {}", path.display())
                    })
                }
            }
        }

        Ok(Self {
            out_file,
            ..Self::default()
        })
    }

    pub fn record(&mut self, file_name: String, message: String) {
        self.pending.push((file_name, message));
        self.total += 1;
    }

    /// Documents recorded over the whole run
    pub fn total(&self) -> usize {
        self.total
    }

    /// Append pending rows to the out file and clear them
    pub fn flush(&mut self) -> Result<()> {
        let Some(path) = &self.out_file else {
            self.pending.clear();
            return Ok(());
        };

        if self.pending.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open out file {}", path.display()))?;

        for (file_name, message) in self.pending.drain(..) {
            writeln!(file, "{},{}", file_name, message)
                .with_context(|| format!("Failed to write out file {}", path.display()))?;
        }

        Ok(())
    }
}
