// output_sink.rs - Incremental writer for formatted entry blocks
//
// The output file is created (truncating any previous run) before the first
// request, and every block is flushed as soon as it is formatted. A crash or
// kill mid-batch leaves all completed entries on disk.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct OutputSink {
    writer: BufWriter<File>,
    path: PathBuf,
    count: usize,
}

impl OutputSink {
    /// Create (or truncate) the output file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            count: 0,
        })
    }

    /// Append one formatted block and flush it to disk
    pub fn append_block(&mut self, block: &str) -> Result<()> {
        self.writer
            .write_all(block.as_bytes())
            .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        self.count += 1;
        Ok(())
    }

    /// Number of blocks written so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, returning its path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        Ok(self.path)
    }
}
