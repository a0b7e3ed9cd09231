//! Batch driver: reads entry names and processes them one at a time
//!
//! For every name, in input order:
//! - fetch the entry page (one attempt)
//! - extract the record fields, or note the fetch failure
//! - format the block and append it to the output file
//! - pause before the next request
//!
//! A failed entry never stops the batch. Only an unreadable input file or an
//! unwritable output file is fatal.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::extractor::{FieldExtractor, WikiExtractor};
use crate::fetcher::{EntryFetcher, FetchError};
use crate::logger::RunLogger;
use crate::output_sink::OutputSink;
use crate::record::{format_entry, format_error, ExtractedRecord};
use crate::wiki_url::EntryName;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read input file {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output file {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },

    #[error(transparent)]
    Fetcher(#[from] FetchError),
}

/// Outcome of processing a single entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Success {
        name: EntryName,
        url: String,
        record: ExtractedRecord,
    },
    Failed {
        name: EntryName,
        url: String,
        reason: String,
    },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EntryOutcome::Success { .. })
    }

    /// Output block for this entry
    pub fn to_block(&self) -> String {
        match self {
            EntryOutcome::Success { name, url, record } => format_entry(&name.display, record, url),
            EntryOutcome::Failed { name, reason, .. } => format_error(&name.display, reason),
        }
    }
}

/// Summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Number of entries read from the input file
    pub total: usize,
    /// Entries whose page was fetched and formatted
    pub succeeded: usize,
    /// Entries written as ERROR lines
    pub failed: usize,
    /// Successful entries with at least one field left as a placeholder
    pub incomplete: usize,
    /// Where the blocks were written
    pub output_path: PathBuf,
    /// Total batch duration in seconds
    pub duration_secs: f64,
    /// Timestamp when batch started
    pub started_at: String,
    /// Timestamp when batch completed
    pub completed_at: String,
}

/// Tunables for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause between consecutive requests
    pub request_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
        }
    }
}

impl BatchOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.batch.request_delay_ms),
        }
    }
}

/// Parse entry names from input file content.
///
/// Lines are trimmed and blank lines skipped. A leading UTF-8 BOM is ignored.
pub fn parse_entry_names(content: &str) -> Vec<EntryName> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(EntryName::new)
        .collect()
}

/// Read and parse the input file
pub fn read_entry_names(path: &Path) -> Result<Vec<EntryName>, BatchError> {
    let content = fs::read_to_string(path).map_err(|source| BatchError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_entry_names(&content))
}

pub struct BatchRunner {
    fetcher: EntryFetcher,
    extractor: Box<dyn FieldExtractor>,
    logger: RunLogger,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(fetcher: EntryFetcher, logger: RunLogger, options: BatchOptions) -> Self {
        Self {
            fetcher,
            extractor: Box::new(WikiExtractor),
            logger,
            options,
        }
    }

    /// Build a runner from configuration with the default extractor
    pub fn from_config(config: &AppConfig, logger: RunLogger) -> Result<Self, BatchError> {
        let fetcher = EntryFetcher::new(&config.http)?;
        Ok(Self::new(fetcher, logger, BatchOptions::from_config(config)))
    }

    /// Swap in a different extraction strategy
    pub fn with_extractor(mut self, extractor: Box<dyn FieldExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetch and extract a single entry
    pub async fn process_entry(&self, name: &EntryName) -> EntryOutcome {
        let url = self.fetcher.url_for(name);
        self.logger.log_entry_url(&url);

        match self.fetcher.fetch(name).await {
            Ok(page) => {
                self.logger.debug(&format!(
                    "  HTTP {} with {} bytes from {}",
                    page.status,
                    page.body.len(),
                    page.url
                ));
                let record = self.extractor.extract(&page.body);
                debug!(
                    "Extracted {}: category={:?} native={:?} index={}",
                    name.display, record.category, record.native_name, record.index
                );
                EntryOutcome::Success {
                    name: name.clone(),
                    url: page.url,
                    record,
                }
            }
            Err(e) => EntryOutcome::Failed {
                name: name.clone(),
                url,
                reason: e.to_string(),
            },
        }
    }

    /// Process every entry of `input_path`, writing blocks to `output_path`
    pub async fn run(&self, input_path: &Path, output_path: &Path) -> Result<BatchSummary, BatchError> {
        let started = Instant::now();
        let started_at = Utc::now().to_rfc3339();

        // Input is read before the output file is touched
        let names = read_entry_names(input_path)?;

        let mut sink = OutputSink::create(output_path).map_err(|e| BatchError::Output {
            path: output_path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        let total = names.len();
        self.logger.log_run_start(
            &input_path.display().to_string(),
            &output_path.display().to_string(),
            total,
        );
        self.logger.debug(&format!("Wiki host: {}", self.fetcher.base_url()));
        self.logger.start_progress(total as u64);

        let mut succeeded = 0;
        let mut failed = 0;
        let mut incomplete = 0;

        for (i, name) in names.iter().enumerate() {
            self.logger.log_entry_start(i + 1, total, &name.display);

            let outcome = self.process_entry(name).await;
            match &outcome {
                EntryOutcome::Success { record, .. } => {
                    succeeded += 1;
                    if record.missing_fields() > 0 {
                        incomplete += 1;
                    }
                    self.logger.log_entry_success(
                        &name.display,
                        record.category_or_unknown(),
                        record.missing_fields(),
                    );
                }
                EntryOutcome::Failed { reason, .. } => {
                    failed += 1;
                    self.logger.log_entry_failed(&name.display, reason);
                }
            }

            sink.append_block(&outcome.to_block()).map_err(|e| BatchError::Output {
                path: output_path.to_path_buf(),
                message: format!("{:#}", e),
            })?;

            if i + 1 < total && !self.options.request_delay.is_zero() {
                tokio::time::sleep(self.options.request_delay).await;
            }
        }

        debug!("Wrote {} blocks to {}", sink.count(), sink.path().display());
        let output_path = sink.finish().map_err(|e| BatchError::Output {
            path: output_path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        self.logger.finish_progress();

        Ok(BatchSummary {
            total,
            succeeded,
            failed,
            incomplete,
            output_path,
            duration_secs: started.elapsed().as_secs_f64(),
            started_at,
            completed_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Run a whole batch with settings taken from `config`
pub async fn run(
    input_path: &Path,
    output_path: &Path,
    config: &AppConfig,
    logger: RunLogger,
) -> Result<BatchSummary, BatchError> {
    BatchRunner::from_config(config, logger)?
        .run(input_path, output_path)
        .await
}
