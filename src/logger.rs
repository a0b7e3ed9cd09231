use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::batch::BatchSummary;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,    // Only show progress bar and final summary
    Summary = 1,   // Per-entry progress (default)
    Detailed = 2,  // Extraction gaps, warnings
    Debug = 3,     // Everything, including URLs and byte counts
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }
}

#[derive(Clone)]
pub struct RunLogger {
    verbosity: VerbosityLevel,
    progress_bar: Arc<Mutex<Option<ProgressBar>>>,
    log_buffer: Arc<Mutex<Vec<String>>>,
    log_file_path: Option<String>,
}

impl RunLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Arc::new(Mutex::new(None)),
            log_buffer: Arc::new(Mutex::new(Vec::new())),
            log_file_path: None,
        }
    }

    pub fn with_log_file(verbosity: VerbosityLevel, log_file_path: String) -> Self {
        Self {
            log_file_path: Some(log_file_path),
            ..Self::new(verbosity)
        }
    }

    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("WARN", message);
        }
    }

    pub fn error(&self, message: &str) {
        // Errors are shown at every verbosity
        self.print_message("ERROR", message);
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Debug {
            self.print_message("DEBUG", message);
        }
    }

    fn print_message(&self, level: &str, message: &str) {
        let timestamp = self.get_timestamp();
        let msg = format!("[{}] {}: {}", timestamp, level, message);

        if self.log_file_path.is_some() {
            if let Ok(mut buffer) = self.log_buffer.lock() {
                buffer.push(msg.clone());
            }
        }

        // Print above the progress bar so it keeps its position
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.println(msg);
                return;
            }
        }

        eprintln!("{}", msg);
    }

    fn get_timestamp(&self) -> String {
        chrono::Local::now().format("%H:%M:%S%.3f").to_string()
    }

    pub fn start_progress(&self, total_entries: u64) {
        let pb = ProgressBar::new(total_entries);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.progress_bar.lock() {
            *guard = Some(pb);
        }
    }

    pub fn update_progress(&self, message: &str) {
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(message.to_string());
            }
        }
    }

    pub fn advance_progress(&self) {
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    pub fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    // Per-entry progress

    pub fn log_run_start(&self, input: &str, output: &str, entry_count: usize) {
        self.info(&format!("Input file: {}", input));
        self.info(&format!("Output file: {}", output));
        self.info(&format!("Entries to process: {}", entry_count));
    }

    pub fn log_entry_start(&self, position: usize, total: usize, name: &str) {
        self.update_progress(name);
        self.info(&format!("Processing {}/{}: {}...", position, total, name));
    }

    pub fn log_entry_url(&self, url: &str) {
        self.debug(&format!("Requesting {}", url));
    }

    pub fn log_entry_success(&self, name: &str, category: &str, missing_fields: usize) {
        self.info(&format!("  Success: {}", category));
        if missing_fields > 0 {
            self.warn(&format!("  {} field(s) not found on the page for {}", missing_fields, name));
        }
        self.advance_progress();
    }

    pub fn log_entry_failed(&self, name: &str, reason: &str) {
        self.error(&format!("  Failed to fetch {}: {}", name, reason));
        self.advance_progress();
    }

    /// Final summary; always printed regardless of verbosity
    pub fn print_final_summary(&self, summary: &BatchSummary) {
        for line in summary_lines(summary) {
            if self.log_file_path.is_some() {
                if let Ok(mut buffer) = self.log_buffer.lock() {
                    buffer.push(line.clone());
                }
            }
            println!("{}", line);
        }
        let _ = io::stdout().flush();
    }

    /// Export all collected logs to the configured log file
    pub fn export_logs(&self) -> io::Result<()> {
        let Some(ref log_file_path) = self.log_file_path else {
            return Ok(());
        };
        let Ok(buffer) = self.log_buffer.lock() else {
            return Ok(());
        };

        if let Some(parent) = Path::new(log_file_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)?;

        for log_entry in buffer.iter() {
            writeln!(file, "{}", log_entry)?;
        }

        file.flush()
    }

    pub fn is_log_export_enabled(&self) -> bool {
        self.log_file_path.is_some()
    }

    pub fn get_log_count(&self) -> usize {
        self.log_buffer.lock().map(|buffer| buffer.len()).unwrap_or(0)
    }
}

fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    vec![
        String::new(),
        "=== RUN SUMMARY ===".to_string(),
        format!("Started: {}", summary.started_at),
        format!("Completed: {}", summary.completed_at),
        format!("Duration: {:.2}s", summary.duration_secs),
        format!("Entries: {}", summary.total),
        format!("Succeeded: {}", summary.succeeded),
        format!("Failed: {}", summary.failed),
        format!("Records with missing fields: {}", summary.incomplete),
        format!("Results written to: {}", summary.output_path.display()),
        "===================".to_string(),
        String::new(),
        format!(
            "Successfully processed {}/{} entries",
            summary.succeeded, summary.total
        ),
    ]
}
