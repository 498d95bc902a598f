//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, but adds file output capabilities.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata, LevelFilter};

use crate::fits::header::Header;
use crate::fits::keywords;

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level written
    level: LevelFilter,
    /// Echo every record to the console instead of warnings only
    verbose: bool,
}

impl Logger {
    /// Creates a new logger instance appending to a log file
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be opened
    pub fn new(log_file: &str) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: LevelFilter::Info,
            verbose: false,
        })
    }

    /// Creates a logger that discards its messages
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: LevelFilter::Off,
            verbose: false,
        }
    }

    /// Set the most verbose level; `Debug` and `Trace` also echo to the console
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self.verbose = level >= LevelFilter::Debug;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(file) = &mut *guard {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs header cards in a formatted way, with known keyword descriptions
    ///
    /// # Arguments
    ///
    /// * `header` - Header to log
    pub fn print_header(&self, header: &Header) -> io::Result<()> {
        self.log(&format!("Header ({} cards):", header.len()))?;

        for card in header {
            let line = match keywords::keyword_description(&card.keyword) {
                Some(description) => format!("  {}  [{}]", card.to_record().trim_end(), description),
                None => format!("  {}", card.to_record().trim_end()),
            };
            self.log(&line)?;
        }

        Ok(())
    }

    /// Static method to initialize the global logger
    ///
    /// The log file is truncated first; loggers created afterwards with
    /// [`Logger::new`] append to the same file.
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    /// * `level` - Most verbose level to record
    pub fn init_global_logger(log_file: &str, level: LevelFilter) -> io::Result<()> {
        File::create(Path::new(log_file))?;

        // Create a dedicated logger for the log crate
        let global_logger = Logger::new(log_file)?.with_level(level);

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            // Logger was already set - this should not happen in normal usage
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            // Warnings always reach the console, everything else only when verbose
            if self.verbose || record.level() <= Level::Warn {
                eprintln!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
