//! Named loggers emitting `tracing` events to a colorized console layer and a
//! plain-text file layer
//!
//! Every logger writes lines shaped as
//! `[dd-Mon-yy HH:MM:SS] [LEVEL] [name] =>>> message`. The console layer
//! colors the prefix by level; the file layer stays plain. Each logger owns its
//! own `Dispatch`, so no global subscriber is installed.

mod format;
mod writers;

pub use format::LineFormat;
pub use writers::{CaptureWriter, FileWriter, LogFile};

use colored::{ColoredString, Colorize};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Log file written in the working directory by registry loggers
pub const LOG_FILE: &str = "file.log";

/// Timestamp layout used in every line
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%y %H:%M:%S";

/// Severity levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    /// Emitted as a `tracing` ERROR event carrying `critical = true`
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Apply the console color for this level
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            Self::Debug => text.cyan(),
            Self::Info => text.green(),
            Self::Warning => text.yellow(),
            Self::Error => text.red(),
            Self::Critical => text.red().on_white(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named facade over a private `tracing` dispatcher
pub struct Logger {
    name: String,
    level: Level,
    dispatch: Dispatch,
    file: Option<FileWriter>,
    closed: AtomicBool,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Logger {
    /// Create a logger writing to the console and to `file.log` in the working directory
    pub fn new(name: &str) -> io::Result<Self> {
        Self::with_log_file(name, LOG_FILE)
    }

    /// Create a logger writing to the console and to the file at `path`
    pub fn with_log_file<P: AsRef<Path>>(name: &str, path: P) -> io::Result<Self> {
        Ok(Self::with_shared_file(name, LogFile::open(path)?))
    }

    /// Console plus an already opened log file, possibly shared with other loggers
    pub fn with_shared_file(name: &str, file: LogFile) -> Self {
        Self::build(name, true, Some(FileWriter::new(file)), None)
    }

    /// File output only, no console
    pub fn file_only(name: &str, file: LogFile) -> Self {
        Self::build(name, false, Some(FileWriter::new(file)), None)
    }

    /// Console output only
    pub fn console_only(name: &str) -> Self {
        Self::build(name, true, None, None)
    }

    /// Logger writing only into an in-memory buffer, returned alongside it
    pub fn in_memory(name: &str) -> (Self, CaptureWriter) {
        let capture = CaptureWriter::new();
        let logger = Self::build(name, false, None, Some(capture.clone()));
        (logger, capture)
    }

    fn build(
        name: &str,
        console: bool,
        file: Option<FileWriter>,
        capture: Option<CaptureWriter>,
    ) -> Self {
        let console_layer = console.then(|| {
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(true)
                .with_writer(io::stderr)
        });

        let file_layer = file.clone().map(|writer| {
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(writer)
        });

        let capture_layer = capture.map(|writer| {
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(writer)
        });

        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::DEBUG)
            .with(console_layer)
            .with(file_layer)
            .with(capture_layer);

        Self {
            name: name.to_string(),
            level: Level::Debug,
            dispatch: Dispatch::new(subscriber),
            file,
            closed: AtomicBool::new(false),
        }
    }

    /// Set the minimum level that is emitted
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Emit `message` at `level`. Writer failures never reach the caller.
    pub fn log(&self, level: Level, message: &str) {
        if level < self.level || self.is_closed() {
            return;
        }

        let name = self.name.as_str();
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::Debug => tracing::debug!(logger = name, "{}", message),
            Level::Info => tracing::info!(logger = name, "{}", message),
            Level::Warning => tracing::warn!(logger = name, "{}", message),
            Level::Error => tracing::error!(logger = name, "{}", message),
            Level::Critical => tracing::error!(logger = name, critical = true, "{}", message),
        });
    }

    pub fn debug<S: AsRef<str>>(&self, message: S) {
        self.log(Level::Debug, message.as_ref());
    }

    pub fn info<S: AsRef<str>>(&self, message: S) {
        self.log(Level::Info, message.as_ref());
    }

    pub fn warning<S: AsRef<str>>(&self, message: S) {
        self.log(Level::Warning, message.as_ref());
    }

    pub fn error<S: AsRef<str>>(&self, message: S) {
        self.log(Level::Error, message.as_ref());
    }

    pub fn critical<S: AsRef<str>>(&self, message: S) {
        self.log(Level::Critical, message.as_ref());
    }

    /// Flush and release the file handle. Safe to call more than once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(file) = &self.file {
            file.release();
        }
        let _ = io::stderr().flush();
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

static SHARED_LOG_FILE: Lazy<Option<LogFile>> = Lazy::new(|| match LogFile::open(LOG_FILE) {
    Ok(file) => Some(file),
    Err(err) => {
        eprintln!("{} cannot open {}: {}", "Warning:".yellow(), LOG_FILE, err);
        None
    }
});

static LOGGERS: Lazy<Mutex<HashMap<String, Arc<Logger>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Process-wide logger for `name`, created on first use.
///
/// All registry loggers share one `file.log` handle so appends from different
/// names go through the same lock. When the log file cannot be opened the
/// logger writes to the console only.
pub fn logger(name: &str) -> Arc<Logger> {
    let mut loggers = LOGGERS.lock().unwrap_or_else(PoisonError::into_inner);

    loggers
        .entry(name.to_string())
        .or_insert_with(|| {
            let logger = match SHARED_LOG_FILE.as_ref() {
                Some(file) => Logger::with_shared_file(name, file.clone()),
                None => Logger::console_only(name),
            };
            Arc::new(logger)
        })
        .clone()
}

/// Close every logger handed out by [`logger`]
pub fn shutdown() {
    let loggers = LOGGERS.lock().unwrap_or_else(PoisonError::into_inner);
    for logger in loggers.values() {
        logger.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_line_format() {
        let (logger, capture) = Logger::in_memory("api_harness::api");
        logger.info("Sending GET request to http://localhost/users");

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("] [INFO] [api_harness::api] =>>> Sending GET request"));
        assert!(!lines[0].contains('\u{1b}'));
    }

    #[test]
    fn test_levels_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Critical);
        assert_eq!(Level::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_every_level_is_emitted_by_default() {
        let (logger, capture) = Logger::in_memory("levels");
        logger.debug("d");
        logger.info("i");
        logger.warning("w");
        logger.error("e");
        logger.critical("c");

        assert_eq!(capture.lines().len(), 5);
        assert_eq!(capture.lines_at(Level::Error).len(), 1);
        let critical = capture.lines_at(Level::Critical);
        assert_eq!(critical.len(), 1);
        assert!(critical[0].ends_with("[CRITICAL] [levels] =>>> c"));
    }

    #[test]
    fn test_level_threshold() {
        let (logger, capture) = Logger::in_memory("quiet");
        let logger = logger.with_level(Level::Error);
        logger.info("dropped");
        logger.error("kept");

        assert_eq!(capture.lines().len(), 1);
        assert!(capture.lines()[0].ends_with("=>>> kept"));
    }

    #[test]
    fn test_console_colors() {
        colored::control::set_override(true);
        assert_eq!(Level::Info.paint("x").to_string(), "x".green().to_string());
        assert_eq!(Level::Critical.paint("x").to_string(), "x".red().on_white().to_string());
        colored::control::unset_override();
    }

    #[test]
    fn test_log_file_gets_plain_lines_and_closes_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.log");
        let logger = Logger::with_log_file("closing", &path).unwrap();

        logger.info("only line");
        logger.close();
        logger.close();
        logger.info("after close");

        assert!(logger.is_closed());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("[INFO] [closing] =>>> only line"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_shared_file_outlives_one_logger() {
        let temp_dir = TempDir::new().unwrap();
        let file = LogFile::open(temp_dir.path().join("file.log")).unwrap();

        let first = Logger::file_only("first", file.clone());
        let second = Logger::file_only("second", file.clone());
        first.warning("one");
        first.close();
        second.error("two");
        second.close();

        let content = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[WARNING] [first]"));
        assert!(lines[1].contains("[ERROR] [second]"));
    }

    #[test]
    fn test_log_file_appends_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.log");

        let first = Logger::file_only("first", LogFile::open(&path).unwrap());
        first.info("one");
        drop(first);

        let second = Logger::file_only("second", LogFile::open(&path).unwrap());
        second.info("two");
        drop(second);

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_registry_returns_same_logger() {
        let a = logger("api_harness::registry_test");
        let b = logger("api_harness::registry_test");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "api_harness::registry_test");
    }
}
