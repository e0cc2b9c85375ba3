use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy)]
enum LogLevel {
    Debug,
    Info(Color),
    Warn,
    Error,
}

impl LogLevel {
    fn severity(self) -> Severity {
        match self {
            LogLevel::Debug => Severity::Debug,
            LogLevel::Info(_) => Severity::Info,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Error => Severity::Error,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info(_) => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[90m", // Bright black
            LogLevel::Info(color) => color.to_ansi_code(),
            LogLevel::Warn => "\x1b[93m",  // Bright yellow
            LogLevel::Error => "\x1b[91m", // Bright red
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Session logger for a replay run.
///
/// Every message carries a local timestamp and is appended to
/// `replay_<session>.log` when the logger was built with [`Logger::new`].
/// A logger built with [`Logger::console`] has no file sink and only writes
/// the messages that ask to be echoed.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: Option<PathBuf>,
    min_severity: Severity,
}

impl Logger {
    /// Creates a logger writing to `<log_dir>/replay_<session>.log`.
    ///
    /// The directory must already exist. The file is truncated so each
    /// session starts with an empty log.
    pub fn new(log_dir: &Path, session: &str) -> Result<Self, LoggerError> {
        if !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }

        let log_file = log_dir.join(log_file_name(session));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file: Some(log_file),
            min_severity: Severity::Debug,
        })
    }

    /// Creates a logger without a file sink.
    pub fn console() -> Self {
        Logger {
            log_file: None,
            min_severity: Severity::Info,
        }
    }

    /// Drops every message below `severity`.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    fn log(&self, level: LogLevel, message: &str, to_console: bool) -> Result<(), LoggerError> {
        if level.severity() < self.min_severity {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{}] [{}]: {}\n", level.tag(), timestamp, message);

        if to_console {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}{}\x1b[0m", level.ansi(), line)?;
            stdout.flush()?;
        }

        if let Some(path) = &self.log_file {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }

        Ok(())
    }

    /// Logs a debug message. Debug messages never reach the console.
    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Debug, message, false)
    }

    /// Logs an informational message, optionally echoing it in `color`.
    pub fn info(&self, message: &str, color: Color, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Info(color), message, to_console)
    }

    pub fn warn(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Warn, message, to_console)
    }

    pub fn error(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Error, message, to_console)
    }
}

// Session names come from timestamps or user input; keep them file-name safe.
fn log_file_name(session: &str) -> String {
    let sanitized: String = session
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("replay_{}.log", sanitized)
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid Path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logger_creation_and_logging() {
        let log_dir = tempfile::tempdir().expect("Failed to create test directory");

        let logger =
            Logger::new(log_dir.path(), "2024-05-01 10:00").expect("Failed to create logger");
        logger
            .info("Mission-1 loaded.", Color::Green, false)
            .expect("Failed to log message");
        logger.debug("marker moved").expect("Failed to log debug");

        let log_path = log_dir.path().join("replay_2024-05-01_10_00.log");
        assert_eq!(logger.log_file(), Some(log_path.as_path()));

        let log_contents = fs::read_to_string(&log_path).expect("Failed to read log file");
        assert!(log_contents.contains("[INFO]"), "INFO level missing in log");
        assert!(log_contents.contains("Mission-1 loaded."), "Logged message missing");
        assert!(log_contents.contains("[DEBUG]"), "DEBUG level missing in log");
    }

    #[test]
    fn test_min_severity_filters_messages() {
        let log_dir = tempfile::tempdir().expect("Failed to create test directory");
        let logger = Logger::new(log_dir.path(), "filtered")
            .expect("Failed to create logger")
            .with_min_severity(Severity::Warn);

        logger.debug("hidden debug").unwrap();
        logger.info("hidden info", Color::Blue, false).unwrap();
        logger.warn("visible warn", false).unwrap();

        let contents =
            fs::read_to_string(log_dir.path().join("replay_filtered.log")).unwrap();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("[WARN]"));
    }

    #[test]
    fn test_console_logger_has_no_file() {
        let logger = Logger::console();
        assert!(logger.log_file().is_none());
        assert!(logger.debug("nothing to write").is_ok());
    }

    #[test]
    fn test_invalid_path() {
        let result = Logger::new(Path::new("/invalid/path"), "session");
        assert!(matches!(result, Err(LoggerError::InvalidPath(_))));
    }
}
