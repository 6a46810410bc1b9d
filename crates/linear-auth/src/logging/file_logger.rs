//! File-based diagnostic logger
//!
//! Credential code never prints: errors go back to the caller, which decides
//! what the user sees. This logger exists for troubleshooting a misbehaving
//! keychain and is disabled unless `LINEAR_AUTH_DEBUG` is set.
//!
//! Environment:
//! - `LINEAR_AUTH_DEBUG`: `1` or `true` enables logging
//! - `LINEAR_AUTH_LOG_LEVEL`: trace, debug, info, warn, error (default debug)
//! - `LINEAR_AUTH_LOG_FILE`: log path (default `<tmp>/linear-auth-debug.log`)
//!
//! Messages must never contain secret values.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

pub const ENV_DEBUG: &str = "LINEAR_AUTH_DEBUG";
pub const ENV_LOG_LEVEL: &str = "LINEAR_AUTH_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "LINEAR_AUTH_LOG_FILE";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Logger state behind the global lock
struct FileLoggerState {
    path: PathBuf,
    file: Option<File>,
    min_level: LogLevel,
    enabled: bool,
}

impl FileLoggerState {
    fn new(path: PathBuf, min_level: LogLevel, enabled: bool) -> Self {
        // Only touch the filesystem when logging is on
        let file = if enabled { open_append(&path) } else { None };
        Self {
            path,
            file,
            min_level,
            enabled,
        }
    }

    fn from_env() -> Self {
        let min_level = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogLevel::Debug);
        Self::new(Self::configured_path(), min_level, env_flag(ENV_DEBUG))
    }

    fn configured_path() -> PathBuf {
        match std::env::var_os(ENV_LOG_FILE) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::default_log_path(),
        }
    }

    fn default_log_path() -> PathBuf {
        std::env::temp_dir().join("linear-auth-debug.log")
    }

    fn write(&mut self, level: LogLevel, module: &str, message: &str) {
        if !self.enabled || level < self.min_level {
            return;
        }

        if let Some(ref mut file) = self.file {
            let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp(), level, module, message);
            let _ = file.flush();
        }
    }
}

/// UTC time of day with milliseconds
fn timestamp() -> String {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            format!(
                "{:02}:{:02}:{:02}.{:03}",
                (secs % 86400) / 3600,
                (secs % 3600) / 60,
                secs % 60,
                d.subsec_millis()
            )
        })
        .unwrap_or_else(|_| "??:??:??.???".to_string())
}

/// Global logger instance
static LOGGER: OnceLock<Mutex<FileLoggerState>> = OnceLock::new();

fn get_logger() -> &'static Mutex<FileLoggerState> {
    LOGGER.get_or_init(|| Mutex::new(FileLoggerState::from_env()))
}

/// Log a message at the specified level
pub fn log(level: LogLevel, module: &str, message: &str) {
    if let Ok(mut logger) = get_logger().lock() {
        logger.write(level, module, message);
    }
}

pub fn trace(module: &str, message: &str) {
    log(LogLevel::Trace, module, message);
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Whether diagnostic logging is switched on for this process
pub fn is_enabled() -> bool {
    get_logger().lock().map(|l| l.enabled).unwrap_or(false)
}

/// Debug-level log with the calling module path as the module name
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::logging::file_logger::debug(module_path!(), &format!($($arg)*))
    };
}

/// Path the logger writes to (or would write to, when disabled)
pub fn log_file_path() -> PathBuf {
    get_logger()
        .lock()
        .map(|l| l.path.clone())
        .unwrap_or_else(|_| FileLoggerState::configured_path())
}

/// Truncate the log file and reopen it
pub fn clear_log() {
    if let Ok(mut logger) = get_logger().lock() {
        if !logger.enabled {
            return;
        }
        if let Ok(file) = File::create(&logger.path) {
            drop(file);
        }
        logger.file = open_append(&logger.path);
    }
}
