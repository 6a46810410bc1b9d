//! Opt-in diagnostic logging

pub mod file_logger;

// Re-export file logger functions for convenience
pub use file_logger::{
    log, trace, debug, info, warn, error,
    is_enabled, log_file_path, clear_log, LogLevel,
};
