// WHOIS Client - Logger
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Stderr logger for the command-line client
//!
//! Stdout is reserved for whois text, so every diagnostic goes to stderr.
//! Levels follow the systemd priority ordering used by the server logger:
//! a lower number is more severe.

use std::sync::OnceLock;

/// Log levels, ordered by systemd priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 3,
    Warning = 4,
    Info = 6,
    Debug = 7,
}

impl LogLevel {
    pub fn priority(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warning => "\x1b[33m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Debug => "\x1b[37m",
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Least severe level that is still printed
    pub min_level: LogLevel,
    pub use_colors: bool,
    pub include_timestamp: bool,
    /// Print the emitting module path next to the level
    pub include_target: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Warning,
            use_colors: atty::is(atty::Stream::Stderr),
            include_timestamp: false,
            include_target: false,
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Install the process-wide logger. Only the first call wins.
    pub fn init(config: LoggerConfig) -> Result<(), LoggerError> {
        LOGGER
            .set(Self::new(config))
            .map_err(|_| LoggerError::AlreadyInitialized)
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if self.should_log(level) {
            eprintln!("{}", self.format(level, target, message));
        }
    }

    fn format(&self, level: LogLevel, target: &str, message: &str) -> String {
        let mut output = String::new();

        if self.config.include_timestamp {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            output.push_str(&format!("{} ", now));
        }

        if self.config.use_colors {
            output.push_str(&format!("{}[{}]\x1b[0m", level.color_code(), level.as_str()));
        } else {
            output.push_str(&format!("[{}]", level.as_str()));
        }

        if self.config.include_target && !target.is_empty() {
            output.push_str(&format!(" {}:", target));
        }

        output.push(' ');
        output.push_str(message);
        output
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Error, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Warning, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Info, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Debug, module_path!(), &format!($($arg)*))
    };
}

/// Messages logged before `init` are dropped
pub fn log_with_level(level: LogLevel, target: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(level, target, message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Initialize the logger from the `-d` flag
pub fn init_from_args(debug: bool) -> Result<(), LoggerError> {
    let config = LoggerConfig {
        min_level: if debug { LogLevel::Debug } else { LogLevel::Warning },
        include_timestamp: debug,
        include_target: debug,
        ..Default::default()
    };

    Logger::init(config)
}
