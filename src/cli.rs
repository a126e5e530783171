use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Interactive simulation of a UNIX-like directory namespace.
///
/// Commands: touch, mkdir, cd, ls, pwd, rm, rmfs, mkfs, exit.
/// Exits with status 1 if any command failed.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Script to execute instead of reading commands from stdin
    pub script: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Print every command before its output
    #[clap(long, short)]
    pub echo: bool,
}

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}
