// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// Log file verbosity
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    /// IDs of the courses to download; discovered automatically when omitted
    #[arg(value_name = "COURSE_ID", value_parser = clap::value_parser!(u64))]
    pub course_ids: Vec<u64>,

    // --- Options ---
    /// Moodle site root, e.g. https://moodle.example.edu
    #[arg(long, value_name = "URL", help_heading = "Options")]
    pub base_url: Option<String>,
    /// Login user name
    #[arg(short, long, help_heading = "Options")]
    pub username: Option<String>,
    /// Directory the course folders are created in
    #[arg(short, long, value_name = "DIR", help_heading = "Options")]
    pub output: Option<PathBuf>,
    /// Seconds to wait before every request
    #[arg(long, value_name = "SECS", help_heading = "Options")]
    pub request_delay: Option<u64>,
    /// Seconds to pause between two courses
    #[arg(long, value_name = "SECS", help_heading = "Options")]
    pub course_delay: Option<u64>,
    /// Retries for transient network failures
    #[arg(long, value_name = "N", help_heading = "Options")]
    pub max_retries: Option<u32>,

    // --- General ---
    /// Print this help and exit
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// Print version information and exit
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// Verbosity of the log file
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true, help_heading = "General")]
    pub log_level: LogLevel,
}
