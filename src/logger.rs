use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static TRYON_LOGGER: Lazy<TryOnLogger> = Lazy::new(TryOnLogger::default);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.into();
    TRYON_LOGGER.configure(config)?;
    log::set_logger(&*TRYON_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Label, badge and console color.
    fn style(self) -> (&'static str, &'static str, Color) {
        match self {
            LogLevel::Trace => ("TRACE", "🔍", Color::Cyan),
            LogLevel::Debug => ("DEBUG", "🐛", Color::Blue),
            LogLevel::Info => ("INFO", "💡", Color::Green),
            LogLevel::Warn => ("WARN", "⚠️", Color::Yellow),
            LogLevel::Error => ("ERROR", "❌", Color::Red),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.style().0
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// One emitted record, as written to the JSON sinks.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location: record
                .file()
                .map(|file| format!("{}:{}", file, record.line().unwrap_or(0))),
        }
    }

    fn render_plain(&self, config: &LoggerConfig) -> String {
        self.render(config, false)
    }

    fn render(&self, config: &LoggerConfig, colors: bool) -> String {
        if config.json {
            return serde_json::to_string(self).unwrap_or_default();
        }

        let paint = |text: String, color: Color, bold: bool| -> String {
            match (colors, bold) {
                (false, _) => text,
                (true, false) => text.as_str().color(color).to_string(),
                (true, true) => text.as_str().color(color).bold().to_string(),
            }
        };

        let (label, badge, color) = self.level.style();
        let mut line = format!(
            "{} [{}] ",
            paint(self.timestamp.format(TIMESTAMP_FORMAT).to_string(), Color::BrightBlack, false),
            paint(format!("{} {}", badge, label), color, true),
        );
        if !self.target.is_empty() {
            line += &paint(self.target.clone(), Color::BrightBlue, false);
            line += ": ";
        }
        line += &self.message;
        if let Some(location) = self.location.as_ref().filter(|_| config.show_location) {
            line += &format!(" ({})", paint(location.clone(), Color::BrightBlack, false));
        }
        line
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub colors: bool,
    pub json: bool,
    pub show_location: bool,
    /// Plain-text copy of every line is appended here when set.
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            colors: true,
            json: false,
            show_location: false,
            file: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self.colors &= !enabled;
        self
    }

    pub fn with_file_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_location: true,
            ..Default::default()
        }
    }

    /// Development preset overridden by whatever the environment asked for.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let mut logger = Self::development().with_json_output(config.log_json);
        if let Some(level) = config.log_level {
            logger = logger.with_level(level);
        }
        if let Some(path) = &config.log_file {
            logger = logger.with_file_output(path);
        }
        logger
    }
}

#[derive(Default)]
pub struct TryOnLogger {
    config: Mutex<LoggerConfig>,
    file: Mutex<Option<File>>,
}

impl TryOnLogger {
    fn configure(&self, config: LoggerConfig) -> Result<(), String> {
        let file = match &config.file {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?,
            ),
            None => None,
        };
        if let Ok(mut slot) = self.file.lock() {
            *slot = file;
        }
        if let Ok(mut current) = self.config.lock() {
            *current = config;
        }
        Ok(())
    }
}

impl log::Log for TryOnLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map_or(true, |config| metadata.level() <= LevelFilter::from(config.min_level))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(config) = self.config.lock() else {
            return;
        };
        let entry = LogEntry::from_record(record);
        println!("{}", entry.render(&config, config.colors));

        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = writeln!(file, "{}", entry.render_plain(&config));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a generation round trip took when dropped.
pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!("⏱️  {} finished in {}ms", self.name, self.start.elapsed().as_millis());
    }
}

pub fn timer(name: &'static str) -> Timer {
    log::debug!("⏱️  {} started", name);
    Timer {
        start: Instant::now(),
        name,
    }
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
}

pub fn log_config_info(config: &crate::config::Config) {
    let gemini = &config.gemini;
    log::info!(
        "⚙️  Model {} at {} (timeout {}s, API key {})",
        gemini.model,
        gemini.base_url,
        gemini.timeout_secs,
        if gemini.has_credentials() { "set" } else { "missing" }
    );
}
