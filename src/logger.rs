use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl LogOutput {
    /// `stdout` selects standard output, anything else standard error
    pub fn from_name(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("stdout") {
            LogOutput::Stdout
        } else {
            LogOutput::Stderr
        }
    }
}

pub struct Logger {
    pub write_to_std: Option<LogOutput>,
    pub severity: Level,
    pub file: Option<Arc<Mutex<File>>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger, appending to `file_path` when one is given
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_std: Option<LogOutput>,
        enable_colors: bool,
    ) -> Self {
        let mut file = None;

        if let Some(path) = file_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
                .map(|f| Arc::new(Mutex::new(f)));
        }

        Logger {
            write_to_std,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    /// Get current UTC timestamp as string
    fn get_timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default()
    }

    /// Get color code for log level
    fn get_color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m", // Red
            Level::Warn => "\x1b[33m",  // Yellow
            Level::Info => "\x1b[36m",  // Cyan
            Level::Debug => "\x1b[35m", // Magenta
            Level::Trace => "\x1b[37m", // White
        }
    }

    /// Get reset color code
    fn get_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Parse a level name, falling back to info
    pub fn parse_level(raw: &str) -> Level {
        raw.trim().parse::<Level>().unwrap_or(Level::Info)
    }

    /// Initialize logger with environment variables
    ///
    /// `FLATWIKI_LOG` (then `RUST_LOG`) picks the level, `FLATWIKI_LOG_TARGET`
    /// picks `stdout` or `stderr`, `FLATWIKI_LOG_FILE` names a file to
    /// append to, and `NO_COLOR` turns colors off.
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("FLATWIKI_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(|raw| Self::parse_level(&raw))
            .unwrap_or(Level::Info);

        let file_path = std::env::var_os("FLATWIKI_LOG_FILE").map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let target = std::env::var("FLATWIKI_LOG_TARGET")
            .map(|raw| LogOutput::from_name(&raw))
            .unwrap_or(LogOutput::Stderr);

        let logger = Logger::new(file_path, Some(severity), Some(target), enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }

    fn format_line(&self, record: &Record, colored: bool) -> String {
        let timestamp = Self::get_timestamp();
        let level_str = record.level().as_str();
        let args = record.args();

        if colored {
            let color = Self::get_color(record.level());
            let reset = Self::get_reset();
            format!("{color}[{timestamp}] {level_str}{reset} {args}\n")
        } else {
            format!("[{timestamp}] {level_str} {args}\n")
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(write_to_std) = &self.write_to_std {
            let line = self.format_line(record, self.enable_colors);
            match write_to_std {
                LogOutput::Stdout => {
                    let _ = std::io::stdout().write_all(line.as_bytes());
                }
                LogOutput::Stderr => {
                    let _ = std::io::stderr().write_all(line.as_bytes());
                }
            }
        }

        // File output never carries colors
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let line = self.format_line(record, false);
                let _ = file_guard.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let _ = file_guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(Logger::parse_level("debug"), Level::Debug);
        assert_eq!(Logger::parse_level(" WARN "), Level::Warn);
        assert_eq!(Logger::parse_level("chatty"), Level::Info);
    }

    #[test]
    fn log_target_names() {
        assert_eq!(LogOutput::from_name("stdout"), LogOutput::Stdout);
        assert_eq!(LogOutput::from_name(" STDOUT"), LogOutput::Stdout);
        assert_eq!(LogOutput::from_name("stderr"), LogOutput::Stderr);
        assert_eq!(LogOutput::from_name("syslog"), LogOutput::Stderr);
    }

    #[test]
    fn file_sink_gets_plain_lines_at_or_above_severity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("wiki.log");
        let logger = Logger::new(Some(path.clone()), Some(Level::Info), None, true);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("saved page"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("INFO saved page"));
        assert!(!written.contains("too chatty"));
        assert!(!written.contains("\x1b["));
    }
}
