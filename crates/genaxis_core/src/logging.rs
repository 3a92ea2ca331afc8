//! Process-wide log setup shared by the CLI and the REST server.
//!
//! Lines follow the `event=.. module=.. status=..` shape so they stay greppable
//! whether they land on stderr or in the rotated files.
//!
//! # Invariants
//! - Only the first successful [`init_logging`] installs a logger; repeating
//!   the same call is a no-op, a different level or target is an error.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "genaxis";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unknown log level `{0}`; use trace, debug, info, warn or error")]
    UnknownLevel(String),
    #[error("log directory cannot be empty")]
    EmptyDir,
    #[error("cannot resolve relative log directory `{}`", .path.display())]
    ResolveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create log directory `{}`", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Logger(#[from] flexi_logger::FlexiLoggerError),
    #[error("logging already runs at {active}; cannot switch to {requested}")]
    AlreadyActive {
        active: LogTarget,
        requested: LogTarget,
    },
}

/// Where and how verbosely log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub level: &'static str,
    /// `None` is stderr.
    pub dir: Option<PathBuf>,
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dir {
            Some(dir) => write!(f, "level={} dir={}", self.level, dir.display()),
            None => write!(f, "level={} dir=stderr", self.level),
        }
    }
}

struct ActiveLogger {
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Installs the process logger.
///
/// `log_dir = None` logs to stderr, otherwise into size-rotated
/// `genaxis*.log` files inside the directory. Relative directories are
/// resolved against the current working directory.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), LoggingError> {
    let requested = LogTarget {
        level: parse_level(level)?,
        dir: log_dir.map(checked_dir).transpose()?,
    };

    let active = ACTIVE.get_or_try_init(|| start_logger(&requested))?;
    if active.target != requested {
        return Err(LoggingError::AlreadyActive {
            active: active.target.clone(),
            requested,
        });
    }
    Ok(())
}

/// Target of the installed logger, if any.
pub fn logging_status() -> Option<LogTarget> {
    ACTIVE.get().map(|active| active.target.clone())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(target: &LogTarget) -> Result<ActiveLogger, LoggingError> {
    let logger = Logger::try_with_str(target.level)?;
    let logger = match &target.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };
    let handle = logger.start()?;

    log_panics();
    info!(
        "event=logging_init module=core status=ok version={} os={} {target}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );
    Ok(ActiveLogger {
        target: target.clone(),
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    let wanted = level.trim().to_ascii_lowercase();
    let wanted = if wanted == "warning" { "warn".to_string() } else { wanted };
    LEVELS
        .into_iter()
        .find(|known| *known == wanted)
        .ok_or_else(|| LoggingError::UnknownLevel(level.to_string()))
}

fn checked_dir(dir: &Path) -> Result<PathBuf, LoggingError> {
    if dir.as_os_str().is_empty() {
        return Err(LoggingError::EmptyDir);
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|source| LoggingError::ResolveDir {
            path: dir.to_path_buf(),
            source,
        })
}

// Called once from `start_logger`, which the OnceCell guards.
fn log_panics() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic module=core status=error location={location} message={}",
            one_line(&payload, PANIC_MESSAGE_LIMIT)
        );
        previous(panic);
    }));
}

fn one_line(text: &str, limit: usize) -> String {
    let flat: String = text
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .collect();
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_case_insensitive_and_accept_warning() {
        assert_eq!(parse_level(" INFO ").unwrap(), "info");
        assert_eq!(parse_level("Warning").unwrap(), "warn");
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnknownLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn relative_log_dir_resolves_against_cwd() {
        let resolved = checked_dir(Path::new("logs")).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, std::env::current_dir().unwrap().join("logs"));
        assert!(matches!(
            checked_dir(Path::new("")),
            Err(LoggingError::EmptyDir)
        ));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb", 10), "a b");
        assert_eq!(one_line("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn second_init_must_match_first() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();

        init_logging("info", Some(dir.path())).unwrap();
        init_logging("INFO", Some(dir.path())).unwrap();

        assert!(matches!(
            init_logging("debug", Some(dir.path())),
            Err(LoggingError::AlreadyActive { .. })
        ));
        assert!(matches!(
            init_logging("info", Some(other.path())),
            Err(LoggingError::AlreadyActive { .. })
        ));
        assert!(matches!(
            init_logging("info", None),
            Err(LoggingError::AlreadyActive { .. })
        ));

        let active = logging_status().unwrap();
        assert_eq!(active.level, "info");
        assert_eq!(active.dir.as_deref(), Some(dir.path()));
    }
}
