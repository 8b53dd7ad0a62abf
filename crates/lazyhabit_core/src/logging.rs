//! Core logging bootstrap and safety policy.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Emit stable, metadata-only diagnostic events from core.
//!
//! # Invariants
//! - Logging init is idempotent for the same level and directory.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.
//! - Habit titles and other user text never appear in log lines.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "lazyhabit";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Backtick- or double-quoted spans; CLI and core errors quote habit titles this way.
static QUOTED_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"`[^`]*`|"[^"]*""#).expect("valid quoted span regex"));
const REDACTED: &str = "<redacted>";

struct LoggingState {
    level: LogLevel,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Supported log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
pub struct UnsupportedLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnsupportedLogLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(UnsupportedLogLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log_dir must be a non-empty absolute path, got `{0}`")]
    InvalidLogDir(PathBuf),
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logging already initialized with level `{active}`; refusing to switch to `{requested}`")]
    LevelConflict {
        active: LogLevel,
        requested: LogLevel,
    },
    #[error("logging already initialized at `{}`; refusing to switch to `{}`", .active.display(), .requested.display())]
    DirConflict { active: PathBuf, requested: PathBuf },
    #[error("failed to start logger: {0}")]
    Backend(#[from] flexi_logger::FlexiLoggerError),
}

/// Initializes rolling file logs under `log_dir`.
///
/// # Errors
/// - `InvalidLogDir` when `log_dir` is empty or relative.
/// - `LevelConflict` / `DirConflict` when already initialized differently.
/// - `CreateDir` / `Backend` when the directory or logger cannot be set up.
pub fn init_logging(level: LogLevel, log_dir: &Path) -> Result<(), LoggingError> {
    let requested_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(&requested_dir).map_err(|source| LoggingError::CreateDir {
            path: requested_dir.clone(),
            source,
        })?;

        let logger = Logger::try_with_str(level.as_str())?
            .log_to_file(
                FileSpec::default()
                    .directory(requested_dir.as_path())
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;

        install_panic_hook_once();

        info!(
            "event=app_start module=core status=ok platform={} build_mode={} version={}",
            std::env::consts::OS,
            build_mode(),
            env!("CARGO_PKG_VERSION")
        );
        info!(
            "event=core_init module=core status=ok level={} log_dir={}",
            level,
            requested_dir.display()
        );

        Ok(LoggingState {
            level,
            log_dir: requested_dir.clone(),
            _logger: logger,
        })
    })?;

    if state.log_dir != requested_dir {
        return Err(LoggingError::DirConflict {
            active: state.log_dir.clone(),
            requested: requested_dir,
        });
    }
    if state.level != level {
        return Err(LoggingError::LevelConflict {
            active: state.level,
            requested: level,
        });
    }

    Ok(())
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> LogLevel {
    if cfg!(debug_assertions) {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() || !log_dir.is_absolute() {
        return Err(LoggingError::InvalidLogDir(log_dir.to_path_buf()));
    }
    Ok(log_dir.to_path_buf())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = redact_habit_text(&panic_payload_text(panic_info), MAX_PANIC_PAYLOAD_CHARS);
        error!("event=panic_captured module=core status=error location={location} payload={payload}");
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_text(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Flattens `value` to one line, replaces quoted habit titles with
/// `<redacted>` and caps the result at `max_chars` characters.
fn redact_habit_text(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    let redacted = QUOTED_SPAN_RE.replace_all(&single_line, REDACTED);
    let mut capped = redacted.chars().take(max_chars).collect::<String>();
    if redacted.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lazyhabit-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn log_level_parses_known_values() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(" warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(UnsupportedLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = init_logging(LogLevel::Info, Path::new("logs/dev")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLogDir(_)));
    }

    #[test]
    fn redact_habit_text_flattens_and_truncates() {
        let flattened = redact_habit_text("line1\nline2\rline3", 8);
        assert_eq!(flattened, "line1 li...");
    }

    #[test]
    fn redact_habit_text_hides_quoted_titles() {
        let redacted = redact_habit_text(
            "no habit titled `Call mom`; tried \"Morning run\" too",
            MAX_PANIC_PAYLOAD_CHARS,
        );
        assert_eq!(redacted, "no habit titled <redacted>; tried <redacted> too");
        assert!(!redacted.contains("Call mom"));
    }

    #[test]
    fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
        let log_dir = unique_temp_dir("idempotent");
        let second_dir = unique_temp_dir("different");

        init_logging(LogLevel::Info, &log_dir).expect("first init should succeed");
        init_logging(LogLevel::Info, &log_dir).expect("same config should be idempotent");

        let level_error = init_logging(LogLevel::Debug, &log_dir).unwrap_err();
        assert!(matches!(level_error, LoggingError::LevelConflict { .. }));

        let dir_error = init_logging(LogLevel::Info, &second_dir).unwrap_err();
        assert!(dir_error.to_string().contains("refusing to switch"));

        let (active_level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(active_level, LogLevel::Info);
        assert_eq!(active_dir, log_dir);
    }
}
