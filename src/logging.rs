use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::default_state_dir;
use crate::error::{AppError, AppResult};

const DEFAULT_FILTER: &str = "info,folio=debug";
const LOG_FILE_NAME: &str = "folio.log";

/// Where log lines go. The terminal belongs to the TUI, so never stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// A single file, appended to.
    File(PathBuf),
    /// `folio.log.<date>` files rolled daily inside a directory.
    DailyIn(PathBuf),
}

impl LogTarget {
    pub fn resolve(explicit: Option<&Path>) -> Option<Self> {
        match explicit {
            Some(path) => Some(Self::File(path.to_path_buf())),
            None => default_state_dir().map(Self::DailyIn),
        }
    }
}

/// Installs the global subscriber. Keep the guard alive for the whole run so
/// buffered lines are flushed on exit.
pub fn init_logging(target: Option<LogTarget>) -> AppResult<Option<WorkerGuard>> {
    let Some(target) = target else {
        return Ok(None);
    };

    let appender = match &target {
        LogTarget::File(path) => {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                AppError::invalid_argument(format!("log path has no file name: {}", path.display()))
            })?;
            create_log_dir(dir)?;
            tracing_appender::rolling::never(dir, file_name)
        }
        LogTarget::DailyIn(dir) => {
            create_log_dir(dir)?;
            tracing_appender::rolling::daily(dir, LOG_FILE_NAME)
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|err| AppError::unsupported(format!("logging already initialized: {err}")))?;

    Ok(Some(guard))
}

fn create_log_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir).map_err(|source| {
        AppError::io_with_context(
            source,
            format!("failed to create log directory: {}", dir.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::LogTarget;

    #[test]
    fn explicit_log_file_wins_over_state_dir() {
        let target = LogTarget::resolve(Some(Path::new("/tmp/folio-test.log")));
        assert_eq!(
            target,
            Some(LogTarget::File(PathBuf::from("/tmp/folio-test.log")))
        );
    }
}
