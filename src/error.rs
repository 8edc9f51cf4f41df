use std::path::PathBuf;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to load portfolio from {}: {message}", path.display())]
    DatasetLoad { path: PathBuf, message: String },
    #[error("failed to load image {locator}")]
    ImageLoad {
        locator: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("image {locator} did not load within {after_ms}ms")]
    LoadTimeout { locator: String, after_ms: u64 },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn dataset_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DatasetLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn image_load(
        locator: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ImageLoad {
            locator: locator.into(),
            source: Box::new(source),
        }
    }

    pub fn load_timeout(locator: impl Into<String>, after_ms: u64) -> Self {
        Self::LoadTimeout {
            locator: locator.into(),
            after_ms,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Short user-facing text for overlays where the full chain would not fit.
    pub fn brief(&self) -> String {
        match self {
            Self::LoadTimeout { .. } => "image load timed out".to_string(),
            Self::ImageLoad { source, .. } => format!("image failed to load: {source}"),
            other => other.to_string(),
        }
    }
}
