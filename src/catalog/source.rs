use std::fmt;
use std::path::{Path, PathBuf};

/// Where an artwork image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    File(PathBuf),
    Remote(String),
}

impl ImageSource {
    /// Resolves a dataset locator. Relative paths are anchored at `base_dir`.
    pub fn resolve(locator: &str, base_dir: &Path) -> Self {
        let trimmed = locator.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Self::Remote(trimmed.to_string());
        }
        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        let path = Path::new(path);
        if path.is_absolute() {
            Self::File(path.to_path_buf())
        } else {
            Self::File(base_dir.join(path))
        }
    }

    pub fn locator(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locator())
    }
}
