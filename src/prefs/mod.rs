use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const LIGHTBOX_HINT_EXPIRY_MS: u64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PersistedFlags {
    has_seen_tip: bool,
    lightbox_hint_timestamp: Option<u64>,
}

/// Onboarding flags. Persisted ones live in a small JSON file; reads and
/// writes are best effort and never fail the caller.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    flags: PersistedFlags,
    gallery_toast_seen: bool,
}

impl PreferenceStore {
    /// Loads flags from `path`. A missing or unreadable file means a first-time user.
    pub fn load(path: Option<PathBuf>) -> Self {
        let flags = path.as_deref().map(read_flags).unwrap_or_default();
        Self {
            path,
            flags,
            gallery_toast_seen: false,
        }
    }

    pub fn in_memory() -> Self {
        Self::load(None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_seen_tip(&self) -> bool {
        self.flags.has_seen_tip
    }

    /// Returns true the first time it is called for this user.
    pub fn mark_tip_seen(&mut self) -> bool {
        if self.flags.has_seen_tip {
            return false;
        }
        self.flags.has_seen_tip = true;
        self.persist();
        true
    }

    pub fn should_show_lightbox_hint(&self, now_ms: u64) -> bool {
        match self.flags.lightbox_hint_timestamp {
            None => true,
            Some(shown_at) => now_ms.saturating_sub(shown_at) > LIGHTBOX_HINT_EXPIRY_MS,
        }
    }

    /// Shows the hint when due and records the time it was shown.
    pub fn take_lightbox_hint(&mut self, now_ms: u64) -> bool {
        if !self.should_show_lightbox_hint(now_ms) {
            return false;
        }
        self.flags.lightbox_hint_timestamp = Some(now_ms);
        self.persist();
        true
    }

    /// Session-scoped: true once per process.
    pub fn take_gallery_toast(&mut self) -> bool {
        if self.gallery_toast_seen {
            return false;
        }
        self.gallery_toast_seen = true;
        true
    }

    fn persist(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        if let Err(err) = write_flags(path, &self.flags) {
            warn!(path = %path.display(), error = %err, "failed to write preferences");
        }
    }
}

pub fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn read_flags(path: &Path) -> PersistedFlags {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no preference file; first run");
            return PersistedFlags::default();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read preferences");
            return PersistedFlags::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "ignoring corrupt preferences");
        PersistedFlags::default()
    })
}

fn write_flags(path: &Path, flags: &PersistedFlags) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(flags).map_err(std::io::Error::other)?;
    fs::write(path, raw)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{LIGHTBOX_HINT_EXPIRY_MS, PreferenceStore};

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("folio_prefs_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn tip_flag_persists_across_loads() {
        let path = unique_temp_path("tip.json");
        let mut store = PreferenceStore::load(Some(path.clone()));
        assert!(!store.has_seen_tip());
        assert!(store.mark_tip_seen());
        assert!(!store.mark_tip_seen());

        let reloaded = PreferenceStore::load(Some(path.clone()));
        assert!(reloaded.has_seen_tip());
        let raw = fs::read_to_string(&path).expect("state file should exist");
        assert!(raw.contains("hasSeenTip"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn lightbox_hint_expires_after_thirty_days() {
        let mut store = PreferenceStore::in_memory();
        let now = 1_700_000_000_000;
        assert!(store.take_lightbox_hint(now));
        assert!(!store.take_lightbox_hint(now + 1));
        assert!(!store.should_show_lightbox_hint(now + LIGHTBOX_HINT_EXPIRY_MS));
        assert!(store.should_show_lightbox_hint(now + LIGHTBOX_HINT_EXPIRY_MS + 1));
        assert!(store.take_lightbox_hint(now + LIGHTBOX_HINT_EXPIRY_MS + 1));
    }

    #[test]
    fn corrupt_file_is_treated_as_first_run() {
        let path = unique_temp_path("corrupt.json");
        fs::write(&path, "{not json").expect("state file should be written");
        let store = PreferenceStore::load(Some(path.clone()));
        assert!(!store.has_seen_tip());
        assert!(store.should_show_lightbox_hint(0));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn gallery_toast_is_session_scoped() {
        let path = unique_temp_path("toast.json");
        let mut store = PreferenceStore::load(Some(path.clone()));
        assert!(store.take_gallery_toast());
        assert!(!store.take_gallery_toast());

        let mut next_session = PreferenceStore::load(Some(path));
        assert!(next_session.take_gallery_toast());
    }
}
