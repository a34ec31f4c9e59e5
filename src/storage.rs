//! Durable per-user storage for the transcript and the theme preference.
//!
//! Storage is a cache of the in-memory state, not the authority: it is read
//! once at startup and written after every change, and every failure here is
//! recoverable. A corrupt or missing value degrades to a default instead of
//! surfacing an error to the caller.

use std::{fs, io, path::PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::types::{Message, ThemeMode};

const HISTORY_KEY: &str = "history";
const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize stored data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-per-key store rooted in the platform data directory. Profiles keep
/// test instances isolated from each other and from the real app data.
#[derive(Clone, Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open() -> Self {
        Self::with_profile("default")
    }

    pub fn with_profile(profile: &str) -> Self {
        let safe_profile = sanitize_component(profile);

        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("cache"));
        Self {
            root: base.join("virta").join(safe_profile),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_component(key)))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Write {
            path: self.root.to_string_lossy().into_owned(),
            source,
        })?;
        let path = self.key_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Write {
            path: path.to_string_lossy().into_owned(),
            source,
        })
    }

    fn remove_key(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| StorageError::Remove {
                path: path.to_string_lossy().into_owned(),
                source,
            })?;
        }
        Ok(())
    }

    /// Returns the persisted transcript, or an empty one when nothing was
    /// stored or the stored value no longer parses.
    pub fn load_history(&self) -> Vec<Message> {
        let Some(raw) = self.read_key(HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => messages,
            Err(err) => {
                warn!("stored chat history is unreadable, starting fresh: {err}");
                Vec::new()
            }
        }
    }

    pub fn save_history(&self, messages: &[Message]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(messages)?;
        self.write_key(HISTORY_KEY, &encoded)
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.remove_key(HISTORY_KEY)
    }

    pub fn load_theme(&self) -> ThemeMode {
        let Some(raw) = self.read_key(THEME_KEY) else {
            return ThemeMode::default();
        };
        match serde_json::from_str(&raw) {
            Ok(theme) => theme,
            Err(err) => {
                warn!("stored theme preference is unreadable, using default: {err}");
                ThemeMode::default()
            }
        }
    }

    pub fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&theme)?;
        self.write_key(THEME_KEY, &encoded)
    }

    /// Removes everything under this profile. Used to tear a profile down
    /// after tests and when the user uninstalls their data.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|source| StorageError::Remove {
                path: self.root.to_string_lossy().into_owned(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Sanitize a profile or key name for filesystem use.
fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn sanitizes_profile_names() {
        assert_eq!(sanitize_component("my-profile"), "my-profile");
        assert_eq!(sanitize_component("my profile!"), "my_profile_");
        assert_eq!(sanitize_component("../escape"), "___escape");
    }

    #[test]
    fn missing_history_loads_empty() {
        let store = Store::with_profile("test-storage-missing");
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn corrupt_history_loads_empty() {
        let store = Store::with_profile("test-storage-corrupt");
        store.write_key(HISTORY_KEY, "{not valid json").expect("write");
        assert!(store.load_history().is_empty());
        store.wipe().expect("wipe");
    }

    #[test]
    fn history_round_trips() {
        let store = Store::with_profile("test-storage-roundtrip");
        let messages = vec![Message::user("hi"), Message::answer("hello", Vec::new())];

        store.save_history(&messages).expect("save");
        assert_eq!(store.load_history(), messages);

        store.wipe().expect("wipe");
    }

    #[test]
    fn clear_history_is_idempotent() {
        let store = Store::with_profile("test-storage-clear");
        store.save_history(&[Message::user("hi")]).expect("save");

        store.clear_history().expect("first clear");
        assert!(store.load_history().is_empty());
        store.clear_history().expect("second clear");

        store.wipe().expect("wipe");
    }

    #[test]
    fn theme_round_trips_and_defaults() {
        let store = Store::with_profile("test-storage-theme");
        assert_eq!(store.load_theme(), ThemeMode::Light);

        store.save_theme(ThemeMode::Dark).expect("save");
        assert_eq!(store.load_theme(), ThemeMode::Dark);

        store.wipe().expect("wipe");
    }
}
