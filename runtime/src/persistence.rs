use crate::error::{ErrorCode, ReportContext, Reporter};
use crate::store::StateStore;

/// Storage key holding the active theme id.
pub const STATE_KEY_THEME: &str = "theme";

/// Pre-1.0 releases persisted only a flavor name under this key.
/// [`Persistence::migrate_legacy`] moves it to [`STATE_KEY_THEME`] once.
pub const LEGACY_STATE_KEY: &str = "active_flavor";

/// Never-fails facade over a [`StateStore`].
///
/// Storage trouble must not take the theme switcher down, so every failure
/// is downgraded to one `STORAGE_UNAVAILABLE` warning and the operation
/// becomes a no-op. Callers branch on `Option`/`bool`, not on errors.
pub struct Persistence {
    store: Box<dyn StateStore>,
    reporter: Reporter,
}

impl Persistence {
    pub fn new(store: Box<dyn StateStore>, reporter: Reporter) -> Self {
        Self { store, reporter }
    }

    /// Read a key. Absent and unreadable both come back as `None`;
    /// only the latter warns.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.store.load(key) {
            Ok(value) => value,
            Err(e) => {
                self.warn_unavailable("read", key, &e);
                None
            }
        }
    }

    /// Write a key. Returns whether the value actually landed.
    pub fn write(&self, key: &str, value: &str) -> bool {
        match self.store.save(key, value) {
            Ok(()) => true,
            Err(e) => {
                self.warn_unavailable("write", key, &e);
                false
            }
        }
    }

    /// Remove a key. Returns whether the removal actually happened.
    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                self.warn_unavailable("remove", key, &e);
                false
            }
        }
    }

    pub fn read_theme(&self) -> Option<String> {
        self.read(STATE_KEY_THEME)
    }

    pub fn write_theme(&self, id: &str) -> bool {
        self.write(STATE_KEY_THEME, id)
    }

    /// One-shot migration of the legacy flavor key.
    ///
    /// Copies the legacy value to the current key and deletes the legacy
    /// key, but only when the current key is empty. The value moves
    /// verbatim; startup resolution decides whether it still names a theme.
    /// Running this again after a completed migration is a no-op.
    pub fn migrate_legacy(&self) {
        let Some(value) = self.read(LEGACY_STATE_KEY) else {
            return;
        };
        if self.read(STATE_KEY_THEME).is_some() {
            return;
        }
        // Keep the legacy key if the copy failed so a later run can retry.
        if self.write(STATE_KEY_THEME, &value) {
            self.remove(LEGACY_STATE_KEY);
            log::info!("migrated legacy theme state '{value}'");
        }
    }

    fn warn_unavailable(&self, operation: &str, key: &str, error: &dyn std::fmt::Display) {
        self.reporter.warn(
            ErrorCode::StorageUnavailable,
            ReportContext::new("Persistence", operation).with_detail(key),
            format!("state {operation} for '{key}' skipped: {error}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, Level, Report};
    use crate::store::{MemoryStateStore, StoreError};
    use claims::{assert_matches, assert_none, assert_some_eq};
    use std::sync::mpsc;

    /// Store that fails every operation, standing in for a read-only disk.
    struct DeadStore;

    impl StateStore for DeadStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable {
                reason: "disk on fire".into(),
            })
        }
        fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "disk on fire".into(),
            })
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "disk on fire".into(),
            })
        }
    }

    fn channel_persistence(store: Box<dyn StateStore>) -> (Persistence, mpsc::Receiver<Report>) {
        let (tx, rx) = mpsc::channel();
        (Persistence::new(store, Reporter::new(tx)), rx)
    }

    #[test]
    fn read_write_remove_roundtrip() {
        let (persistence, rx) = channel_persistence(Box::new(MemoryStateStore::new()));

        assert_none!(persistence.read_theme());
        assert!(persistence.write_theme("dracula"));
        assert_some_eq!(persistence.read_theme(), "dracula".to_string());
        assert!(persistence.remove(STATE_KEY_THEME));
        assert_none!(persistence.read_theme());
        assert_none!(rx.try_recv().ok());
    }

    #[test]
    fn failed_write_warns_exactly_once_and_reports_false() {
        let (persistence, rx) = channel_persistence(Box::new(DeadStore));

        assert!(!persistence.write_theme("dracula"));

        let report = rx.try_recv().unwrap();
        assert_matches!(report.code, ErrorCode::StorageUnavailable);
        assert_matches!(report.level, Level::Warning);
        assert_none!(rx.try_recv().ok());
    }

    #[test]
    fn failed_read_is_none_with_one_warning() {
        let (persistence, rx) = channel_persistence(Box::new(DeadStore));

        assert_none!(persistence.read_theme());

        let report = rx.try_recv().unwrap();
        assert_matches!(report.code, ErrorCode::StorageUnavailable);
        assert_none!(rx.try_recv().ok());
    }

    #[test]
    fn migration_moves_the_legacy_value() {
        let store = MemoryStateStore::with_entries([(LEGACY_STATE_KEY, "mocha")]);
        let (persistence, _rx) = channel_persistence(Box::new(store));

        persistence.migrate_legacy();

        assert_some_eq!(persistence.read_theme(), "mocha".to_string());
        assert_none!(persistence.read(LEGACY_STATE_KEY));
    }

    #[test]
    fn migration_copies_garbage_verbatim() {
        // Resolution happens later; migration itself must not judge values.
        let store = MemoryStateStore::with_entries([(LEGACY_STATE_KEY, "not-a-real-theme")]);
        let (persistence, _rx) = channel_persistence(Box::new(store));

        persistence.migrate_legacy();

        assert_some_eq!(persistence.read_theme(), "not-a-real-theme".to_string());
    }

    #[test]
    fn migration_never_overwrites_the_current_key() {
        let store = MemoryStateStore::with_entries([
            (LEGACY_STATE_KEY, "mocha"),
            (STATE_KEY_THEME, "dracula"),
        ]);
        let (persistence, _rx) = channel_persistence(Box::new(store));

        persistence.migrate_legacy();

        assert_some_eq!(persistence.read_theme(), "dracula".to_string());
        // Untouched, as is the legacy key.
        assert_some_eq!(persistence.read(LEGACY_STATE_KEY), "mocha".to_string());
    }

    #[test]
    fn migration_twice_is_idempotent() {
        let store = MemoryStateStore::with_entries([(LEGACY_STATE_KEY, "mocha")]);
        let (persistence, _rx) = channel_persistence(Box::new(store));

        persistence.migrate_legacy();
        persistence.migrate_legacy();

        assert_some_eq!(persistence.read_theme(), "mocha".to_string());
        assert_none!(persistence.read(LEGACY_STATE_KEY));
    }

    #[test]
    fn migration_on_a_dead_store_stays_quietly_unmigrated() {
        let (persistence, rx) = channel_persistence(Box::new(DeadStore));

        persistence.migrate_legacy();

        // One warning from the legacy read, then the migration gave up.
        let report = rx.try_recv().unwrap();
        assert_matches!(report.code, ErrorCode::StorageUnavailable);
        assert_none!(rx.try_recv().ok());
    }
}
