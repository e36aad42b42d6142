use async_trait::async_trait;
use claims::*;
use runtime::applier::{InitOutcome, RuntimeOptions, ThemeRuntime};
use runtime::assets::{FetchError, PaletteSource};
use runtime::catalog::ThemeCatalog;
use runtime::error::{ErrorCode, Report, Reporter};
use runtime::loader::{LoadOutcome, LoadStatus};
use runtime::persistence::{LEGACY_STATE_KEY, Persistence};
use runtime::store::{MemoryStateStore, StateStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, mpsc};
use std::time::Duration;

mod helpers {
    use super::*;

    /// Serves the palettes embedded in the binary, like a fresh install
    /// with an untouched themes directory.
    pub struct EmbeddedSource;

    #[async_trait]
    impl PaletteSource for EmbeddedSource {
        async fn fetch(&self, asset: &str) -> Result<String, FetchError> {
            runtime::bundled::palette(asset)
                .map(str::to_string)
                .ok_or_else(|| FetchError::NotFound {
                    asset: asset.to_string(),
                })
        }
    }

    /// Embedded palettes with a per-asset delay, for overlap tests.
    pub struct ScriptedSource {
        delays: HashMap<&'static str, Duration>,
    }

    impl ScriptedSource {
        pub fn delaying(asset: &'static str, delay: Duration) -> Self {
            Self {
                delays: HashMap::from([(asset, delay)]),
            }
        }
    }

    #[async_trait]
    impl PaletteSource for ScriptedSource {
        async fn fetch(&self, asset: &str) -> Result<String, FetchError> {
            if let Some(delay) = self.delays.get(asset) {
                tokio::time::sleep(*delay).await;
            }
            EmbeddedSource.fetch(asset).await
        }
    }

    /// Never answers. Exercises the load deadline.
    pub struct StuckSource;

    #[async_trait]
    impl PaletteSource for StuckSource {
        async fn fetch(&self, _asset: &str) -> Result<String, FetchError> {
            std::future::pending().await
        }
    }

    /// Has no palettes at all.
    pub struct NothingSource;

    #[async_trait]
    impl PaletteSource for NothingSource {
        async fn fetch(&self, asset: &str) -> Result<String, FetchError> {
            Err(FetchError::NotFound {
                asset: asset.to_string(),
            })
        }
    }

    /// Store that refuses every operation.
    pub struct DeadStore;

    impl StateStore for DeadStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable {
                reason: "read-only profile".into(),
            })
        }
        fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "read-only profile".into(),
            })
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "read-only profile".into(),
            })
        }
    }

    pub fn runtime_with(
        source: Box<dyn PaletteSource>,
        store: Box<dyn StateStore>,
    ) -> (Arc<ThemeRuntime>, mpsc::Receiver<Report>) {
        let (tx, rx) = mpsc::channel();
        let reporter = Reporter::new(tx);
        let catalog = ThemeCatalog::bundled(&reporter).unwrap();
        let runtime = ThemeRuntime::new(
            catalog,
            Persistence::new(store, reporter.clone()),
            source,
            reporter,
            RuntimeOptions::default(),
        );
        (Arc::new(runtime), rx)
    }

    pub fn registry_ids(runtime: &ThemeRuntime) -> Vec<String> {
        let registry = runtime.registry();
        let registry = registry.lock().unwrap();
        registry
            .entries()
            .iter()
            .map(|entry| entry.id.clone())
            .collect()
    }
}

use helpers::*;

#[tokio::test]
async fn fresh_profile_boots_into_the_default_theme() {
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(MemoryStateStore::new()));

    runtime.seed();
    let outcome = runtime.init().await;

    assert_eq!(
        outcome,
        InitOutcome::FastPath {
            id: "catppuccin-mocha".to_string()
        }
    );
    assert_some_eq!(runtime.current_theme(), "catppuccin-mocha".to_string());
    assert_eq!(runtime.active_palette().name, "Catppuccin Mocha");
    // Startup never writes state; only an explicit pick does.
    assert_none!(runtime.persistence().read_theme());
    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn init_without_a_seed_runs_a_full_apply() {
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(MemoryStateStore::new()));

    let outcome = runtime.init().await;

    assert_matches!(outcome, InitOutcome::Applied(ref applied) if applied.id == "catppuccin-mocha");
    assert_some_eq!(runtime.current_theme(), "catppuccin-mocha".to_string());
    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn sequential_switches_keep_exactly_one_theme_palette() {
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(MemoryStateStore::new()));
    runtime.init().await;

    runtime.select("dracula").await;
    let outcome = runtime.select("nord").await;

    assert_eq!(outcome.load, LoadOutcome::Loaded);
    assert!(!outcome.superseded);

    let mut ids = registry_ids(&runtime);
    ids.sort();
    assert_eq!(ids, vec!["core".to_string(), "nord".to_string()]);

    assert_some_eq!(runtime.current_theme(), "nord".to_string());
    assert_some_eq!(runtime.persistence().read_theme(), "nord".to_string());
    assert_eq!(runtime.active_palette().name, "Nord");
    assert_none!(rx.try_recv().ok());
}

#[tokio::test(start_paused = true)]
async fn the_newer_of_two_overlapping_switches_wins() {
    let source = ScriptedSource::delaying("dracula.toml", Duration::from_millis(500));
    let (runtime, rx) = runtime_with(Box::new(source), Box::new(MemoryStateStore::new()));
    runtime.init().await;

    let slow = Arc::clone(&runtime);
    let first = tokio::spawn(async move { slow.select("dracula").await });
    // Let the first select claim its epoch and park on the fetch.
    tokio::task::yield_now().await;

    let second = runtime.select("nord").await;
    let first = first.await.unwrap();

    assert!(!second.superseded);
    assert!(first.superseded);

    assert_some_eq!(runtime.current_theme(), "nord".to_string());
    assert_some_eq!(runtime.persistence().read_theme(), "nord".to_string());
    assert_eq!(runtime.active_palette().name, "Nord");
    assert!(!runtime.surfaces_snapshot().is_busy());

    let mut ids = registry_ids(&runtime);
    ids.sort();
    assert_eq!(ids, vec!["core".to_string(), "nord".to_string()]);
    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn garbage_persisted_state_falls_back_with_one_warning() {
    let store = MemoryStateStore::with_entries([("theme", "not-a-real-theme")]);
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(store));

    runtime.seed();
    let outcome = runtime.init().await;

    assert_eq!(outcome.id(), "catppuccin-mocha");
    assert_some_eq!(runtime.current_theme(), "catppuccin-mocha".to_string());

    let report = rx.try_recv().unwrap();
    assert_matches!(report.code, ErrorCode::InvalidThemeId);
    assert_none!(rx.try_recv().ok());

    // No palette entry was ever created for the garbage id.
    assert!(!registry_ids(&runtime).contains(&"not-a-real-theme".to_string()));
}

#[tokio::test]
async fn legacy_flavor_state_migrates_before_resolution() {
    let store = MemoryStateStore::with_entries([(LEGACY_STATE_KEY, "dracula")]);
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(store));

    let outcome = runtime.init().await;

    assert_eq!(outcome.id(), "dracula");
    assert_some_eq!(runtime.persistence().read_theme(), "dracula".to_string());
    assert_none!(runtime.persistence().read(LEGACY_STATE_KEY));
    assert_none!(rx.try_recv().ok());
}

#[tokio::test(start_paused = true)]
async fn a_load_timeout_keeps_the_choice_and_warns_once() {
    let (runtime, rx) = runtime_with(Box::new(StuckSource), Box::new(MemoryStateStore::new()));
    runtime.seed();
    runtime.init().await;

    let outcome = runtime.select("dracula").await;

    assert_eq!(outcome.load, LoadOutcome::TimedOut);
    assert!(!outcome.superseded);

    // The choice stands even though the palette never arrived.
    assert_some_eq!(runtime.current_theme(), "dracula".to_string());
    assert_some_eq!(runtime.persistence().read_theme(), "dracula".to_string());
    assert_eq!(runtime.surfaces_snapshot().trigger.label, "Dracula");
    assert!(!runtime.surfaces_snapshot().is_busy());
    assert_eq!(runtime.active_palette().name, "Core");

    let report = rx.try_recv().unwrap();
    assert_matches!(report.code, ErrorCode::PaletteLoadTimeout);
    assert!(report.message.contains("10000ms"));
    assert_none!(rx.try_recv().ok());

    let registry = runtime.registry();
    let registry = registry.lock().unwrap();
    assert_eq!(
        registry.entry("dracula").unwrap().status,
        LoadStatus::Failed
    );
}

#[tokio::test]
async fn a_missing_palette_leaves_the_marker_and_falls_back_to_core() {
    let (runtime, rx) = runtime_with(Box::new(NothingSource), Box::new(MemoryStateStore::new()));
    runtime.seed();
    runtime.init().await;

    let outcome = runtime.select("dracula").await;

    assert_eq!(outcome.load, LoadOutcome::Failed);
    assert_some_eq!(runtime.current_theme(), "dracula".to_string());
    assert_eq!(runtime.active_palette().name, "Core");
    assert_matches!(rx.try_recv().unwrap().code, ErrorCode::PaletteLoadFailed);
    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn a_broken_store_does_not_block_theme_switching() {
    let (runtime, rx) = runtime_with(Box::new(EmbeddedSource), Box::new(DeadStore));

    let outcome = runtime.select("dracula").await;

    assert_eq!(outcome.load, LoadOutcome::Loaded);
    assert_some_eq!(runtime.current_theme(), "dracula".to_string());
    assert_eq!(runtime.active_palette().name, "Dracula");

    // Exactly one warning for the failed write, nothing else.
    let report = rx.try_recv().unwrap();
    assert_matches!(report.code, ErrorCode::StorageUnavailable);
    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn switching_back_after_a_failed_load_retries_the_fetch() {
    let (runtime, _rx) = runtime_with(Box::new(NothingSource), Box::new(MemoryStateStore::new()));
    runtime.seed();
    runtime.init().await;

    runtime.select("dracula").await;
    // Selecting something else evicts the failed entry...
    runtime.select("nord").await;
    // ...so coming back is a fresh attempt, not a cached failure.
    let outcome = runtime.select("dracula").await;

    assert_eq!(outcome.load, LoadOutcome::Failed);
    let mut ids = registry_ids(&runtime);
    ids.sort();
    assert_eq!(ids, vec!["core".to_string(), "dracula".to_string()]);
}
