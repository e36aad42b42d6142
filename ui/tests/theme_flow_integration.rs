use claims::*;
use runtime::applier::{InitOutcome, RuntimeOptions, ThemeRuntime};
use runtime::assets::DirSource;
use runtime::catalog::ThemeCatalog;
use runtime::error::{Report, Reporter};
use runtime::loader::LoadOutcome;
use runtime::persistence::Persistence;
use runtime::store::MemoryStateStore;
use std::sync::{Arc, mpsc};
use tempfile::TempDir;
use themetty::components::theme_menu::{MenuMachine, MenuPhase};

// Helper modules for integration tests
mod helpers {
    use super::*;

    /// Runtime reading palettes from a throwaway directory. An empty one
    /// lands every fetch on the embedded snapshot, like a fresh install.
    pub fn fresh_runtime() -> (Arc<ThemeRuntime>, mpsc::Receiver<Report>, TempDir) {
        let themes_dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let reporter = Reporter::new(tx);
        let catalog = ThemeCatalog::bundled(&reporter).unwrap();
        let runtime = ThemeRuntime::new(
            catalog,
            Persistence::new(Box::new(MemoryStateStore::new()), reporter.clone()),
            Box::new(DirSource::new(themes_dir.path())),
            reporter,
            RuntimeOptions::default(),
        );
        (Arc::new(runtime), rx, themes_dir)
    }

    /// The menu exactly as the model mounts it: built from the catalog,
    /// checkmark on the active theme.
    pub fn open_menu(runtime: &ThemeRuntime, focus_first: bool) -> MenuMachine {
        let mut machine =
            MenuMachine::from_catalog(runtime.catalog(), runtime.current_theme().as_deref());
        machine.open(focus_first);
        machine
    }
}

use helpers::*;

#[tokio::test]
async fn keyboard_selection_lands_in_the_runtime_and_persists() {
    let (runtime, rx, _themes) = fresh_runtime();
    runtime.seed();
    assert_matches!(runtime.init().await, InitOutcome::FastPath { .. });

    let mut machine = open_menu(&runtime, true);
    machine.focus_next();
    machine.focus_next();
    let chosen = assert_some!(machine.select_focused());
    assert_matches!(machine.phase(), MenuPhase::Closed);

    let outcome = runtime.select(&chosen).await;

    assert!(!outcome.superseded);
    assert_eq!(outcome.id, chosen);
    assert_none!(outcome.fallback_from);
    assert_matches!(
        outcome.load,
        LoadOutcome::Loaded | LoadOutcome::AlreadyPresent
    );

    // One canonical fact, three projections of it.
    assert_some_eq!(runtime.persistence().read_theme(), chosen.clone());
    let surfaces = runtime.surfaces_snapshot();
    assert_some_eq!(surfaces.root_theme, chosen.clone());
    let descriptor = runtime.catalog().resolve(&chosen).unwrap();
    assert_eq!(surfaces.trigger.label, descriptor.label);

    assert_none!(rx.try_recv().ok());
}

#[tokio::test]
async fn pointer_selection_works_without_keyboard_focus() {
    let (runtime, _rx, _themes) = fresh_runtime();
    runtime.seed();
    runtime.init().await;

    // A pointer open assigns no focus; the row index alone commits.
    let mut machine = open_menu(&runtime, false);
    assert_none!(machine.focused());
    let target = machine.items()[4].id.clone();
    assert_ne!(runtime.current_theme().as_deref(), Some(target.as_str()));

    let chosen = assert_some_eq!(machine.select_at(4), target);
    assert!(!machine.is_open());

    let outcome = runtime.select(&chosen).await;
    assert_eq!(outcome.id, target);
    assert_some_eq!(runtime.current_theme(), target);
}

#[tokio::test]
async fn reopened_menu_reflects_the_applied_theme() {
    let (runtime, _rx, _themes) = fresh_runtime();
    runtime.seed();
    runtime.init().await;

    let mut machine = open_menu(&runtime, true);
    machine.focus_end();
    let chosen = assert_some!(machine.select_focused());
    let outcome = runtime.select(&chosen).await;

    // The model rebuilds the menu from the catalog on every open; the
    // checkmark and the select row must both land on the applied id.
    let reopened = open_menu(&runtime, false);
    let checked: Vec<_> = reopened
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| item.checked)
        .collect();
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0].1.id, chosen);

    // Menu rows come out in catalog order, so the row index doubles as the
    // select component's value position.
    let position = assert_some!(runtime.catalog().position(&outcome.id));
    assert_eq!(checked[0].0, position);
}

#[tokio::test]
async fn themes_directory_overrides_the_embedded_palette() {
    let (runtime, _rx, themes) = fresh_runtime();
    runtime.seed();
    runtime.init().await;

    let custom = r##"name = "Dracula (Office Edition)"

[colors]
background = "#202020"
surface = "#2a2a2a"
overlay = "#343434"
text = "#e0e0e0"
subtext = "#c0c0c0"
muted = "#808080"
border = "#404040"
accent = "#bd93f9"
accent_alt = "#8be9fd"
highlight = "#ff79c6"
success = "#50fa7b"
warning = "#f1fa8c"
error = "#ff5555"
info = "#8be9fd"
"##;
    std::fs::write(themes.path().join("dracula.toml"), custom).unwrap();

    let outcome = runtime.select("dracula").await;

    assert_eq!(outcome.id, "dracula");
    assert_matches!(outcome.load, LoadOutcome::Loaded);
    assert_eq!(runtime.active_palette().name, "Dracula (Office Edition)");
}
