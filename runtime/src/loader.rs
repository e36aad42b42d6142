use crate::assets::{FetchError, PaletteSource};
use crate::error::{ErrorCode, ReportContext, Reporter};
use crate::palette::Palette;
use crate::sync::lock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Reserved id of the always-present base palette. Theme ids in the catalog
/// may not use it.
pub const CORE_PALETTE_ID: &str = "core";

/// How long a palette fetch may take before the attempt is written off.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PaletteEntry {
    pub id: String,
    pub status: LoadStatus,
    pub palette: Option<Palette>,
}

/// How a single [`ensure_palette`] call went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// An entry for this id already existed; nothing was fetched.
    AlreadyPresent,
    /// Fetched and parsed.
    Loaded,
    /// Fetch or parse failed. The entry stays, marked failed.
    Failed,
    /// The fetch did not finish inside the deadline.
    TimedOut,
    /// A newer request took over before this one touched the registry.
    Superseded,
}

/// The set of palettes this process currently holds, one entry per id.
///
/// Steady state is two entries: the core palette and the active theme.
/// Entries for failed loads stay in place so repeated requests for the same
/// id do not hammer a broken source; they disappear with the next eviction.
#[derive(Debug, Default)]
pub struct PaletteRegistry {
    entries: Vec<PaletteEntry>,
}

impl PaletteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the core palette.
    pub fn with_core(core: Palette) -> Self {
        let mut registry = Self::new();
        registry.insert_loaded(CORE_PALETTE_ID, core);
        registry
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn entry(&self, id: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// The loaded palette for `id`, if any.
    pub fn palette(&self, id: &str) -> Option<&Palette> {
        self.entry(id)
            .filter(|entry| entry.status == LoadStatus::Loaded)
            .and_then(|entry| entry.palette.as_ref())
    }

    pub fn core(&self) -> Option<&Palette> {
        self.palette(CORE_PALETTE_ID)
    }

    /// Renderer view: the active palette when it is loaded, core otherwise.
    pub fn active_or_core(&self, active_id: &str) -> Option<&Palette> {
        self.palette(active_id).or_else(|| self.core())
    }

    /// Add a pending entry for `id` unless one already exists.
    pub fn insert_pending(&mut self, id: &str) {
        if !self.contains(id) {
            self.entries.push(PaletteEntry {
                id: id.to_string(),
                status: LoadStatus::Pending,
                palette: None,
            });
        }
    }

    /// Seed a loaded palette directly, bypassing any fetch.
    pub fn insert_loaded(&mut self, id: &str, palette: Palette) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.status = LoadStatus::Loaded;
            entry.palette = Some(palette);
        } else {
            self.entries.push(PaletteEntry {
                id: id.to_string(),
                status: LoadStatus::Loaded,
                palette: Some(palette),
            });
        }
    }

    /// Fill in a finished fetch.
    ///
    /// Keyed strictly by id and never inserts: if eviction removed the
    /// entry while the fetch was in flight, the result is dropped rather
    /// than resurrected.
    pub fn complete(&mut self, id: &str, palette: Palette) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.status = LoadStatus::Loaded;
            entry.palette = Some(palette);
        }
    }

    /// Mark a finished-but-failed fetch. Same no-insert rule as
    /// [`PaletteRegistry::complete`].
    pub fn fail(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.status = LoadStatus::Failed;
            entry.palette = None;
        }
    }

    /// Drop every entry that is neither the core palette nor `active_id`.
    /// Returns the evicted ids.
    pub fn evict_stale(&mut self, active_id: &str) -> Vec<String> {
        let mut evicted = Vec::new();
        self.entries.retain(|entry| {
            if entry.id == CORE_PALETTE_ID || entry.id == active_id {
                true
            } else {
                evicted.push(entry.id.clone());
                false
            }
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Make sure a palette for `id` is present in the registry, fetching it
/// from `source` when it is not.
///
/// The routine that decides whether anything needs fetching at all:
/// an existing entry for `id` short-circuits, whatever its status. The
/// fetch is raced against `deadline`; a loss is recorded on the entry and
/// warned about, never propagated. `is_current` gates the entry insertion
/// so a request that has already been superseded cannot grow the registry;
/// completions are keyed by id and therefore safe without the gate.
pub async fn ensure_palette<F>(
    registry: &Arc<Mutex<PaletteRegistry>>,
    source: &dyn PaletteSource,
    id: &str,
    asset: &str,
    deadline: Duration,
    reporter: &Reporter,
    is_current: F,
) -> LoadOutcome
where
    F: Fn() -> bool,
{
    if lock(registry).contains(id) {
        return LoadOutcome::AlreadyPresent;
    }
    {
        let mut registry = lock(registry);
        if !is_current() {
            return LoadOutcome::Superseded;
        }
        registry.insert_pending(id);
    }

    let context = || ReportContext::new("Loader", "ensure_palette").with_detail(id);
    match tokio::time::timeout(deadline, source.fetch(asset)).await {
        Ok(Ok(text)) => match Palette::parse(&text) {
            Ok(palette) => {
                lock(registry).complete(id, palette);
                log::debug!("palette '{id}' loaded from '{asset}'");
                LoadOutcome::Loaded
            }
            Err(e) => {
                lock(registry).fail(id);
                reporter.warn(
                    ErrorCode::PaletteLoadFailed,
                    context(),
                    format!("palette '{asset}' is not a valid palette file: {e}"),
                );
                LoadOutcome::Failed
            }
        },
        Ok(Err(FetchError::InvalidAsset { asset })) => {
            lock(registry).fail(id);
            reporter.warn(
                ErrorCode::InvalidResourcePath,
                context(),
                format!("refusing to fetch '{asset}'"),
            );
            LoadOutcome::Failed
        }
        Ok(Err(e)) => {
            lock(registry).fail(id);
            reporter.warn(
                ErrorCode::PaletteLoadFailed,
                context(),
                format!("failed to load palette '{asset}': {e}"),
            );
            LoadOutcome::Failed
        }
        Err(_) => {
            lock(registry).fail(id);
            reporter.warn(
                ErrorCode::PaletteLoadTimeout,
                context(),
                format!(
                    "palette '{asset}' did not load within {}ms",
                    deadline.as_millis()
                ),
            );
            LoadOutcome::TimedOut
        }
    }
}
