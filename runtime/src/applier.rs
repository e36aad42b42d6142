use crate::assets::PaletteSource;
use crate::catalog::ThemeCatalog;
use crate::error::{ErrorCode, ReportContext, Reporter};
use crate::loader::{self, LoadOutcome, PaletteRegistry, DEFAULT_LOAD_TIMEOUT};
use crate::palette::Palette;
use crate::persistence::Persistence;
use crate::resolver::resolve_requested;
use crate::sync::lock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Render state of the trigger affordance in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSurface {
    pub icon: String,
    pub label: String,
}

impl Default for TriggerSurface {
    fn default() -> Self {
        Self {
            icon: "🎨".to_string(),
            label: "Theme".to_string(),
        }
    }
}

/// Everything the renderer reads that theme switching writes.
///
/// `root_theme` is the canonical active id; the menu check mark and the
/// select row both project from it rather than keeping their own copies.
#[derive(Debug, Clone, Default)]
pub struct Surfaces {
    pub root_theme: Option<String>,
    pub trigger: TriggerSurface,
    busy_ops: u32,
}

impl Surfaces {
    /// True while at least one apply is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy_ops > 0
    }
}

/// Busy marker scoped to one apply.
///
/// Overlapping applies each hold one; the spinner shows while any are
/// alive. Dropping releases on every exit path, superseded requests
/// included.
struct BusyGuard {
    surfaces: Arc<Mutex<Surfaces>>,
}

impl BusyGuard {
    fn acquire(surfaces: &Arc<Mutex<Surfaces>>) -> Self {
        lock(surfaces).busy_ops += 1;
        Self {
            surfaces: Arc::clone(surfaces),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut surfaces = lock(&self.surfaces);
        surfaces.busy_ops = surfaces.busy_ops.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub load_timeout: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

/// What one apply did. Applying never fails; the worst case is a fallback
/// palette with a warning on the reporter channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// The id that ended up active.
    pub id: String,
    /// The rejected input when resolution fell back to the default.
    pub fallback_from: Option<String>,
    pub load: LoadOutcome,
    /// A newer request took over somewhere along the way.
    pub superseded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The boot seed already put the right theme up; nothing was fetched.
    FastPath { id: String },
    Applied(ApplyOutcome),
}

impl InitOutcome {
    pub fn id(&self) -> &str {
        match self {
            InitOutcome::FastPath { id } => id,
            InitOutcome::Applied(outcome) => &outcome.id,
        }
    }
}

/// Owns theme switching end to end: resolution, persistence, palette
/// loading and the shared render surfaces.
///
/// Concurrency model: every apply takes a fresh epoch from a monotone
/// counter and only the latest epoch may mutate shared state. An older
/// apply that loses the race still runs to completion for its own cleanup
/// but skips marker, trigger, registry growth and eviction. Registry
/// completions are keyed by theme id, so a slow fetch can still fill in
/// the entry of the theme that remained active.
pub struct ThemeRuntime {
    catalog: ThemeCatalog,
    persistence: Persistence,
    source: Box<dyn PaletteSource>,
    registry: Arc<Mutex<PaletteRegistry>>,
    surfaces: Arc<Mutex<Surfaces>>,
    next_epoch: AtomicU64,
    latest_epoch: AtomicU64,
    reporter: Reporter,
    load_timeout: Duration,
}

impl ThemeRuntime {
    pub fn new(
        catalog: ThemeCatalog,
        persistence: Persistence,
        source: Box<dyn PaletteSource>,
        reporter: Reporter,
        options: RuntimeOptions,
    ) -> Self {
        // The core palette ships in the binary and is present from the
        // first instant; it is never fetched and never evicted.
        let registry = match Palette::parse(crate::bundled::CORE_PALETTE) {
            Ok(core) => PaletteRegistry::with_core(core),
            Err(e) => {
                log::error!("embedded core palette failed to parse: {e}");
                PaletteRegistry::new()
            }
        };
        Self {
            catalog,
            persistence,
            source,
            registry: Arc::new(Mutex::new(registry)),
            surfaces: Arc::new(Mutex::new(Surfaces::default())),
            next_epoch: AtomicU64::new(0),
            latest_epoch: AtomicU64::new(0),
            reporter,
            load_timeout: options.load_timeout,
        }
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// The channel runtime reports travel on. Callers driving the runtime
    /// (the startup sequencer) put their own failures on it too, so every
    /// report reaches the UI through one stream.
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn registry(&self) -> Arc<Mutex<PaletteRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn surfaces_snapshot(&self) -> Surfaces {
        lock(&self.surfaces).clone()
    }

    /// The canonical active theme id, if one has been applied or seeded.
    pub fn current_theme(&self) -> Option<String> {
        lock(&self.surfaces).root_theme.clone()
    }

    /// The palette the renderer should draw with right now: the active
    /// theme's palette when loaded, the core palette otherwise.
    pub fn active_palette(&self) -> Palette {
        let active = self.current_theme();
        let registry = lock(&self.registry);
        let id = active.as_deref().unwrap_or(loader::CORE_PALETTE_ID);
        registry.active_or_core(id).cloned().unwrap_or_default()
    }

    /// Synchronous boot seed, run before the first draw.
    ///
    /// Resolves the persisted id, stamps the root marker and trigger, and
    /// installs the embedded copy of the palette when the binary carries
    /// one. No fetching, no reporting; startup re-resolves and reports.
    pub fn seed(&self) {
        let persisted = self.persistence.read_theme();
        let resolved = resolve_requested(persisted.as_deref(), &self.catalog);
        let Some(descriptor) = self.catalog.resolve(&resolved.id) else {
            return;
        };
        if let Some(text) = crate::bundled::palette(&descriptor.asset()) {
            match Palette::parse(text) {
                Ok(palette) => lock(&self.registry).insert_loaded(&resolved.id, palette),
                Err(e) => log::warn!(
                    "embedded palette for '{}' failed to parse: {e}",
                    resolved.id
                ),
            }
        }
        let mut surfaces = lock(&self.surfaces);
        surfaces.root_theme = Some(resolved.id.clone());
        surfaces.trigger.icon = descriptor.glyph();
        surfaces.trigger.label = descriptor.label.clone();
        log::debug!("seeded theme '{}' before first draw", resolved.id);
    }

    /// Startup sequence: migrate legacy state, resolve what is persisted,
    /// then either confirm the boot seed or run a full apply.
    pub async fn init(&self) -> InitOutcome {
        self.persistence.migrate_legacy();
        let persisted = self.persistence.read_theme();
        let resolved = resolve_requested(persisted.as_deref(), &self.catalog);
        if let Some(rejected) = &resolved.fallback_from {
            self.reporter.warn(
                ErrorCode::InvalidThemeId,
                ReportContext::new("ThemeRuntime", "init").with_detail(rejected),
                format!(
                    "persisted theme '{rejected}' is unknown, using '{}'",
                    resolved.id
                ),
            );
        }

        let seeded = lock(&self.surfaces).root_theme.as_deref() == Some(resolved.id.as_str())
            && lock(&self.registry).palette(&resolved.id).is_some();
        if seeded {
            if let Some(descriptor) = self.catalog.resolve(&resolved.id) {
                let mut surfaces = lock(&self.surfaces);
                surfaces.trigger.icon = descriptor.glyph();
                surfaces.trigger.label = descriptor.label.clone();
            }
            log::debug!("startup fast path: '{}' already seeded", resolved.id);
            return InitOutcome::FastPath { id: resolved.id };
        }

        let epoch = self.begin_request();
        InitOutcome::Applied(self.apply_inner(&resolved.id, epoch).await)
    }

    /// User picked `id` from the menu or the plain select: persist the
    /// choice, then apply it.
    pub async fn select(&self, id: &str) -> ApplyOutcome {
        let epoch = self.begin_request();
        {
            // Persisted writes are serialized through the surfaces lock and
            // gated on the epoch so an older select cannot overwrite a
            // newer one's value.
            let _surfaces = lock(&self.surfaces);
            if self.is_current(epoch) {
                self.persistence.write_theme(id);
            }
        }
        self.apply_inner(id, epoch).await
    }

    /// Apply a theme without persisting anything.
    pub async fn apply(&self, requested: &str) -> ApplyOutcome {
        let epoch = self.begin_request();
        self.apply_inner(requested, epoch).await
    }

    async fn apply_inner(&self, requested: &str, epoch: u64) -> ApplyOutcome {
        if self.catalog.is_empty() {
            self.reporter.fatal(
                ErrorCode::CatalogEmpty,
                ReportContext::new("ThemeRuntime", "apply").with_detail(requested),
                "no themes available",
            );
            return ApplyOutcome {
                id: requested.to_string(),
                fallback_from: None,
                load: LoadOutcome::Failed,
                superseded: !self.is_current(epoch),
            };
        }

        let resolved = resolve_requested(Some(requested), &self.catalog);
        if let Some(rejected) = &resolved.fallback_from {
            self.reporter.warn(
                ErrorCode::InvalidThemeId,
                ReportContext::new("ThemeRuntime", "apply").with_detail(rejected),
                format!("unknown theme '{rejected}', falling back to '{}'", resolved.id),
            );
        }
        // resolved.id always names a catalog entry once the catalog is
        // non-empty, so this lookup cannot miss.
        let Some(descriptor) = self.catalog.resolve(&resolved.id).cloned() else {
            return ApplyOutcome {
                id: resolved.id,
                fallback_from: resolved.fallback_from,
                load: LoadOutcome::Failed,
                superseded: !self.is_current(epoch),
            };
        };

        let _busy = BusyGuard::acquire(&self.surfaces);

        self.with_surfaces_if_current(epoch, |surfaces| {
            surfaces.root_theme = Some(resolved.id.clone());
        });

        let load = loader::ensure_palette(
            &self.registry,
            self.source.as_ref(),
            &resolved.id,
            &descriptor.asset(),
            self.load_timeout,
            &self.reporter,
            || self.is_current(epoch),
        )
        .await;

        if self.is_current(epoch) {
            let evicted = lock(&self.registry).evict_stale(&resolved.id);
            if !evicted.is_empty() {
                log::debug!("evicted stale palettes {evicted:?}");
            }
        }

        self.with_surfaces_if_current(epoch, |surfaces| {
            surfaces.trigger.icon = descriptor.glyph();
            surfaces.trigger.label = descriptor.label.clone();
        });

        ApplyOutcome {
            id: resolved.id,
            fallback_from: resolved.fallback_from,
            load,
            superseded: !self.is_current(epoch),
        }
    }

    fn begin_request(&self) -> u64 {
        let epoch = self.next_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_epoch.store(epoch, Ordering::SeqCst);
        epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.latest_epoch.load(Ordering::SeqCst) == epoch
    }

    /// Mutate the surfaces only when `epoch` is still the newest request.
    /// The check happens under the lock, so it linearizes against every
    /// other surface writer.
    fn with_surfaces_if_current(&self, epoch: u64, mutate: impl FnOnce(&mut Surfaces)) -> bool {
        let mut surfaces = lock(&self.surfaces);
        if !self.is_current(epoch) {
            return false;
        }
        mutate(&mut surfaces);
        true
    }
}
