use std::fmt::Display;
use std::sync::mpsc::Sender;

/// Stable identifiers for everything the theme runtime can report.
///
/// Codes are the contract between the runtime and its observers: tests and
/// the UI match on the code, never on message text. Each code maps to one
/// failure described in the runtime's error taxonomy.
///
/// # Examples
///
/// ```no_run
/// use runtime::error::{ErrorCode, Report};
///
/// fn is_load_problem(report: &Report) -> bool {
///     matches!(
///         report.code,
///         ErrorCode::PaletteLoadFailed | ErrorCode::PaletteLoadTimeout
///     )
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A requested theme id is not in the catalog; the default was used.
    InvalidThemeId,
    /// The catalog has no entries. Nothing can be applied.
    CatalogEmpty,
    /// A theme id or icon cannot be turned into a usable resource name.
    InvalidResourcePath,
    /// A palette asset could not be fetched or parsed.
    PaletteLoadFailed,
    /// A palette fetch did not finish within the load deadline.
    PaletteLoadTimeout,
    /// The state store refused a read, write, or remove.
    StorageUnavailable,
    /// A workspace-supplied base URL failed the origin policy.
    UntrustedBaseUrl,
    /// Startup sequencing failed; the application keeps running.
    InitFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidThemeId => "INVALID_THEME_ID",
            ErrorCode::CatalogEmpty => "CATALOG_EMPTY",
            ErrorCode::InvalidResourcePath => "INVALID_RESOURCE_PATH",
            ErrorCode::PaletteLoadFailed => "PALETTE_LOAD_FAILED",
            ErrorCode::PaletteLoadTimeout => "PALETTE_LOAD_TIMEOUT",
            ErrorCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorCode::UntrustedBaseUrl => "UNTRUSTED_BASE_URL",
            ErrorCode::InitFailed => "INIT_FAILED",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Degraded but recoverable; the operation continued as a no-op or fallback.
    Warning,
    /// The operation did not complete; the application stays usable.
    Error,
    /// Nothing can proceed for this subsystem (empty catalog).
    Fatal,
}

/// Where a report came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub component: String,
    pub operation: String,
    pub detail: Option<String>,
}

impl ReportContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

/// One structured error record.
///
/// Nothing in the runtime propagates an error past a public entry point;
/// every failure becomes one of these, logged and (when a channel is wired)
/// forwarded to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub code: ErrorCode,
    pub message: String,
    pub level: Level,
    pub context: ReportContext,
}

impl Report {
    pub fn new(code: ErrorCode, level: Level, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            level,
            context: ReportContext::new("ThemeRuntime", "unspecified"),
        }
    }

    pub fn with_context(mut self, context: ReportContext) -> Self {
        self.context = context;
        self
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}] {}: {}",
            self.context.component, self.context.operation, self.code, self.message
        )
    }
}

/// Central report sink for the runtime.
///
/// Every report is logged through the `log` facade. When constructed with a
/// channel, reports are also forwarded so the UI can surface them as a
/// transient notice. A full or disconnected channel never becomes an error
/// itself; the log line already happened.
#[derive(Clone)]
pub struct Reporter {
    tx: Option<Sender<Report>>,
}

impl Reporter {
    pub fn new(tx: Sender<Report>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A reporter that only logs. Used by the boot seed and in tests.
    pub fn log_only() -> Self {
        Self { tx: None }
    }

    pub fn warn(&self, code: ErrorCode, context: ReportContext, message: impl Into<String>) {
        self.report(Report::new(code, Level::Warning, message).with_context(context));
    }

    pub fn error(&self, code: ErrorCode, context: ReportContext, message: impl Into<String>) {
        self.report(Report::new(code, Level::Error, message).with_context(context));
    }

    pub fn fatal(&self, code: ErrorCode, context: ReportContext, message: impl Into<String>) {
        self.report(Report::new(code, Level::Fatal, message).with_context(context));
    }

    pub fn report(&self, report: Report) {
        let detail = report
            .context
            .detail
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();

        match report.level {
            Level::Warning => log::warn!("{report}{detail}"),
            Level::Error => log::error!("{report}{detail}"),
            Level::Fatal => log::error!("[FATAL] {report}{detail}"),
        }

        if let Some(tx) = &self.tx {
            if let Err(e) = tx.send(report) {
                log::error!("Failed to forward report to UI: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_ok, assert_some};
    use std::sync::mpsc;

    #[test]
    fn codes_render_stable_names() {
        assert_eq!(ErrorCode::PaletteLoadTimeout.as_str(), "PALETTE_LOAD_TIMEOUT");
        assert_eq!(ErrorCode::UntrustedBaseUrl.as_str(), "UNTRUSTED_BASE_URL");
        assert_eq!(format!("{}", ErrorCode::StorageUnavailable), "STORAGE_UNAVAILABLE");
    }

    #[test]
    fn report_display_includes_component_operation_and_code() {
        let report = Report::new(ErrorCode::InvalidThemeId, Level::Warning, "no such theme")
            .with_context(ReportContext::new("Resolver", "resolve_requested"));

        let rendered = format!("{report}");
        assert!(rendered.contains("Resolver"));
        assert!(rendered.contains("resolve_requested"));
        assert!(rendered.contains("INVALID_THEME_ID"));
    }

    #[test]
    fn context_builder_attaches_detail() {
        let context = ReportContext::new("Loader", "ensure_palette").with_detail("dracula.toml");
        assert_some!(context.detail.as_deref());
        assert_eq!(context.detail.as_deref(), Some("dracula.toml"));
    }

    #[test]
    fn wired_reporter_forwards_over_channel() {
        let (tx, rx) = mpsc::channel();
        let reporter = Reporter::new(tx);

        reporter.warn(
            ErrorCode::StorageUnavailable,
            ReportContext::new("Persistence", "write"),
            "state file is read-only",
        );

        let received = assert_ok!(rx.try_recv());
        assert_matches!(received.code, ErrorCode::StorageUnavailable);
        assert_matches!(received.level, Level::Warning);
    }

    #[test]
    fn log_only_reporter_does_not_panic_without_channel() {
        let reporter = Reporter::log_only();
        reporter.error(
            ErrorCode::InitFailed,
            ReportContext::new("Bootstrap", "initialize"),
            "sequencer aborted",
        );
    }
}
