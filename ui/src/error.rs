use crate::components::common::{Msg, PopupActivityMsg};
use std::fmt::Display;
use std::sync::mpsc::Sender;

/// Application-wide error type for the themetty terminal interface.
///
/// Runtime failures (palette loads, storage, resolution) never surface as
/// errors; the theme runtime downgrades them to reports and keeps going.
/// What remains here is the UI's own failure modes: component lifecycle,
/// configuration, terminal plumbing.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// UI component mounting, rendering or focus failures.
    Component(String),
    /// Application state inconsistencies.
    State(String),
    /// Configuration loading and validation errors.
    Config(String),
    /// Theme subsystem failures severe enough to show the user.
    Theme(String),
    /// Inter-component channel failures.
    Channel(String),
    /// File system errors during setup.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Component(msg) => write!(f, "Component Error: {msg}"),
            AppError::State(msg) => write!(f, "State Error: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Theme(msg) => write!(f, "Theme Error: {msg}"),
            AppError::Channel(msg) => write!(f, "Channel Error: {msg}"),
            AppError::Io(msg) => write!(f, "IO Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<crate::config::setup::SetupError> for AppError {
    fn from(err: crate::config::setup::SetupError) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Error severity levels for appropriate UI response
#[derive(Debug, Clone)]
pub enum ErrorSeverity {
    /// Warning severity - show warning popup and log
    Warning,
    /// High severity - show error popup and log
    Error,
    /// Critical severity - show error popup, log, and potentially exit
    Critical,
}

/// Context information for errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub user_message: String,
    pub technical_details: Option<String>,
    pub suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

impl ErrorContext {
    /// Create new error context with component and operation.
    /// Uses a generic message; use `.with_message()` for custom messages.
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            user_message: format!("An error occurred in {component}. Please try again."),
            technical_details: None,
            suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    pub fn with_technical_details(mut self, details: &str) -> Self {
        self.technical_details = Some(details.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Contextual error with rich information
#[derive(Debug, Clone)]
pub struct ContextualError {
    pub error: AppError,
    pub context: ErrorContext,
}

impl ContextualError {
    pub fn new(error: AppError, context: ErrorContext) -> Self {
        Self { error, context }
    }
}

impl Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.context.user_message, self.error)
    }
}

/// Central error reporting system.
///
/// Logs every error through the `log` facade and forwards it to the main
/// loop as a popup message. A dead channel only costs the popup; the log
/// line already happened.
#[derive(Clone)]
pub struct ErrorReporter {
    tx: Sender<Msg>,
}

impl ErrorReporter {
    pub fn new(tx: Sender<Msg>) -> Self {
        Self { tx }
    }

    /// Report a simple error with basic context
    pub fn report_simple(&self, error: AppError, component: &str, operation: &str) {
        let context =
            ErrorContext::new(component, operation).with_technical_details(&error.to_string());
        self.report(error, context);
    }

    /// Report a warning (shows warning popup)
    pub fn report_warning(&self, error: AppError, component: &str, operation: &str) {
        let context = ErrorContext::new(component, operation).with_severity(ErrorSeverity::Warning);
        self.report(error, context);
    }

    /// Report a critical error that will cause application exit
    pub fn report_critical_and_exit(
        &self,
        error: AppError,
        component: &str,
        operation: &str,
        user_message: &str,
    ) {
        let context = ErrorContext::new(component, operation)
            .with_message(user_message)
            .with_severity(ErrorSeverity::Critical)
            .with_suggestion("The application will terminate. Please fix the issue and restart.");
        self.report(error, context);
    }

    /// Report error with full context
    pub fn report(&self, error: AppError, context: ErrorContext) {
        let contextual_error = ContextualError::new(error.clone(), context.clone());

        match context.severity {
            ErrorSeverity::Warning => {
                log::warn!(
                    "[{}:{}] {}{}",
                    context.component,
                    context.operation,
                    contextual_error,
                    self.format_additional_context(&context)
                );
            }
            ErrorSeverity::Error => {
                log::error!(
                    "[{}:{}] {}{}",
                    context.component,
                    context.operation,
                    contextual_error,
                    self.format_additional_context(&context)
                );
            }
            ErrorSeverity::Critical => {
                log::error!(
                    "[CRITICAL] [{}:{}] {}{}",
                    context.component,
                    context.operation,
                    contextual_error,
                    self.format_additional_context(&context)
                );
            }
        }

        let popup_msg = match context.severity {
            ErrorSeverity::Warning => Msg::PopupActivity(PopupActivityMsg::ShowWarning(
                self.format_user_message(&context),
            )),
            ErrorSeverity::Error | ErrorSeverity::Critical => Msg::PopupActivity(
                PopupActivityMsg::ShowError(self.create_formatted_error(&error, &context)),
            ),
        };
        if let Err(e) = self.tx.send(popup_msg) {
            log::error!("Failed to send popup message: {e}");
        }
    }

    fn format_additional_context(&self, context: &ErrorContext) -> String {
        let mut parts = Vec::new();

        if let Some(ref technical_details) = context.technical_details {
            parts.push(format!("Technical: {technical_details}"));
        }

        if let Some(ref suggestion) = context.suggestion {
            parts.push(format!("Suggestion: {suggestion}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("\n{}", parts.join("\n"))
        }
    }

    /// Format user-friendly message for UI display
    fn format_user_message(&self, context: &ErrorContext) -> String {
        let mut message = context.user_message.clone();

        if let Some(ref suggestion) = context.suggestion {
            message.push_str(&format!("\n\n💡 {suggestion}"));
        }

        message
    }

    /// Create a formatted error for UI display
    fn create_formatted_error(&self, error: &AppError, context: &ErrorContext) -> AppError {
        let title = match error {
            AppError::Config(_) => "⚙️ Configuration Error",
            AppError::Theme(_) => "🎨 Theme Error",
            AppError::Component(_) => "🎛️ Component Error",
            AppError::State(_) => "📊 Application State Error",
            AppError::Channel(_) => "📡 Communication Error",
            AppError::Io(_) => "💾 File Error",
        };

        let mut formatted_message = title.to_string();
        formatted_message.push_str(&format!("\n\n{}", context.user_message));

        if let Some(ref technical) = context.technical_details {
            formatted_message.push_str(&format!("\n\nDetails: {technical}"));
        }

        if let Some(ref suggestion) = context.suggestion {
            formatted_message.push_str(&format!("\n\n💡 {suggestion}"));
        }

        match error {
            AppError::Config(_) => AppError::Config(formatted_message),
            AppError::Theme(_) => AppError::Theme(formatted_message),
            AppError::Component(_) => AppError::Component(formatted_message),
            AppError::State(_) => AppError::State(formatted_message),
            AppError::Channel(_) => AppError::Channel(formatted_message),
            AppError::Io(_) => AppError::Io(formatted_message),
        }
    }

    /// Report component mounting/unmounting errors
    pub fn report_mount_error(
        &self,
        component: &str,
        operation: &str,
        error: impl std::fmt::Display,
    ) {
        let app_error = AppError::Component(format!("Failed to {operation} {component}: {error}"));
        self.report_simple(app_error, component, operation);
    }

    /// Report message sending errors (mpsc channel errors)
    pub fn report_send_error(&self, context: &str, error: impl std::fmt::Display) {
        let app_error = AppError::Channel(format!("Failed to send {context}: {error}"));
        self.report_simple(app_error, "MessageChannel", "send_message");
    }

    /// Report activation/focus errors for UI components
    pub fn report_activation_error(&self, component: &str, error: impl std::fmt::Display) {
        let app_error = AppError::Component(format!("Failed to activate {component}: {error}"));
        self.report_simple(app_error, component, "activate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use std::sync::mpsc;

    #[test]
    fn report_simple_sends_error_popup_message() {
        let (tx, rx) = mpsc::channel();
        let reporter = ErrorReporter::new(tx);

        reporter.report_simple(
            AppError::Component("boom".to_string()),
            "StatusBar",
            "remount",
        );

        let msg = assert_ok!(rx.try_recv());
        match msg {
            Msg::PopupActivity(PopupActivityMsg::ShowError(e)) => {
                assert!(e.to_string().contains("boom"));
            }
            other => panic!("expected error popup message, got {other:?}"),
        }
    }

    #[test]
    fn warnings_become_warning_popups() {
        let (tx, rx) = mpsc::channel();
        let reporter = ErrorReporter::new(tx);

        reporter.report_warning(
            AppError::Theme("palette went missing".to_string()),
            "ThemeMenu",
            "refresh",
        );

        match assert_ok!(rx.try_recv()) {
            Msg::PopupActivity(PopupActivityMsg::ShowWarning(_)) => {}
            other => panic!("expected warning popup message, got {other:?}"),
        }
    }

    #[test]
    fn dead_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let reporter = ErrorReporter::new(tx);

        reporter.report_simple(AppError::State("late".to_string()), "Model", "update");
    }

    #[test]
    fn context_builder_carries_details_through() {
        let context = ErrorContext::new("Preview", "render")
            .with_message("preview failed")
            .with_technical_details("rect out of bounds")
            .with_suggestion("resize the terminal");

        assert_eq!(context.user_message, "preview failed");
        assert_eq!(
            context.technical_details.as_deref(),
            Some("rect out of bounds")
        );
        assert_eq!(context.suggestion.as_deref(), Some("resize the terminal"));
    }

    #[test]
    fn setup_errors_convert_to_io_errors() {
        fn fails() -> AppResult<()> {
            Err(crate::config::setup::SetupError::ConfigDir(
                "no home".to_string(),
            ))?;
            Ok(())
        }
        let err = assert_err!(fails());
        assert!(matches!(err, AppError::Io(_)));
    }
}
