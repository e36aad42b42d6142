//! Application lifecycle management
//!
//! Initialization, the main loop, and shutdown, kept out of main.rs. The
//! model is built around a runtime that has already been seeded, so the
//! first frame shows the persisted theme before any async work runs.

use crate::app::model::Model;
use crate::components::common::{Msg, ThemeActivityMsg};
use crate::error::{AppError, ErrorReporter};

use log::{debug, error, info};
use runtime::applier::ThemeRuntime;
use runtime::error::{ErrorCode, Report, ReportContext, Reporter};
use std::error::Error as StdError;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tuirealm::Update;
use tuirealm::application::PollStrategy;
use tuirealm::terminal::CrosstermTerminalAdapter;

/// Application initialization and lifecycle management
pub struct ApplicationLifecycle;

impl ApplicationLifecycle {
    /// Create the application model and kick off the startup sequence.
    pub fn initialize(
        theme_runtime: Arc<ThemeRuntime>,
        rx_reports: Receiver<Report>,
    ) -> Result<Model<CrosstermTerminalAdapter>, Box<dyn StdError>> {
        let model = match Model::new(theme_runtime, rx_reports) {
            Ok(model) => {
                info!("Model initialized successfully");
                model
            }
            Err(e) => {
                Self::report_critical_error(
                    AppError::Component(e.to_string()),
                    "ApplicationModel",
                    "initialize",
                    "Failed to initialize application model. The application cannot start.",
                );
                return Err(e.to_string().into());
            }
        };

        Self::start_theme_initialization(&model);
        Ok(model)
    }

    /// Run the runtime's startup sequence off the main thread. Its outcome
    /// comes back as a message; until then the boot seed stays on screen.
    fn start_theme_initialization(model: &Model<CrosstermTerminalAdapter>) {
        let runtime = Arc::clone(&model.theme_runtime);
        let tx_to_main = model.tx_to_main.clone();
        model
            .task_manager
            .execute("Resolving startup theme", async move {
                let outcome = runtime.init().await;
                tx_to_main
                    .send(Msg::ThemeActivity(ThemeActivityMsg::InitCompleted(outcome)))
                    .map_err(|e| {
                        // The boot seed stays on screen; the app keeps running.
                        runtime.reporter().error(
                            ErrorCode::InitFailed,
                            ReportContext::new("InitSequencer", "deliver_outcome"),
                            format!("startup outcome was not delivered: {e}"),
                        );
                        AppError::Channel(format!("Failed to deliver startup outcome: {e}"))
                    })
            });
    }

    /// Setup terminal for application use
    pub fn setup_terminal(
        model: &mut Model<CrosstermTerminalAdapter>,
    ) -> Result<(), Box<dyn StdError>> {
        debug!("Entering alternate screen");
        model
            .terminal
            .enter_alternate_screen()
            .map_err(|e| format!("Failed to enter alternate screen: {e}"))?;
        model
            .terminal
            .enable_raw_mode()
            .map_err(|e| format!("Failed to enable raw mode: {e}"))?;
        // The trigger and the menu are pointer targets, so mouse capture is
        // part of normal operation, not an extra.
        model
            .terminal
            .enable_mouse_capture()
            .map_err(|e| format!("Failed to enable mouse capture: {e}"))?;
        Ok(())
    }

    /// Run the main application loop
    pub fn run_application_loop(model: &mut Model<CrosstermTerminalAdapter>) {
        info!("Entering main application loop");

        while !model.quit {
            Self::process_single_iteration(model);
        }
    }

    /// Process a single iteration of the main loop
    fn process_single_iteration(model: &mut Model<CrosstermTerminalAdapter>) {
        model.update_outside_msg();

        match model.app.tick(PollStrategy::Once) {
            Err(err) => Self::handle_tick_error(model, err),
            Ok(messages) if !messages.is_empty() => Self::process_messages(model, messages),
            _ => {}
        }

        if model.redraw {
            if let Err(e) = model.view() {
                error!("Error during view rendering: {e}");
            }
            model.redraw = false;
        }
    }

    fn handle_tick_error(
        model: &mut Model<CrosstermTerminalAdapter>,
        err: tuirealm::ApplicationError,
    ) {
        error!("Application tick error: {err:?}");
        if let Err(e) =
            model.mount_error_popup(&AppError::Component(format!("Application error: {err:?}")))
        {
            error!("Failed to mount error popup: {e}");
        }
        model.redraw = true;
    }

    fn process_messages(model: &mut Model<CrosstermTerminalAdapter>, messages: Vec<Msg>) {
        model.redraw = true;
        for msg in messages.into_iter() {
            let mut msg = Some(msg);
            while msg.is_some() {
                msg = model.update(msg);
            }
        }
    }

    /// Properly shutdown the application
    pub fn shutdown_application(mut model: Model<CrosstermTerminalAdapter>) {
        info!("Application shutdown initiated");
        model.shutdown();

        debug!("Leaving alternate screen");
        let _ = model.terminal.disable_mouse_capture();
        let _ = model.terminal.leave_alternate_screen();
        let _ = model.terminal.disable_raw_mode();
        let _ = model.terminal.clear_screen();

        info!("Application terminated successfully");
    }

    /// Report critical error and prepare for application exit
    fn report_critical_error(
        error: AppError,
        component: &str,
        operation: &str,
        user_message: &str,
    ) {
        // One structured record for the log, console output for the user.
        Reporter::log_only().error(
            ErrorCode::InitFailed,
            ReportContext::new(component, operation),
            error.to_string(),
        );

        // A throwaway reporter keeps critical startup errors on the same
        // path as runtime errors, even though no UI exists yet to show them.
        let (tx, _rx) = std::sync::mpsc::channel();
        let error_reporter = ErrorReporter::new(tx);
        error_reporter.report_critical_and_exit(error, component, operation, user_message);

        eprintln!("Critical Error: {user_message}");
    }
}
