use crate::app::task_manager::TaskManager;
use crate::components::common::{ComponentId, Msg, ThemeActivityMsg};
use crate::components::status_bar::NOTICE_TTL;
use crate::error::ErrorReporter;
use runtime::applier::ThemeRuntime;
use runtime::error::Report;
use runtime::taskpool::TaskPool;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;
use tuirealm::event::NoUserEvent;
use tuirealm::terminal::{TerminalAdapter, TerminalBridge};
use tuirealm::{Application, Update};

// Submodules
mod initialization;
mod update_handler;

/// Which interaction surface owns the keyboard right now. Popups are
/// tracked through the mount table instead; they sit on top of either
/// state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Browsing,
    MenuOpen,
}

/// Application model
pub struct Model<T>
where
    T: TerminalAdapter,
{
    /// Application
    pub app: Application<ComponentId, Msg, NoUserEvent>,
    pub app_state: AppState,
    /// Indicates that the application must quit
    pub quit: bool,
    /// Tells whether to redraw interface
    pub redraw: bool,
    /// Used to draw to terminal
    pub terminal: TerminalBridge<T>,

    pub taskpool: Arc<TaskPool>,
    pub tx_to_main: Sender<Msg>,
    pub rx_to_main: Receiver<Msg>,
    /// Reports pushed by the theme runtime from background applies.
    pub rx_reports: Receiver<Report>,

    /// The theme switching engine; everything canonical lives there.
    pub theme_runtime: Arc<ThemeRuntime>,

    /// Select option list unrolled (affects layout height).
    pub select_open: bool,
    /// Number of background operations currently showing the spinner.
    pub active_loads: usize,
    pub busy_message: Option<String>,
    /// Last transient notice with the moment it was set.
    pub notice: Option<(String, Instant)>,

    pub error_reporter: ErrorReporter,
    pub task_manager: TaskManager,
}

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    /// Handle messages sent from background tasks and the runtime's report
    /// channel. Reports are folded in first so a completed apply's warnings
    /// are on screen before its completion message rearranges focus.
    pub fn update_outside_msg(&mut self) {
        while let Ok(report) = self.rx_reports.try_recv() {
            let mut msg = Some(Msg::ThemeActivity(ThemeActivityMsg::RuntimeReport(report)));
            while msg.is_some() {
                msg = self.update(msg);
            }
        }
        while let Ok(msg) = self.rx_to_main.try_recv() {
            let mut msg = Some(msg);
            while msg.is_some() {
                msg = self.update(msg);
            }
        }
    }

    /// A notice that is still worth showing after a remount.
    pub fn fresh_notice(&self) -> Option<String> {
        self.notice
            .as_ref()
            .filter(|(_, set_at)| set_at.elapsed() < NOTICE_TTL)
            .map(|(text, _)| text.clone())
    }

    pub fn popup_mounted(&self) -> bool {
        self.app.mounted(&ComponentId::ErrorPopup) || self.app.mounted(&ComponentId::WarningPopup)
    }

    /// Shutdown the application and clean up resources.
    ///
    /// Cancelling the pool aborts in-flight applies at their next await
    /// point; busy guards release on drop so nothing stays marked busy.
    pub fn shutdown(&mut self) {
        log::info!("Shutting down application");
        self.taskpool.shutdown();
        self.quit = true;
    }
}

impl<T> Update<Msg> for Model<T>
where
    T: TerminalAdapter,
{
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        self.handle_update(msg)
    }
}
