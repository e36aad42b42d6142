use crate::app::model::{AppState, Model};
use crate::components::common::{ComponentId, Msg, PopupActivityMsg, ThemeActivityMsg};
use crate::error::AppError;
use crate::theme::ThemePainter;
use runtime::applier::{ApplyOutcome, InitOutcome};
use runtime::error::{Level, Report};
use std::sync::Arc;
use std::time::Instant;
use tuirealm::terminal::TerminalAdapter;
use tuirealm::{Attribute, AttrValue};
use tuirealm::props::{PropPayload, PropValue};

/// How a runtime report surfaces in the UI: warnings become a transient
/// status notice, anything worse interrupts with a popup.
#[derive(Debug)]
pub(crate) enum ReportSurface {
    Notice(String),
    Popup(AppError),
}

pub(crate) fn surface_for_report(report: &Report) -> ReportSurface {
    match report.level {
        Level::Warning => ReportSurface::Notice(report.message.clone()),
        Level::Error | Level::Fatal => ReportSurface::Popup(AppError::Theme(report.to_string())),
    }
}

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    pub fn update_theme(&mut self, msg: ThemeActivityMsg) -> Option<Msg> {
        match msg {
            ThemeActivityMsg::MenuToggleRequested { focus_first } => {
                self.handle_menu_toggle(focus_first)
            }
            ThemeActivityMsg::MenuClosed { refocus } => self.handle_menu_closed(refocus),
            ThemeActivityMsg::SelectFocusRequested => self.handle_select_focus(),
            ThemeActivityMsg::SelectOpened => {
                self.select_open = true;
                None
            }
            ThemeActivityMsg::SelectClosed => {
                self.select_open = false;
                None
            }
            ThemeActivityMsg::ThemeChosen(id) => self.handle_theme_chosen(id),
            ThemeActivityMsg::InitCompleted(outcome) => self.handle_init_completed(outcome),
            ThemeActivityMsg::ApplyCompleted(outcome) => self.handle_apply_completed(outcome),
            ThemeActivityMsg::RuntimeReport(report) => self.handle_runtime_report(report),
        }
    }

    fn handle_menu_toggle(&mut self, focus_first: bool) -> Option<Msg> {
        // Popups own the screen; the menu waits its turn.
        if self.popup_mounted() {
            return None;
        }
        if self.app_state == AppState::MenuOpen {
            return self.handle_menu_closed(true);
        }
        log::debug!("Opening theme menu (focus_first: {focus_first})");
        if let Err(e) = self.mount_theme_menu(focus_first) {
            self.error_reporter.report_mount_error("ThemeMenu", "mount", e);
        }
        None
    }

    fn handle_menu_closed(&mut self, refocus: bool) -> Option<Msg> {
        self.unmount_theme_menu();
        if refocus {
            if let Err(e) = self.app.active(&ComponentId::ThemeSelect) {
                self.error_reporter.report_activation_error("ThemeSelect", e);
            }
        }
        None
    }

    fn handle_select_focus(&mut self) -> Option<Msg> {
        if self.popup_mounted() {
            return None;
        }
        if self.app_state == AppState::MenuOpen {
            self.unmount_theme_menu();
        }
        if let Err(e) = self.app.active(&ComponentId::ThemeSelect) {
            self.error_reporter.report_activation_error("ThemeSelect", e);
        }
        None
    }

    /// Either surface committed a theme choice. Close whatever was open and
    /// hand the id to the runtime; the select's displayed value moves only
    /// when the apply comes back, so a failed apply never lies about state.
    fn handle_theme_chosen(&mut self, id: String) -> Option<Msg> {
        if self.app_state == AppState::MenuOpen {
            self.handle_menu_closed(true);
        }
        self.select_open = false;

        let label = self
            .theme_runtime
            .catalog()
            .resolve(&id)
            .map(|descriptor| descriptor.label.clone())
            .unwrap_or_else(|| id.clone());
        log::info!("Theme chosen: {id}");

        let runtime = Arc::clone(&self.theme_runtime);
        let tx_to_main = self.tx_to_main.clone();
        self.task_manager
            .execute(format!("Applying {label}"), async move {
                let outcome = runtime.select(&id).await;
                tx_to_main
                    .send(Msg::ThemeActivity(ThemeActivityMsg::ApplyCompleted(
                        outcome,
                    )))
                    .map_err(|e| {
                        AppError::Channel(format!("Failed to deliver apply outcome: {e}"))
                    })
            });
        None
    }

    /// Startup finished resolving and (when needed) fetching the boot theme.
    /// The select comes alive here; until now it was a disabled placeholder.
    fn handle_init_completed(&mut self, outcome: InitOutcome) -> Option<Msg> {
        match &outcome {
            InitOutcome::FastPath { id } => log::info!("Startup kept seeded theme '{id}'"),
            InitOutcome::Applied(apply) => log::info!("Startup applied theme '{}'", apply.id),
        }

        ThemePainter::install(self.theme_runtime.active_palette());
        self.remount_theme_select();
        self.remount_status_bar();
        self.remount_preview();

        if !self.popup_mounted() && self.app_state == AppState::Browsing {
            if let Err(e) = self.app.active(&ComponentId::ThemeSelect) {
                self.error_reporter.report_activation_error("ThemeSelect", e);
            }
        }
        None
    }

    fn handle_apply_completed(&mut self, outcome: ApplyOutcome) -> Option<Msg> {
        if outcome.superseded {
            log::debug!("Apply of '{}' was overtaken by a newer request", outcome.id);
            return None;
        }
        log::info!("Theme '{}' is now active", outcome.id);

        ThemePainter::install(self.theme_runtime.active_palette());

        // Move the select's committed value to the theme that actually won.
        if let Some(position) = self.theme_runtime.catalog().position(&outcome.id) {
            if let Err(e) = self.app.attr(
                &ComponentId::ThemeSelect,
                Attribute::Value,
                AttrValue::Payload(PropPayload::One(PropValue::Usize(position))),
            ) {
                log::error!("Failed to sync select value to '{}': {e}", outcome.id);
            }
        }

        self.remount_status_bar();
        self.remount_preview();
        None
    }

    fn handle_runtime_report(&mut self, report: Report) -> Option<Msg> {
        match surface_for_report(&report) {
            ReportSurface::Notice(text) => {
                self.notice = Some((text, Instant::now()));
                self.remount_status_bar();
                None
            }
            ReportSurface::Popup(error) => {
                Some(Msg::PopupActivity(PopupActivityMsg::ShowError(error)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::assert_matches;
    use runtime::error::{ErrorCode, ReportContext};

    #[test]
    fn warning_reports_become_status_notices() {
        let report = Report::new(
            ErrorCode::InvalidThemeId,
            Level::Warning,
            "persisted theme 'ocean' is unknown, using 'nord-dark'",
        )
        .with_context(ReportContext::new("ThemeRuntime", "init"));

        let surface = surface_for_report(&report);
        assert_matches!(surface, ReportSurface::Notice(text) if text.contains("ocean"));
    }

    #[test]
    fn error_reports_become_popups_with_full_context() {
        let report = Report::new(
            ErrorCode::PaletteLoadFailed,
            Level::Error,
            "palette asset is malformed",
        )
        .with_context(ReportContext::new("PaletteLoader", "ensure_palette"));

        let surface = surface_for_report(&report);
        assert_matches!(
            surface,
            ReportSurface::Popup(AppError::Theme(text))
                if text.contains("PaletteLoader") && text.contains("PALETTE_LOAD_FAILED")
        );
    }

    #[test]
    fn fatal_reports_also_interrupt_with_a_popup() {
        let report = Report::new(ErrorCode::CatalogEmpty, Level::Fatal, "catalog has no themes");
        assert_matches!(surface_for_report(&report), ReportSurface::Popup(_));
    }
}
