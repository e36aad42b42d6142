use crate::app::model::{AppState, Model};
use crate::components::common::ComponentId;
use crate::components::error_popup::ErrorPopup;
use crate::components::preview::Preview;
use crate::components::state::ComponentStateMount;
use crate::components::status_bar::StatusBar;
use crate::components::theme_menu::ThemeMenu;
use crate::components::theme_select::ThemeSelect;
use crate::components::warning_popup::WarningPopup;
use crate::error::{AppError, AppResult};
use runtime::applier::ThemeRuntime;
use runtime::catalog::Appearance;
use tuirealm::terminal::TerminalAdapter;
use tuirealm::{Sub, SubClause, SubEventClause};

/// Text shown in the preview pane, derived from the runtime's view of the
/// applied theme.
pub(crate) fn preview_copy(theme_runtime: &ThemeRuntime) -> (String, String) {
    let current = theme_runtime.current_theme();
    let descriptor = current
        .as_deref()
        .and_then(|id| theme_runtime.catalog().resolve(id));
    match descriptor {
        Some(descriptor) => {
            let appearance = match descriptor.appearance {
                Appearance::Light => "light",
                Appearance::Dark => "dark",
            };
            (
                descriptor.label.clone(),
                format!("{} family, {} appearance", descriptor.family, appearance),
            )
        }
        None => (
            "No theme applied".to_string(),
            "Pick one from the theme menu.".to_string(),
        ),
    }
}

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    /// Rebuild the status bar from the current surfaces snapshot. Called
    /// whenever anything the bar shows changes: applied theme, menu state,
    /// busy work, notices.
    pub fn remount_status_bar(&mut self) {
        let surfaces = self.theme_runtime.surfaces_snapshot();
        let status_bar = StatusBar::new(
            &surfaces.trigger.icon,
            &surfaces.trigger.label,
            self.app_state == AppState::MenuOpen,
            self.busy_message.clone(),
            self.fresh_notice(),
        );
        assert!(
            self.app
                .remount_with_state(
                    ComponentId::StatusBar,
                    status_bar,
                    vec![Sub::new(SubEventClause::Any, SubClause::Always)],
                )
                .is_ok()
        );
    }

    pub fn remount_preview(&mut self) {
        let (heading, detail) = preview_copy(&self.theme_runtime);
        assert!(
            self.app
                .remount(
                    ComponentId::Preview,
                    Box::new(Preview::new(heading, detail)),
                    Vec::default(),
                )
                .is_ok()
        );
    }

    pub fn remount_theme_select(&mut self) {
        let current = self.theme_runtime.current_theme();
        assert!(
            self.app
                .remount(
                    ComponentId::ThemeSelect,
                    Box::new(ThemeSelect::populated(
                        self.theme_runtime.catalog(),
                        current.as_deref(),
                    )),
                    Vec::default(),
                )
                .is_ok()
        );
    }

    /// Mount the dropdown menu and give it focus. The checked item is the
    /// active theme; `focus_first` distinguishes keyboard opens from pointer
    /// opens.
    pub fn mount_theme_menu(&mut self, focus_first: bool) -> AppResult<()> {
        let current = self.theme_runtime.current_theme();
        self.app.remount_with_state(
            ComponentId::ThemeMenu,
            ThemeMenu::new(self.theme_runtime.catalog(), current.as_deref(), focus_first),
            Vec::default(),
        )?;

        self.app
            .active(&ComponentId::ThemeMenu)
            .map_err(|e| AppError::Component(e.to_string()))?;

        self.app_state = AppState::MenuOpen;
        self.remount_status_bar();
        Ok(())
    }

    /// Take the menu down. Closed-by-unmount keeps the component and the
    /// model from ever disagreeing about whether the menu is open.
    pub fn unmount_theme_menu(&mut self) {
        if self.app.mounted(&ComponentId::ThemeMenu) {
            if let Err(e) = self.app.umount(&ComponentId::ThemeMenu) {
                log::error!("Failed to unmount theme menu: {e}");
            }
        }
        if self.app_state == AppState::MenuOpen {
            self.app_state = AppState::Browsing;
        }
        self.remount_status_bar();
    }

    /// Mount error popup and give focus to it
    pub fn mount_error_popup(&mut self, error: &AppError) -> AppResult<()> {
        self.app.remount_with_state(
            ComponentId::ErrorPopup,
            ErrorPopup::new(error),
            Vec::default(),
        )?;

        self.app
            .active(&ComponentId::ErrorPopup)
            .map_err(|e| AppError::Component(e.to_string()))?;

        self.redraw = true;
        Ok(())
    }

    pub fn mount_warning_popup(&mut self, message: &str) -> AppResult<()> {
        self.app.remount_with_state(
            ComponentId::WarningPopup,
            WarningPopup::new(message),
            Vec::default(),
        )?;

        // An error popup on screen outranks the warning; let it keep focus.
        if !self.app.mounted(&ComponentId::ErrorPopup) {
            self.app
                .active(&ComponentId::WarningPopup)
                .map_err(|e| AppError::Component(e.to_string()))?;
        }

        self.redraw = true;
        Ok(())
    }

    pub fn close_popups(&mut self) {
        for id in [ComponentId::ErrorPopup, ComponentId::WarningPopup] {
            if self.app.mounted(&id) {
                if let Err(e) = self.app.umount(&id) {
                    log::error!("Failed to unmount {id:?}: {e}");
                }
            }
        }
        self.redraw = true;
    }

    /// Hand focus back to whatever the current state says should own it.
    pub fn refocus_for_state(&mut self) {
        let target = match self.app_state {
            AppState::MenuOpen if self.app.mounted(&ComponentId::ThemeMenu) => {
                ComponentId::ThemeMenu
            }
            _ => ComponentId::ThemeSelect,
        };
        if let Err(e) = self.app.active(&target) {
            self.error_reporter
                .report_activation_error(&format!("{target:?}"), e);
        }
    }
}
