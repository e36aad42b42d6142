use crate::app::model::{AppState, Model};
use crate::components::common::{ComponentId, Msg};
use crate::components::help_bar::HelpBar;
use crate::components::theme_menu::ThemeMenu;
use crate::components::theme_select::ThemeSelect;
use crate::error::AppResult;
use crate::theme::ThemePainter;
use tuirealm::event::NoUserEvent;
use tuirealm::ratatui::layout::{Constraint, Direction, Layout, Rect};
use tuirealm::ratatui::style::Style;
use tuirealm::ratatui::widgets::Block;
use tuirealm::terminal::TerminalAdapter;
use tuirealm::{Application, Frame};

/// Centered box for popups, clamped to the frame.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Where the dropdown overlay goes: hanging off the trigger, so right-aligned
/// directly under the status bar row.
fn menu_overlay_rect(desired: (u16, u16), area: Rect) -> Rect {
    let (width, height) = desired;
    let width = width.min(area.width);
    let height = height.min(area.height.saturating_sub(1));
    Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y + 1,
        width,
        height,
    )
}

// Render the error popup centered on the screen
pub fn view_error_popup(app: &mut Application<ComponentId, Msg, NoUserEvent>, f: &mut Frame) {
    app.view(&ComponentId::ErrorPopup, f, centered_rect(60, 12, f.area()));
}

pub fn view_warning_popup(app: &mut Application<ComponentId, Msg, NoUserEvent>, f: &mut Frame) {
    app.view(&ComponentId::WarningPopup, f, centered_rect(60, 10, f.area()));
}

impl<T> Model<T>
where
    T: TerminalAdapter,
{
    pub fn view(&mut self) -> AppResult<()> {
        let catalog_len = self.theme_runtime.catalog().len();
        let select_height = ThemeSelect::layout_height(catalog_len, self.select_open);
        let menu_size = ThemeMenu::overlay_size(self.theme_runtime.catalog());
        let menu_open =
            self.app_state == AppState::MenuOpen && self.app.mounted(&ComponentId::ThemeMenu);

        let error_mounted = self.app.mounted(&ComponentId::ErrorPopup);
        let warning_mounted = self.app.mounted(&ComponentId::WarningPopup);
        let help_context = if error_mounted {
            ComponentId::ErrorPopup
        } else if warning_mounted {
            ComponentId::WarningPopup
        } else if menu_open {
            ComponentId::ThemeMenu
        } else {
            ComponentId::ThemeSelect
        };

        let _ = self.terminal.draw(|f| {
            // Paint the whole frame in the palette's background first; this
            // is the page the active theme "classes" onto.
            f.render_widget(
                Block::default().style(Style::default().bg(ThemePainter::background())),
                f.area(),
            );

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(1),             // Status bar with trigger
                        Constraint::Min(4),                // Palette preview
                        Constraint::Length(select_height), // Native-style select
                        Constraint::Length(1),             // Help bar
                    ]
                    .as_ref(),
                )
                .split(f.area());

            self.app.view(&ComponentId::StatusBar, f, chunks[0]);
            self.app.view(&ComponentId::Preview, f, chunks[1]);
            self.app.view(&ComponentId::ThemeSelect, f, chunks[2]);

            // The dropdown floats over the preview; rendered after the base
            // layer so Clear wins.
            if menu_open {
                self.app
                    .view(&ComponentId::ThemeMenu, f, menu_overlay_rect(menu_size, f.area()));
            }

            // Popups last, error over warning.
            if warning_mounted {
                view_warning_popup(&mut self.app, f);
            }
            if error_mounted {
                view_error_popup(&mut self.app, f);
            }

            if !error_mounted && !warning_mounted {
                let mut help_bar = HelpBar::new();
                help_bar.view_with_active(f, chunks[3], &help_context);
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_small_frames() {
        let area = Rect::new(0, 0, 40, 8);
        let rect = centered_rect(60, 12, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn menu_overlay_hangs_below_the_status_bar_right_edge() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = menu_overlay_rect((30, 10), area);
        assert_eq!(rect.y, 1);
        assert_eq!(rect.x + rect.width, 80);
        assert_eq!(rect.height, 10);
    }

    #[test]
    fn menu_overlay_never_exceeds_the_frame() {
        let area = Rect::new(0, 0, 20, 6);
        let rect = menu_overlay_rect((30, 10), area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.x, 0);
    }
}
