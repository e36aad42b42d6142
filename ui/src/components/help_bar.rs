use crate::components::common::{ComponentId, Msg};
use crate::config;
use crate::theme::ThemePainter;
use tuirealm::props::Alignment;
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::style::Style;
use tuirealm::ratatui::text::{Line, Span, Text};
use tuirealm::ratatui::widgets::Paragraph;
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent};

/// Bottom bar listing the shortcuts that work right now.
///
/// Built fresh for every frame by the view, keyed off the focused component;
/// it is never mounted into the application.
pub struct HelpBar;

impl HelpBar {
    pub fn new() -> Self {
        Self
    }

    fn global_shortcuts(&self) -> Vec<(String, bool)> {
        let keys = config::get_config_or_panic().keys();
        vec![
            (format!("[{}]", keys.theme_menu()), true),
            (" Theme menu ".to_string(), false),
            (format!("[{}]", keys.quit()), true),
            (" Quit".to_string(), false),
        ]
    }

    fn context_shortcuts(&self, active_component: &ComponentId) -> Vec<(String, bool)> {
        let keys = config::get_config_or_panic().keys();
        match active_component {
            ComponentId::ThemeSelect => vec![
                (
                    format!("[↑{}/↓{}]", keys.up(), keys.down()),
                    true,
                ),
                (" Browse ".to_string(), false),
                ("[Enter]".to_string(), true),
                (" Open/Apply ".to_string(), false),
                ("[Esc]".to_string(), true),
                (" Collapse ".to_string(), false),
            ],
            ComponentId::ThemeMenu => vec![
                (
                    format!("[↑{}/↓{}]", keys.up(), keys.down()),
                    true,
                ),
                (" Move ".to_string(), false),
                ("[Home/End]".to_string(), true),
                (" Jump ".to_string(), false),
                ("[Enter/Space]".to_string(), true),
                (" Apply ".to_string(), false),
                ("[Esc]".to_string(), true),
                (" Dismiss ".to_string(), false),
            ],
            ComponentId::ErrorPopup | ComponentId::WarningPopup => vec![
                ("[Enter/Esc]".to_string(), true),
                (" Close ".to_string(), false),
            ],
            _ => vec![],
        }
    }

    pub fn view_with_active(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        active_component: &ComponentId,
    ) {
        let mut shortcuts = self.context_shortcuts(active_component);
        shortcuts.extend(self.global_shortcuts());

        let mut spans: Vec<Span> = Vec::new();
        for (i, (text, highlight)) in shortcuts.iter().enumerate() {
            if i > 0 && i % 2 == 0 {
                spans.push(Span::styled(
                    " | ",
                    Style::default().fg(ThemePainter::muted()),
                ));
            }
            if *highlight {
                spans.push(Span::styled(
                    text.clone(),
                    Style::default().fg(ThemePainter::accent_alt()),
                ));
            } else {
                spans.push(Span::styled(
                    text.clone(),
                    Style::default().fg(ThemePainter::subtext()),
                ));
            }
        }

        let paragraph = Paragraph::new(Text::from(Line::from(spans)))
            .style(Style::default().bg(ThemePainter::surface()))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

impl MockComponent for HelpBar {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        self.view_with_active(frame, area, &ComponentId::Preview);
    }

    fn query(&self, _attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        None
    }

    fn attr(&mut self, _attr: tuirealm::Attribute, _value: tuirealm::AttrValue) {}

    fn state(&self) -> tuirealm::State {
        tuirealm::State::None
    }

    fn perform(&mut self, _cmd: tuirealm::command::Cmd) -> tuirealm::command::CmdResult {
        tuirealm::command::CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for HelpBar {
    fn on(&mut self, _ev: Event<NoUserEvent>) -> Option<Msg> {
        None
    }
}
