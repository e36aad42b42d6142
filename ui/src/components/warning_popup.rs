use crate::components::common::{Msg, PopupActivityMsg};
use crate::components::state::ComponentState;
use crate::theme::ThemePainter;
use tui_realm_stdlib::Paragraph;
use tuirealm::{
    Component, Event, MockComponent, NoUserEvent,
    event::{Key, KeyEvent},
    props::{Alignment, BorderType, Borders, TextSpan},
    ratatui::{
        Frame,
        layout::Rect,
        text::{Line, Text},
        widgets::{Block, Clear, Paragraph as RatatuiParagraph, Wrap},
    },
};

/// Popup for warnings the user should see but can dismiss without losing
/// anything. Degraded applies (fallbacks, slow loads) land here.
pub struct WarningPopup {
    component: Paragraph,
    message: String,
    is_mounted: bool,
}

impl WarningPopup {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            component: Paragraph::default()
                .borders(
                    Borders::default()
                        .color(ThemePainter::warning())
                        .modifiers(BorderType::Rounded),
                )
                .title(" ⚠ Warning ", Alignment::Center)
                .foreground(ThemePainter::warning())
                .alignment(Alignment::Center)
                .text([TextSpan::from(&message)]),
            message,
            is_mounted: false,
        }
    }
}

impl MockComponent for WarningPopup {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(tuirealm::ratatui::widgets::Borders::ALL)
            .border_type(tuirealm::ratatui::widgets::BorderType::Rounded)
            .border_style(tuirealm::ratatui::style::Style::default().fg(ThemePainter::warning()))
            .title(" ⚠ Warning ")
            .title_alignment(tuirealm::ratatui::layout::Alignment::Center);

        let mut lines = Vec::new();
        lines.push(Line::from(""));
        for line in self.message.lines() {
            lines.push(Line::from(line));
        }

        let paragraph = RatatuiParagraph::new(Text::from(lines))
            .block(block)
            .alignment(tuirealm::ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(tuirealm::ratatui::style::Style::default().fg(ThemePainter::warning()));

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.component.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.component.attr(attr, value);
    }

    fn state(&self) -> tuirealm::State {
        self.component.state()
    }

    fn perform(&mut self, cmd: tuirealm::command::Cmd) -> tuirealm::command::CmdResult {
        self.component.perform(cmd)
    }
}

impl Component<Msg, NoUserEvent> for WarningPopup {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter | Key::Esc,
                ..
            }) => Some(Msg::PopupActivity(PopupActivityMsg::Close)),
            _ => None,
        }
    }
}

impl ComponentState for WarningPopup {
    fn mount(&mut self) -> crate::error::AppResult<()> {
        if self.is_mounted {
            log::warn!("WarningPopup is already mounted");
            return Ok(());
        }
        log::debug!("Mounting WarningPopup component");
        self.is_mounted = true;
        Ok(())
    }
}
