use crate::components::common::{Msg, ThemeActivityMsg};
use crate::components::state::ComponentState;
use crate::config;
use crate::error::AppResult;
use crate::theme::ThemePainter;
use std::time::{Duration, Instant};
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{MouseButton, MouseEventKind, NoUserEvent};
use tuirealm::props::{Alignment, AttrValue, Attribute, Props, Style, TextModifiers};
use tuirealm::ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::Paragraph;
use tuirealm::{Component, Event, Frame, MockComponent, State};

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// How long a transient notice stays on the bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Top bar: app title, transient notices, and the theme trigger.
///
/// The trigger mirrors the active theme (glyph + label) plus an arrow for the
/// menu state, and grows a spinner while background work is in flight. It is
/// the pointer target for opening the menu; while the menu is open the bar
/// ignores clicks entirely so the menu owns dismissal.
pub struct StatusBar {
    props: Props,
    trigger_icon: String,
    trigger_label: String,
    menu_open: bool,
    busy_message: Option<String>,
    notice: Option<String>,
    notice_deadline: Option<Instant>,
    frame_index: usize,
    last_frame_time: Instant,
    trigger_rect: Rect,
}

impl StatusBar {
    pub fn new(
        trigger_icon: &str,
        trigger_label: &str,
        menu_open: bool,
        busy_message: Option<String>,
        notice: Option<String>,
    ) -> Self {
        Self {
            props: Props::default(),
            trigger_icon: trigger_icon.to_string(),
            trigger_label: trigger_label.to_string(),
            menu_open,
            busy_message,
            notice,
            notice_deadline: None,
            frame_index: 0,
            last_frame_time: Instant::now(),
            trigger_rect: Rect::default(),
        }
    }

    fn is_busy(&self) -> bool {
        self.busy_message.is_some()
    }

    fn trigger_text(&self) -> String {
        let arrow = if self.menu_open { "▴" } else { "▾" };
        if self.is_busy() {
            format!(
                "{} {} {} {} ",
                SPINNER_FRAMES[self.frame_index], self.trigger_icon, self.trigger_label, arrow
            )
        } else {
            format!("{} {} {} ", self.trigger_icon, self.trigger_label, arrow)
        }
    }

    fn update_animation(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        let frame_duration = config::get_config_or_panic().spinner_frame();
        let now = Instant::now();
        if now.duration_since(self.last_frame_time) >= frame_duration {
            self.frame_index = (self.frame_index + 1) % SPINNER_FRAMES.len();
            self.last_frame_time = now;
            return true;
        }
        false
    }

    fn expire_notice(&mut self) -> bool {
        match self.notice_deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.notice = None;
                self.notice_deadline = None;
                true
            }
            _ => false,
        }
    }

    fn left_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                " themetty ",
                Style::default()
                    .fg(ThemePainter::accent())
                    .add_modifier(TextModifiers::BOLD),
            ),
            Span::raw(" "),
        ];
        if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                notice.clone(),
                Style::default().fg(ThemePainter::warning()),
            ));
        } else if let Some(message) = &self.busy_message {
            spans.push(Span::styled(
                message.clone(),
                Style::default().fg(ThemePainter::subtext()),
            ));
        }
        Line::from(spans)
    }
}

impl MockComponent for StatusBar {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let trigger = self.trigger_text();
        let trigger_width = Span::raw(trigger.as_str()).width() as u16;

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(trigger_width)])
            .split(area);

        let trigger_style = if self.menu_open {
            Style::default()
                .fg(ThemePainter::background())
                .bg(ThemePainter::accent())
        } else {
            Style::default()
                .fg(ThemePainter::accent())
                .bg(ThemePainter::surface())
        };

        frame.render_widget(
            Paragraph::new(self.left_line()).style(Style::default().bg(ThemePainter::surface())),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(trigger)
                .alignment(Alignment::Right)
                .style(trigger_style),
            chunks[1],
        );

        // Remember where the trigger was drawn so clicks can hit-test it.
        self.trigger_rect = chunks[1];
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for StatusBar {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Tick => {
                let animated = self.update_animation();
                let expired = self.expire_notice();
                if animated || expired {
                    Some(Msg::ForceRedraw)
                } else {
                    None
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self.menu_open {
                    // The open menu owns every click, including the trigger.
                    return None;
                }
                let position = Position::new(mouse.column, mouse.row);
                if self.trigger_rect.contains(position) {
                    Some(Msg::ThemeActivity(ThemeActivityMsg::MenuToggleRequested {
                        focus_first: false,
                    }))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl ComponentState for StatusBar {
    fn mount(&mut self) -> AppResult<()> {
        self.frame_index = 0;
        self.last_frame_time = Instant::now();
        if self.notice.is_some() {
            self.notice_deadline = Some(Instant::now() + NOTICE_TTL);
        }
        Ok(())
    }
}
