use crate::components::common::Msg;
use crate::components::state::ComponentState;
use crate::error::AppResult;
use crate::theme::{self, ThemePainter};
use runtime::palette::{self, TokenColor};
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::NoUserEvent;
use tuirealm::props::{AttrValue, Attribute, Props, Style, TextModifiers};
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, State};

/// Read-only pane showing the active theme and its full token set.
///
/// The token swatches read the installed palette at render time, so the pane
/// repaints itself the moment an apply swaps the painter; only the heading
/// needs a remount.
pub struct Preview {
    props: Props,
    heading: String,
    detail: String,
}

impl Preview {
    pub fn new(heading: String, detail: String) -> Self {
        Self {
            props: Props::default(),
            heading,
            detail,
        }
    }

    fn token_line(name: &'static str, value: &str) -> Line<'static> {
        let parsed = palette::parse_color(value);
        let swatch = match parsed {
            TokenColor::Default => Span::styled(
                "······",
                Style::default().fg(ThemePainter::muted()),
            ),
            token => Span::styled("██████", Style::default().fg(theme::token_to_color(token))),
        };
        let shown_value = if value.is_empty() { "—" } else { value };
        Line::from(vec![
            Span::raw(" "),
            swatch,
            Span::raw("  "),
            Span::styled(
                format!("{name:<12}"),
                Style::default().fg(ThemePainter::subtext()),
            ),
            Span::styled(
                shown_value.to_string(),
                Style::default().fg(ThemePainter::muted()),
            ),
        ])
    }
}

impl MockComponent for Preview {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ThemePainter::border()))
            .title(" Preview ")
            .style(Style::default().bg(ThemePainter::background()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let active = ThemePainter::active_palette();
        let colors = &active.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", self.heading),
                Style::default()
                    .fg(ThemePainter::accent())
                    .add_modifier(TextModifiers::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", self.detail),
                Style::default().fg(ThemePainter::subtext()),
            )),
            Line::default(),
        ];
        lines.extend([
            Self::token_line("background", &colors.background),
            Self::token_line("surface", &colors.surface),
            Self::token_line("overlay", &colors.overlay),
            Self::token_line("text", &colors.text),
            Self::token_line("subtext", &colors.subtext),
            Self::token_line("muted", &colors.muted),
            Self::token_line("border", &colors.border),
            Self::token_line("accent", &colors.accent),
            Self::token_line("accent_alt", &colors.accent_alt),
            Self::token_line("highlight", &colors.highlight),
            Self::token_line("success", &colors.success),
            Self::token_line("warning", &colors.warning),
            Self::token_line("error", &colors.error),
            Self::token_line("info", &colors.info),
        ]);

        frame.render_widget(Paragraph::new(lines), inner);
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

impl Component<Msg, NoUserEvent> for Preview {
    fn on(&mut self, _ev: Event<NoUserEvent>) -> Option<Msg> {
        None
    }
}

impl ComponentState for Preview {
    fn mount(&mut self) -> AppResult<()> {
        log::debug!("Mounting Preview for '{}'", self.heading);
        Ok(())
    }
}
