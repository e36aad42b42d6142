use crate::components::common::{Msg, ThemeActivityMsg};
use crate::components::state::ComponentState;
use crate::config;
use crate::error::AppResult;
use crate::theme::ThemePainter;
use runtime::catalog::ThemeCatalog;
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, KeyModifiers, MouseButton, MouseEventKind, NoUserEvent};
use tuirealm::props::{AttrValue, Attribute, PropPayload, PropValue, Props, Style};
use tuirealm::ratatui::layout::{Position, Rect};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, State, StateValue};

/// Height of the control when its option list is rolled up.
pub const CLOSED_HEIGHT: u16 = 3;

/// The always-visible selector: a one-row control that unrolls an inline
/// option list.
///
/// This is the form control counterpart of the dropdown menu; both commit
/// through the same `ThemeChosen` message. Until the catalog is handed over
/// it renders a placeholder and ignores input. The committed value is only
/// moved from outside (via `Attribute::Value`) once an apply actually
/// finishes, so a failed apply never leaves the control pointing at a theme
/// that is not active.
pub struct ThemeSelect {
    props: Props,
    choices: Vec<(String, String)>,
    selected: usize,
    highlight: usize,
    open: bool,
    enabled: bool,
    area: Rect,
    option_rects: Vec<(usize, Rect)>,
}

impl ThemeSelect {
    /// Pre-catalog placeholder. Ignores every event.
    pub fn placeholder() -> Self {
        Self {
            props: Props::default(),
            choices: Vec::new(),
            selected: 0,
            highlight: 0,
            open: false,
            enabled: false,
            area: Rect::default(),
            option_rects: Vec::new(),
        }
    }

    /// Ready control listing the catalog in render order, so an option
    /// index is also a catalog position.
    pub fn populated(catalog: &ThemeCatalog, current: Option<&str>) -> Self {
        let choices = catalog
            .themes()
            .iter()
            .map(|descriptor| {
                (
                    descriptor.id.clone(),
                    format!("{} {}", descriptor.glyph(), descriptor.label),
                )
            })
            .collect();
        let selected = current
            .and_then(|id| catalog.position(id))
            .unwrap_or_default();
        Self {
            props: Props::default(),
            choices,
            selected,
            highlight: selected,
            open: false,
            enabled: true,
            area: Rect::default(),
            option_rects: Vec::new(),
        }
    }

    /// Rows the layout should reserve: one bordered row rolled up, the full
    /// option list (bounded, the component scrolls past twelve) unrolled.
    pub fn layout_height(choice_count: usize, open: bool) -> u16 {
        if open {
            (choice_count as u16)
                .saturating_add(2)
                .clamp(CLOSED_HEIGHT, 12)
        } else {
            CLOSED_HEIGHT
        }
    }

    fn commit_highlight(&mut self) -> Option<Msg> {
        self.open = false;
        let (id, _) = self.choices.get(self.highlight)?;
        Some(Msg::ThemeActivity(ThemeActivityMsg::ThemeChosen(id.clone())))
    }

    fn cancel(&mut self) -> Option<Msg> {
        self.open = false;
        self.highlight = self.selected;
        Some(Msg::ThemeActivity(ThemeActivityMsg::SelectClosed))
    }

    fn unroll(&mut self) -> Option<Msg> {
        if self.choices.is_empty() {
            return None;
        }
        self.open = true;
        self.highlight = self.selected;
        Some(Msg::ThemeActivity(ThemeActivityMsg::SelectOpened))
    }

    fn move_highlight(&mut self, delta: isize) {
        if self.choices.is_empty() {
            return;
        }
        let last = self.choices.len() - 1;
        let next = self.highlight as isize + delta;
        // The option list clamps at its ends; only the menu wraps.
        self.highlight = next.clamp(0, last as isize) as usize;
    }

    fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(ThemePainter::accent())
        } else {
            Style::default().fg(ThemePainter::border())
        }
    }

    fn view_closed(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let content = if self.enabled {
            let current = self
                .choices
                .get(self.selected)
                .map(|(_, display)| display.as_str())
                .unwrap_or("");
            Line::from(vec![
                Span::styled(" ▾ ", Style::default().fg(ThemePainter::accent())),
                Span::styled(
                    current.to_string(),
                    Style::default().fg(ThemePainter::text()),
                ),
            ])
        } else {
            Line::from(Span::styled(
                " waiting for the catalog…",
                Style::default().fg(ThemePainter::muted()),
            ))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.border_style(focused))
            .title(" Theme ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(content), inner);
    }

    fn view_open(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.border_style(focused))
            .title(" Theme ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = inner.height as usize;
        let offset = if self.choices.len() <= visible || visible == 0 {
            0
        } else {
            self.highlight
                .saturating_sub(visible.saturating_sub(1))
                .min(self.choices.len() - visible)
        };

        for (slot, index) in (offset..self.choices.len()).take(visible).enumerate() {
            let row_rect = Rect::new(inner.x, inner.y + slot as u16, inner.width, 1);
            let (_, display) = &self.choices[index];
            let marker = if index == self.selected { "•" } else { " " };
            let style = if index == self.highlight {
                Style::default()
                    .fg(ThemePainter::background())
                    .bg(ThemePainter::accent())
            } else {
                Style::default().fg(ThemePainter::text())
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {marker} {display}"),
                    style,
                ))),
                row_rect,
            );
            self.option_rects.push((index, row_rect));
        }
    }

    fn navigation_keys(&self) -> (char, char) {
        let keys = config::get_config_or_panic().keys();
        (keys.down(), keys.up())
    }
}

impl MockComponent for ThemeSelect {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self
            .props
            .get_or(Attribute::Focus, AttrValue::Flag(false))
            .unwrap_flag();
        self.option_rects.clear();
        if self.open {
            self.view_open(frame, area, focused);
        } else {
            self.view_closed(frame, area, focused);
        }
        self.area = area;
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        if attr == Attribute::Value {
            if let AttrValue::Payload(PropPayload::One(PropValue::Usize(index))) = &value {
                if *index < self.choices.len() {
                    self.selected = *index;
                    if !self.open {
                        self.highlight = *index;
                    }
                }
            }
        }
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        if self.enabled {
            State::One(StateValue::Usize(self.selected))
        } else {
            State::None
        }
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for ThemeSelect {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        if !self.enabled {
            return None;
        }
        let (down_key, up_key) = self.navigation_keys();
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                modifiers: KeyModifiers::NONE,
            }) => {
                if self.open {
                    self.commit_highlight()
                } else {
                    self.unroll()
                }
            }
            Event::Keyboard(KeyEvent {
                code: Key::Down, ..
            }) => {
                if self.open {
                    self.move_highlight(1);
                    Some(Msg::ForceRedraw)
                } else {
                    self.unroll()
                }
            }
            Event::Keyboard(KeyEvent { code: Key::Up, .. }) => {
                if self.open {
                    self.move_highlight(-1);
                    Some(Msg::ForceRedraw)
                } else {
                    self.unroll()
                }
            }
            Event::Keyboard(KeyEvent {
                code: Key::Char(c),
                modifiers: KeyModifiers::NONE,
            }) if c == down_key && self.open => {
                self.move_highlight(1);
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Char(c),
                modifiers: KeyModifiers::NONE,
            }) if c == up_key && self.open => {
                self.move_highlight(-1);
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Home, ..
            }) if self.open => {
                self.highlight = 0;
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent { code: Key::End, .. }) if self.open => {
                self.highlight = self.choices.len().saturating_sub(1);
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent { code: Key::Esc, .. }) if self.open => self.cancel(),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                if self.open {
                    let hit = self
                        .option_rects
                        .iter()
                        .find(|(_, rect)| rect.contains(position))
                        .map(|(index, _)| *index);
                    match hit {
                        Some(index) => {
                            self.highlight = index;
                            self.commit_highlight()
                        }
                        None if self.area.contains(position) => Some(Msg::ForceRedraw),
                        None => self.cancel(),
                    }
                } else if self.area.contains(position) {
                    self.unroll()
                } else {
                    None
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollDown && self.open => {
                self.move_highlight(1);
                Some(Msg::ForceRedraw)
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollUp && self.open => {
                self.move_highlight(-1);
                Some(Msg::ForceRedraw)
            }
            _ => None,
        }
    }
}

impl ComponentState for ThemeSelect {
    fn mount(&mut self) -> AppResult<()> {
        log::debug!(
            "Mounting ThemeSelect ({} choices, enabled: {})",
            self.choices.len(),
            self.enabled
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::assert_none;
    use runtime::error::Reporter;

    const MANIFEST: &str = r#"
default = "one"

[[themes]]
id = "one"
label = "One"
family = "Singles"
appearance = "dark"

[[themes]]
id = "two"
label = "Two"
family = "Singles"
appearance = "light"

[[themes]]
id = "three"
label = "Three"
family = "Singles"
appearance = "dark"
"#;

    mod helpers {
        use super::*;

        pub fn catalog() -> ThemeCatalog {
            ThemeCatalog::from_manifest(MANIFEST, &Reporter::log_only()).unwrap()
        }

        pub fn key(code: Key) -> Event<NoUserEvent> {
            Event::Keyboard(KeyEvent::new(code, KeyModifiers::NONE))
        }
    }

    mod unit {
        use super::*;

        #[test]
        fn placeholder_ignores_input() {
            let mut select = ThemeSelect::placeholder();
            assert_none!(select.on(helpers::key(Key::Enter)));
            assert_none!(select.on(helpers::key(Key::Down)));
            assert_eq!(select.state(), State::None);
        }

        #[test]
        fn enter_unrolls_then_commits() {
            let mut select = ThemeSelect::populated(&helpers::catalog(), Some("one"));

            let opened = select.on(helpers::key(Key::Enter));
            assert_eq!(
                opened,
                Some(Msg::ThemeActivity(ThemeActivityMsg::SelectOpened))
            );

            select.on(helpers::key(Key::Down));
            let committed = select.on(helpers::key(Key::Enter));
            assert_eq!(
                committed,
                Some(Msg::ThemeActivity(ThemeActivityMsg::ThemeChosen(
                    "two".to_string()
                )))
            );
            assert!(!select.open);
        }

        #[test]
        fn escape_cancels_back_to_the_committed_value() {
            let mut select = ThemeSelect::populated(&helpers::catalog(), Some("two"));
            select.on(helpers::key(Key::Enter));
            select.on(helpers::key(Key::Down));

            let msg = select.on(helpers::key(Key::Esc));
            assert_eq!(msg, Some(Msg::ThemeActivity(ThemeActivityMsg::SelectClosed)));
            assert_eq!(select.highlight, select.selected);
        }

        #[test]
        fn highlight_clamps_at_the_ends() {
            let mut select = ThemeSelect::populated(&helpers::catalog(), Some("one"));
            select.on(helpers::key(Key::Enter));

            select.on(helpers::key(Key::Up));
            assert_eq!(select.highlight, 0);

            select.on(helpers::key(Key::End));
            select.on(helpers::key(Key::Down));
            assert_eq!(select.highlight, 2);
        }

        #[test]
        fn value_attribute_moves_the_committed_index() {
            let mut select = ThemeSelect::populated(&helpers::catalog(), Some("one"));
            select.attr(
                Attribute::Value,
                AttrValue::Payload(PropPayload::One(PropValue::Usize(2))),
            );
            assert_eq!(select.state(), State::One(StateValue::Usize(2)));

            // Out-of-range writes are dropped.
            select.attr(
                Attribute::Value,
                AttrValue::Payload(PropPayload::One(PropValue::Usize(9))),
            );
            assert_eq!(select.state(), State::One(StateValue::Usize(2)));
        }
    }
}
