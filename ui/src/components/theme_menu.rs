use crate::components::common::{Msg, ThemeActivityMsg};
use crate::components::state::ComponentState;
use crate::config;
use crate::error::AppResult;
use crate::theme::ThemePainter;
use runtime::catalog::ThemeCatalog;
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, KeyModifiers, MouseButton, MouseEventKind, NoUserEvent};
use tuirealm::props::{AttrValue, Attribute, Props, Style, TextModifiers};
use tuirealm::ratatui::layout::{Position, Rect};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, State, StateValue};

/// One selectable row of the dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub glyph: String,
    pub family: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuPhase {
    Closed,
    /// `focused` is `None` right after a pointer open; the first keyboard
    /// navigation assigns it.
    Open { focused: Option<usize> },
}

/// Dropdown state machine, independent of any terminal.
///
/// Owns the open/closed phase, the roving focus, and the checkmark
/// projection. Selection returns the chosen id and closes in the same step,
/// so there is no window where the menu is open without a valid focus state.
/// Navigation wraps at both ends.
#[derive(Debug, Clone)]
pub struct MenuMachine {
    items: Vec<MenuItem>,
    phase: MenuPhase,
}

impl MenuMachine {
    /// Items come out in catalog render order, so a menu index is also a
    /// catalog position.
    pub fn from_catalog(catalog: &ThemeCatalog, current: Option<&str>) -> Self {
        let items = catalog
            .themes()
            .iter()
            .map(|descriptor| MenuItem {
                id: descriptor.id.clone(),
                label: descriptor.label.clone(),
                glyph: descriptor.glyph(),
                family: descriptor.family.clone(),
                checked: current == Some(descriptor.id.as_str()),
            })
            .collect();
        Self {
            items,
            phase: MenuPhase::Closed,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn phase(&self) -> &MenuPhase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, MenuPhase::Open { .. })
    }

    pub fn focused(&self) -> Option<usize> {
        match self.phase {
            MenuPhase::Open { focused } => focused,
            MenuPhase::Closed => None,
        }
    }

    /// Re-project the checkmark after the canonical selection moved.
    pub fn set_current(&mut self, id: &str) {
        for item in &mut self.items {
            item.checked = item.id == id;
        }
    }

    pub fn open(&mut self, focus_first: bool) {
        let focused = (focus_first && !self.items.is_empty()).then_some(0);
        self.phase = MenuPhase::Open { focused };
    }

    pub fn close(&mut self) {
        self.phase = MenuPhase::Closed;
    }

    pub fn focus_next(&mut self) {
        if let MenuPhase::Open { focused } = &mut self.phase {
            if self.items.is_empty() {
                return;
            }
            *focused = Some(match *focused {
                Some(index) => (index + 1) % self.items.len(),
                None => 0,
            });
        }
    }

    pub fn focus_prev(&mut self) {
        if let MenuPhase::Open { focused } = &mut self.phase {
            if self.items.is_empty() {
                return;
            }
            let len = self.items.len();
            *focused = Some(match *focused {
                Some(index) => (index + len - 1) % len,
                None => len - 1,
            });
        }
    }

    pub fn focus_home(&mut self) {
        if let MenuPhase::Open { focused } = &mut self.phase {
            if !self.items.is_empty() {
                *focused = Some(0);
            }
        }
    }

    pub fn focus_end(&mut self) {
        if let MenuPhase::Open { focused } = &mut self.phase {
            if !self.items.is_empty() {
                *focused = Some(self.items.len() - 1);
            }
        }
    }

    /// Commit the focused row: move the checkmark, close, return the id.
    pub fn select_focused(&mut self) -> Option<String> {
        match self.phase {
            MenuPhase::Open {
                focused: Some(index),
            } => self.select_at(index),
            _ => None,
        }
    }

    /// Commit a row by index (the pointer path).
    pub fn select_at(&mut self, index: usize) -> Option<String> {
        if !self.is_open() {
            return None;
        }
        let id = self.items.get(index)?.id.clone();
        self.set_current(&id);
        self.phase = MenuPhase::Closed;
        Some(id)
    }
}

enum DisplayRow {
    FamilyHeader(String),
    Item(usize),
}

/// The dropdown component. Mounted means open; unmounting closes it.
///
/// Rendering records where each row landed so pointer events can be
/// hit-tested; anything outside the menu area dismisses without selecting.
pub struct ThemeMenu {
    props: Props,
    machine: MenuMachine,
    area: Rect,
    row_rects: Vec<(usize, Rect)>,
    is_mounted: bool,
}

impl ThemeMenu {
    pub fn new(catalog: &ThemeCatalog, current: Option<&str>, focus_first: bool) -> Self {
        let mut machine = MenuMachine::from_catalog(catalog, current);
        machine.open(focus_first);
        Self {
            props: Props::default(),
            machine,
            area: Rect::default(),
            row_rects: Vec::new(),
            is_mounted: false,
        }
    }

    /// Footprint of the open overlay for this catalog: every family header
    /// and item row plus borders, wide enough for the longest line. The view
    /// clamps this against whatever space it actually gets.
    pub fn overlay_size(catalog: &ThemeCatalog) -> (u16, u16) {
        let rows = catalog.len() as u16 + catalog.families().len() as u16;
        let height = rows.saturating_add(2);
        let widest = catalog
            .themes()
            .iter()
            .map(|descriptor| {
                Span::raw(format!("   {} {}  ", descriptor.glyph(), descriptor.label)).width()
                    as u16
            })
            .max()
            .unwrap_or(0);
        (widest.max(28).saturating_add(2), height)
    }

    fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::new();
        let mut last_family: Option<&str> = None;
        for (index, item) in self.machine.items().iter().enumerate() {
            if last_family != Some(item.family.as_str()) {
                rows.push(DisplayRow::FamilyHeader(item.family.clone()));
                last_family = Some(item.family.as_str());
            }
            rows.push(DisplayRow::Item(index));
        }
        rows
    }

    fn item_line(&self, index: usize) -> Line<'static> {
        let item = &self.machine.items()[index];
        let marker = if item.checked { "✔" } else { " " };
        let focused = self.machine.focused() == Some(index);
        let style = if focused {
            Style::default()
                .fg(ThemePainter::background())
                .bg(ThemePainter::accent())
        } else if item.checked {
            Style::default()
                .fg(ThemePainter::accent_alt())
                .bg(ThemePainter::overlay())
        } else {
            Style::default()
                .fg(ThemePainter::text())
                .bg(ThemePainter::overlay())
        };
        Line::from(Span::styled(
            format!(" {marker} {} {}", item.glyph, item.label),
            style,
        ))
    }

    fn navigation_keys(&self) -> (char, char) {
        let keys = config::get_config_or_panic().keys();
        (keys.down(), keys.up())
    }
}

impl MockComponent for ThemeMenu {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ThemePainter::accent()))
            .title(" Themes ")
            .style(Style::default().bg(ThemePainter::overlay()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = self.display_rows();
        let visible = inner.height as usize;

        // Keep the focused row inside the window when the list overflows.
        let offset = if rows.len() <= visible || visible == 0 {
            0
        } else {
            let focus_pos = self
                .machine
                .focused()
                .and_then(|index| {
                    rows.iter().position(
                        |row| matches!(row, DisplayRow::Item(candidate) if *candidate == index),
                    )
                })
                .unwrap_or(0);
            focus_pos
                .saturating_sub(visible.saturating_sub(1))
                .min(rows.len() - visible)
        };

        self.row_rects.clear();
        for (slot, row) in rows.iter().skip(offset).take(visible).enumerate() {
            let row_rect = Rect::new(inner.x, inner.y + slot as u16, inner.width, 1);
            match row {
                DisplayRow::FamilyHeader(family) => {
                    frame.render_widget(
                        Paragraph::new(Line::from(Span::styled(
                            format!(" {family}"),
                            Style::default()
                                .fg(ThemePainter::muted())
                                .bg(ThemePainter::overlay())
                                .add_modifier(TextModifiers::BOLD),
                        ))),
                        row_rect,
                    );
                }
                DisplayRow::Item(index) => {
                    frame.render_widget(Paragraph::new(self.item_line(*index)), row_rect);
                    self.row_rects.push((*index, row_rect));
                }
            }
        }
        self.area = area;
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        match self.machine.focused() {
            Some(index) => State::One(StateValue::Usize(index)),
            None => State::None,
        }
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for ThemeMenu {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        let (down_key, up_key) = self.navigation_keys();
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Down, ..
            }) => {
                self.machine.focus_next();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent { code: Key::Up, .. }) => {
                self.machine.focus_prev();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Char(c),
                modifiers: KeyModifiers::NONE,
            }) if c == down_key => {
                self.machine.focus_next();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Char(c),
                modifiers: KeyModifiers::NONE,
            }) if c == up_key => {
                self.machine.focus_prev();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Home, ..
            }) => {
                self.machine.focus_home();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent { code: Key::End, .. }) => {
                self.machine.focus_end();
                Some(Msg::ForceRedraw)
            }
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                modifiers: KeyModifiers::NONE,
            }) => match self.machine.select_focused() {
                Some(id) => Some(Msg::ThemeActivity(ThemeActivityMsg::ThemeChosen(id))),
                None => Some(Msg::ForceRedraw),
            },
            Event::Keyboard(KeyEvent { code: Key::Esc, .. }) => {
                self.machine.close();
                Some(Msg::ThemeActivity(ThemeActivityMsg::MenuClosed {
                    refocus: true,
                }))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                let hit = self
                    .row_rects
                    .iter()
                    .find(|(_, rect)| rect.contains(position))
                    .map(|(index, _)| *index);
                match hit {
                    Some(index) => match self.machine.select_at(index) {
                        Some(id) => Some(Msg::ThemeActivity(ThemeActivityMsg::ThemeChosen(id))),
                        None => Some(Msg::ForceRedraw),
                    },
                    // Clicks on the chrome stay inside the menu; anything
                    // past the border dismisses without selecting.
                    None if self.area.contains(position) => Some(Msg::ForceRedraw),
                    None => {
                        self.machine.close();
                        Some(Msg::ThemeActivity(ThemeActivityMsg::MenuClosed {
                            refocus: false,
                        }))
                    }
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollDown => {
                self.machine.focus_next();
                Some(Msg::ForceRedraw)
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollUp => {
                self.machine.focus_prev();
                Some(Msg::ForceRedraw)
            }
            _ => Some(Msg::ForceRedraw),
        }
    }
}

impl ComponentState for ThemeMenu {
    fn mount(&mut self) -> AppResult<()> {
        if self.is_mounted {
            log::warn!("ThemeMenu is already mounted");
            return Ok(());
        }
        log::debug!(
            "Mounting ThemeMenu with {} items, focused: {:?}",
            self.machine.items().len(),
            self.machine.focused()
        );
        self.is_mounted = true;
        Ok(())
    }
}
