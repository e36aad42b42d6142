use crate::components::common::{Msg, ThemeActivityMsg};
use crate::config;
use tui_realm_stdlib::Phantom;
use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::{Component, Event, MockComponent, NoUserEvent};

/// Invisible component subscribed to every event; owns the app-wide keys.
///
/// Keyboard menu activation goes through here so it works no matter which
/// component holds focus. The update loop decides whether a toggle is
/// currently allowed (popups suppress it).
#[derive(MockComponent, Default)]
pub struct GlobalKeyWatcher {
    component: Phantom,
}

impl Component<Msg, NoUserEvent> for GlobalKeyWatcher {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Char(c),
                modifiers: KeyModifiers::NONE,
            }) => {
                let keys = config::get_config_or_panic().keys();
                if c == keys.quit() {
                    Some(Msg::AppClose)
                } else if c == keys.theme_menu() {
                    Some(Msg::ThemeActivity(ThemeActivityMsg::MenuToggleRequested {
                        focus_first: true,
                    }))
                } else if c == keys.theme_select() {
                    Some(Msg::ThemeActivity(ThemeActivityMsg::SelectFocusRequested))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
