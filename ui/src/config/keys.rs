use serde::Deserialize;

/// Key bindings configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct KeyBindingsConfig {
    // Global keys
    key_quit: Option<char>,
    key_theme_menu: Option<char>,
    key_theme_select: Option<char>,

    // Navigation keys
    key_down: Option<char>,
    key_up: Option<char>,
}

impl KeyBindingsConfig {
    pub fn quit(&self) -> char {
        self.key_quit.unwrap_or('q')
    }

    pub fn theme_menu(&self) -> char {
        self.key_theme_menu.unwrap_or('t')
    }

    pub fn theme_select(&self) -> char {
        self.key_theme_select.unwrap_or('s')
    }

    pub fn down(&self) -> char {
        self.key_down.unwrap_or('j')
    }

    pub fn up(&self) -> char {
        self.key_up.unwrap_or('k')
    }
}
