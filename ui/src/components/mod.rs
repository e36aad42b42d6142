// Core components
pub mod common;
pub mod state;

// Selection controls
pub mod theme_menu;
pub mod theme_select;

// Popup components
pub mod error_popup;
pub mod warning_popup;

// Display components
pub mod help_bar;
pub mod preview;
pub mod status_bar;

// System components
pub mod global_key_watcher;
