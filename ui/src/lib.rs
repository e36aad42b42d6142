//! # Themetty UI Library
//!
//! Terminal theme switcher built with Ratatui and tui-realm. The binary
//! wraps the theme runtime crate in an interactive picker: a dropdown
//! select, an overlay menu, a live preview pane and a status bar, all
//! restyled in place when a palette lands.
//!
//! ## Modules
//!
//! - [`app`] - Main application logic and component orchestration
//! - [`components`] - UI components and message handling
//! - [`config`] - Configuration loading, validation and first-run setup
//! - [`error`] - Error types and centralized error reporting
//! - [`logger`] - Logging configuration
//! - [`terminal_caps`] - Terminal color-depth probe
//! - [`theme`] - Palette-to-style projection for rendering
//!
//! This library interface enables integration testing by providing access
//! to internal modules.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod terminal_caps;
pub mod theme;

// Re-export commonly used types for easier access in tests
pub use error::AppError;

// Re-export the Msg type that tests commonly need
pub use components::common::Msg;
