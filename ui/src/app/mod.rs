//! # Application Module
//!
//! The model-view-update core of the themetty TUI: the model owns the
//! component tree and the theme runtime handle, updates turn component
//! messages into runtime calls and remounts, and the view lays the whole
//! thing out each frame.

/// Application startup, main loop, and shutdown
pub mod application_lifecycle;
/// Core application model and state structures
pub mod model;
/// Component remounting and popup management
pub mod remount;
/// Background task management and coordination
pub mod task_manager;
/// Message processing and state update logic
pub mod updates;
/// UI rendering and view composition
pub mod view;
