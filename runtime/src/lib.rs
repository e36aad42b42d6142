//! # Themetty Runtime Library
//!
//! Core library for runtime theme switching in the terminal. It owns the
//! theme catalog, palette loading, persistence of the user's choice, and
//! the shared render surfaces the UI draws from.
//!
//! ## Modules
//!
//! - [`applier`] - Theme application: resolution, epochs, busy tracking
//! - [`assets`] - Palette sources and the base URL trust policy
//! - [`bundled`] - Catalog and palettes embedded in the binary
//! - [`catalog`] - The static theme registry
//! - [`error`] - Error codes, structured reports, and the reporter
//! - [`loader`] - Palette registry and fetch-with-deadline
//! - [`palette`] - Palette file format and color parsing
//! - [`persistence`] - Never-fails facade over the state store
//! - [`resolver`] - Pure theme id resolution
//! - [`store`] - State storage backends
//! - [`taskpool`] - Bounded task pool with one cancellation scope
//! - [`validation`] - Validation trait shared by input checks

pub mod applier;
pub mod assets;
pub mod bundled;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod palette;
pub mod persistence;
pub mod resolver;
pub mod store;
pub mod taskpool;
pub mod validation;

mod sync;
