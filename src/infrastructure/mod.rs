//! Infrastructure layer providing external service integrations.
//!
//! This module contains the SQLite repository, configuration loading and
//! logging setup.

pub mod config;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use persistence::*;
