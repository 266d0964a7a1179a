//! Application layer managing state and user workflows.
//!
//! This module sits between the domain and the presentation layer: it owns
//! the form, focus and dialogs, and applies repository results to them.

pub mod state;

pub use state::*;
