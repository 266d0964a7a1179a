//! Roster - Student Management System
//!
//! A terminal form for creating, viewing, updating and deleting student
//! records stored in a local SQLite database.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
