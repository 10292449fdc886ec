//! Pokemon collection browser TUI
//!
//! Incrementally pages a remote `/pokemon` collection into a scrollable
//! roster, with a stat-radar detail overlay and login/registration screens.
//! This library exposes the modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod projection;
pub mod reducer;
pub mod state;
pub mod trigger;
