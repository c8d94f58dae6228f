//! `calendar-features` library crate.
//!
//! The binary (`calfeat`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the feature steps can be reused from other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
