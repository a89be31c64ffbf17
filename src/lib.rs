//! `shaft-align` library crate.
//!
//! The binary (`align`) is a thin wrapper around this library so that:
//!
//! - the solver is testable without spawning processes
//! - the calculation can be embedded in other front ends
//! - presentation (reports, dial, TUI) stays apart from the math

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod solver;
pub mod tui;
