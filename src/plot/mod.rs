//! Terminal plotting.

pub mod ascii;

pub use ascii::{MIN_DIAL_SIZE, render_dial};
