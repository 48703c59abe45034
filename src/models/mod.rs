//! Core data models for the presence analyzer.

mod presence;
mod weekday;

pub use presence::*;
pub use weekday::*;
