//! sales-domain
//!
//! Pure domain models for the sales tracker (sale records, sale dates, chart points).
//! No I/O, no CLI, no storage. Only data types and the helpers that interpret them.

pub mod chart;
pub mod date;
pub mod record;

pub use chart::*;
pub use date::*;
pub use record::*;

// Re-export common dependencies so consumers can rely on this crate as a façade.
pub use chrono;
pub use serde;
