#![doc(test(attr(deny(warnings))))]

//! Sales Tracker records water-bottle sales, lists them by day and summarises
//! them into top-item and monthly revenue charts.
//!
//! The engine, write path and view state live in `sales-core`; this crate wires
//! them to a JSON store and a terminal shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Sales Tracker tracing initialized.");
    });
}
