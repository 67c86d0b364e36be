//! sales-core
//!
//! Business logic for the sales tracker: the aggregation engine, the record write
//! path, the list view state and the sales book that ties them to a record store.
//! Depends on sales-domain. No CLI, no terminal I/O, no file system access.

pub mod book;
pub mod engine;
pub mod error;
pub mod sale_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod view_state;

pub use book::*;
pub use engine::*;
pub use error::*;
pub use sale_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;
pub use view_state::*;

#[cfg(test)]
mod tests;
