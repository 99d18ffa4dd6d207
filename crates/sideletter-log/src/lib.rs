//! Side Letter Interaction Log
//!
//! In-memory, fixed-capacity history of answered questions.
//!
//! # Overview
//!
//! Every interaction that produced a context-backed answer is appended here by
//! the orchestrator. The log keeps the most recent records (1000 by default),
//! silently evicting the oldest, and supports:
//!
//! - **append**: assign the next id and store the record
//! - **list**: newest-first pagination
//! - **get**: lookup by id among retained records
//! - **export**: JSON, CSV or plain-text snapshot
//!
//! All operations are safe to call from many threads at once; each runs as a
//! single critical section. Nothing survives a process restart.

#![warn(missing_docs)]

mod error;
pub mod export;
mod history;

pub use error::LogError;
pub use export::{render, Export, ExportFormat};
pub use history::{
    InteractionLog, LogPage, DEFAULT_CAPACITY, DEFAULT_PAGE_LIMIT, MAX_EXPORT_LIMIT,
    MAX_PAGE_LIMIT,
};
