//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Storage (DuckDB on disk, in-memory for tests and throwaway runs)
//! - Clocks
//! - HTTP API (axum) and the CLI-facing controllers

pub mod adapter;
pub mod api;
pub mod http;

pub use adapter::*;
