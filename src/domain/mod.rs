//! # Domain Layer
//!
//! Teams, users and pull requests, together with the invariants that hold
//! for them regardless of storage or transport.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
