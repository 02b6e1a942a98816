//! Common utilities module
//!
//! Shared error type and result alias used by every editing stage.

pub mod error;

pub use error::{EditError, Result};
