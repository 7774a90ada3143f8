//! Error handling utilities
//!
//! One error enum for the whole studio plus the category used for reporting.

pub mod error;

pub use error::*;
