//! Compass SDK
//!
//! Shared library providing the domain types and error taxonomy for Compass.
//! This crate is used by the engine and by anything that embeds it.

/// Error types and handling
pub mod errors;

/// Profile and advisor request types
pub mod types;

// Re-export commonly used types
pub use errors::{AppError, AppErrorExt};
pub use types::{normalize_email, parse_interests, AdvisorRequest, NewUser, UserProfile};
