//! Error types and handling
//!
//! This module provides the error taxonomy shared by every Compass component.
//! All errors implement the `AppErrorExt` trait which provides a user-facing
//! message.
//!
//! # Security
//!
//! User hints are static strings. They never echo:
//! - Secrets (API keys, session secrets, passwords)
//! - Which half of a credential pair was wrong
//! - Internal database or network details

use thiserror::Error;

/// Trait for Compass error extensions
///
/// This trait provides additional context for errors, including a message that
/// is safe to render into a page.
pub trait AppErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users.
    fn user_hint(&self) -> &str;
}

/// Main application error type
///
/// # Error Categories
///
/// - **Validation**: duplicate email, missing required field
/// - **Auth**: bad credentials, missing or expired session
/// - **ExternalService**: advisor API network or format errors
/// - **Persistence**: data store unavailable
/// - **Config**: invalid startup configuration
///
/// # Examples
///
/// ```
/// use sdk::errors::{AppError, AppErrorExt};
///
/// let error = AppError::InvalidCredentials;
/// assert_eq!(error.user_hint(), "Invalid email or password");
/// assert!(error.is_auth());
///
/// let expired = AppError::SessionExpired;
/// assert_eq!(expired.user_hint(), "Please log in to continue");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    // Validation errors
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Email already registered")]
    DuplicateEmail,

    // Auth errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session missing or expired")]
    SessionExpired,

    // External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    // Persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns true for the validation class of errors
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidField { .. } | Self::DuplicateEmail
        )
    }

    /// Returns true for the auth class of errors
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::SessionExpired)
    }
}

impl AppErrorExt for AppError {
    fn user_hint(&self) -> &str {
        match self {
            // Validation errors
            Self::MissingField(field) => match *field {
                "name" => "Please enter your name",
                "email" => "Please enter your email address",
                "password" => "Please choose a password",
                _ => "Please fill in all required fields",
            },
            Self::InvalidField { field, .. } => match *field {
                "email" => "Please enter a valid email address",
                "password" => "Password must be at least 8 characters",
                _ => "Please check the highlighted field",
            },
            Self::DuplicateEmail => "An account with that email already exists",

            // Auth errors, intentionally identical for both fields
            Self::InvalidCredentials => "Invalid email or password",
            Self::SessionExpired => "Please log in to continue",

            // Never shown by the advisor, which falls back instead
            Self::ExternalService(_) => "Advice service unavailable",

            Self::Persistence(_) => "Something went wrong. Please try again.",

            Self::Config(_) => "Check your config.toml file for errors",
        }
    }
}
