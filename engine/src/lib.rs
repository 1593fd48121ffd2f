//! Compass Engine Library
//!
//! This library provides the core functionality of Compass: the credential
//! and session stores, the advisor resolver and the web server.
//! It is used by both the main binary and integration tests.

/// Advisor resolver (live model with local template fallback)
pub mod advisor;

/// Password hashing and session token signing
pub mod auth;

/// CLI interface module
pub mod cli;

/// Configuration management module
pub mod config;

/// Database persistence module
pub mod db;

/// Command handlers module
pub mod handlers;

/// Chat-completion client abstraction
pub mod llm;

/// Web server, routes and pages
pub mod server;

/// Telemetry and Observability
pub mod telemetry;
