//! LLM Provider Abstraction Layer
//!
//! The advisor talks to language models through the `LLMProvider` trait. The
//! only production implementation is the OpenAI-compatible chat-completion
//! client in [`openai`]. Every failure is reported as an `LLMError` value so
//! callers decide how to degrade; nothing in this module panics on bad input
//! from the network.

use async_trait::async_trait;
use sdk::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod openai;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unexpected status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Response contained no message content")]
    EmptyContent,
}

impl From<LLMError> for AppError {
    fn from(err: LLMError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

/// Message in a chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// LLM Provider trait
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "openai")
    fn name(&self) -> &str;

    /// Send the conversation and return the first completion's text
    ///
    /// # Returns
    /// * `Ok(String)` - Non-empty completion content
    /// * `Err(LLMError)` - Transport, status, or payload failure
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
