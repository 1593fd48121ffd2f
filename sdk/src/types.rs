//! Domain types shared between the engine and its front ends

use serde::{Deserialize, Serialize};

/// Persisted student record plus authentication material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Normalized (trimmed, lower-cased) unique key
    pub email: String,
    /// Salted one-way hash, never the plaintext
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub grade: Option<String>,
    pub interests: Vec<String>,
    pub goals: Option<String>,
    pub created_at: i64,
}

impl UserProfile {
    /// Grade, if one was given and is not blank
    pub fn grade(&self) -> Option<&str> {
        non_blank(self.grade.as_deref())
    }

    /// Goals, if given and not blank
    pub fn goals(&self) -> Option<&str> {
        non_blank(self.goals.as_deref())
    }

    /// Interests joined with ", ", or `None` when there are none
    pub fn interests_joined(&self) -> Option<String> {
        if self.interests.is_empty() {
            None
        } else {
            Some(self.interests.join(", "))
        }
    }
}

/// Validated registration input, ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub grade: Option<String>,
    pub interests: Vec<String>,
    pub goals: Option<String>,
}

/// One advisor invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct AdvisorRequest {
    pub profile: UserProfile,
    pub prompt: String,
}

impl AdvisorRequest {
    /// Prompt used when the caller leaves it empty
    pub const DEFAULT_PROMPT: &'static str = "How should I plan my career?";

    /// Build a request, substituting the default prompt for a missing or blank one
    pub fn new(profile: UserProfile, prompt: Option<&str>) -> Self {
        let prompt = non_blank(prompt).unwrap_or(Self::DEFAULT_PROMPT).to_string();
        Self { profile, prompt }
    }
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Split a comma-separated interests field into trimmed, non-empty entries
pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
