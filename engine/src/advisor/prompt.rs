//! Chat messages for the live advisor

use crate::llm::Message;
use sdk::types::UserProfile;

/// System persona sent with every live request
pub const PERSONA: &str = "You are a friendly, practical career advisor for students. \
Give specific, encouraging guidance that fits the student's grade level, interests and goals. \
Keep the answer to a few short paragraphs and end with one concrete next step.";

const NOT_AVAILABLE: &str = "N/A";

/// Profile summary block placed before the question
pub fn profile_summary(profile: &UserProfile) -> String {
    let interests = profile.interests_joined();
    format!(
        "Student profile:\n- Name: {}\n- Grade: {}\n- Interests: {}\n- Goals: {}",
        profile.name,
        profile.grade().unwrap_or(NOT_AVAILABLE),
        interests.as_deref().unwrap_or(NOT_AVAILABLE),
        profile.goals().unwrap_or(NOT_AVAILABLE),
    )
}

/// The `[system, user]` conversation for one advisor request
pub fn build_messages(profile: &UserProfile, prompt: &str) -> Vec<Message> {
    vec![
        Message::system(PERSONA),
        Message::user(format!(
            "{}\n\nQuestion: {}",
            profile_summary(profile),
            prompt
        )),
    ]
}
