//! Local advice template
//!
//! Pure and deterministic: the same profile and prompt always produce the
//! same bytes. Used whenever the live advisor is disabled or fails.

use sdk::types::UserProfile;

/// Substituted for an empty interests list
pub const NO_INTERESTS: &str = "general studies";

/// Substituted for an empty goal
pub const NO_GOAL: &str = "exploring career options";

/// Substituted for an empty grade
pub const NO_GRADE: &str = "not specified";

/// Final line of every templated response
pub const CLOSING_LINE: &str = "Suggested action: choose one of these roles, talk to someone who does that job, and ask what a normal week looks like.";

const MAX_ROLES: usize = 3;

/// Interest keyword (lower-case) to an example role
const ROLE_KEYWORDS: &[(&str, &str)] = &[
    ("bio", "lab technician"),
    ("chem", "pharmacist"),
    ("physic", "research scientist"),
    ("math", "data analyst"),
    ("comput", "software developer"),
    ("program", "software developer"),
    ("coding", "software developer"),
    ("design", "art director"),
    ("art", "illustrator"),
    ("music", "sound engineer"),
    ("writ", "journalist"),
    ("histor", "archivist"),
    ("business", "entrepreneur"),
    ("econ", "financial analyst"),
    ("sport", "physical therapist"),
    ("health", "nurse"),
    ("medic", "nurse"),
    ("law", "paralegal"),
    ("environment", "conservation officer"),
    ("game", "level designer"),
    ("cook", "chef"),
];

/// Used when no interest matches a keyword
const GENERIC_ROLES: &[&str] = &[
    "project coordinator",
    "research assistant",
    "customer success specialist",
];

/// Last resort when every candidate role would repeat the interests text
const LAST_RESORT_ROLE: &str = "apprenticeship";

/// Render the templated advice for `profile` and `prompt`
pub fn render(profile: &UserProfile, prompt: &str) -> String {
    let interests = profile
        .interests_joined()
        .unwrap_or_else(|| NO_INTERESTS.to_string());
    let goal = profile.goals().unwrap_or(NO_GOAL);
    let grade = profile.grade().unwrap_or(NO_GRADE);
    let roles = example_roles(&profile.interests, &interests).join(", ");

    format!(
        "Hi {name}, based on your interests in {interests} and your goal \"{goal}\", here are a few ideas.\n\
         \n\
         Roles to look into: {roles}.\n\
         Grade level: {grade}\n\
         Your question: \"{prompt}\"\n\
         \n\
         {closing}",
        name = profile.name,
        interests = interests,
        goal = goal,
        roles = roles,
        grade = grade,
        prompt = prompt,
        closing = CLOSING_LINE,
    )
}

/// Pick 1 to 3 example roles for the interests
///
/// Roles containing the joined interests text are skipped so that text
/// appears only in the greeting.
fn example_roles(interests: &[String], joined: &str) -> Vec<&'static str> {
    let mut roles: Vec<&'static str> = Vec::new();

    for interest in interests {
        let lowered = interest.to_lowercase();
        let matched = ROLE_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, role)| *role);

        if let Some(role) = matched {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
    }

    if roles.is_empty() {
        roles.extend_from_slice(GENERIC_ROLES);
    }

    roles.retain(|role| !role.contains(joined));
    roles.truncate(MAX_ROLES);

    if roles.is_empty() {
        roles.push(LAST_RESORT_ROLE);
    }
    roles
}
