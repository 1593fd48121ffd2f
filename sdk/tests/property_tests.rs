use proptest::prelude::*;
use sdk::errors::{AppError, AppErrorExt};
use sdk::types::{parse_interests, AdvisorRequest, UserProfile};

// User hints are static strings and never echo the underlying detail
proptest! {
    #[test]
    fn test_error_user_hint_completeness(detail in "[a-zA-Z0-9/ ._-]{8,40}") {
        let errs = vec![
            AppError::Persistence(detail.clone()),
            AppError::ExternalService(detail.clone()),
            AppError::Config(detail.clone()),
            AppError::InvalidField { field: "email", reason: detail.clone() },
        ];

        for err in errs {
            let hint = err.user_hint();
            prop_assert!(!hint.is_empty());
            prop_assert!(!hint.contains(&detail));
        }
    }
}

proptest! {
    #[test]
    fn test_parse_interests_drops_blanks(parts in prop::collection::vec("[a-z]{0,6}", 0..6)) {
        let raw = parts.join(" , ");
        let parsed = parse_interests(&raw);

        let expected: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn test_non_blank_prompt_is_kept(prompt in "[a-zA-Z?][a-zA-Z ?]{0,40}") {
        let profile = UserProfile {
            id: "id".into(),
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password_hash: String::new(),
            grade: None,
            interests: vec![],
            goals: None,
            created_at: 0,
        };
        let request = AdvisorRequest::new(profile, Some(&prompt));
        prop_assert_eq!(request.prompt, prompt);
    }
}
