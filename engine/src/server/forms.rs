//! Typed request bodies, validated before they reach the stores or the advisor
//!
//! Every field defaults to empty so a missing field becomes a validation
//! message on the page rather than a 4xx from the extractor.

use sdk::errors::AppError;
use sdk::types::{normalize_email, parse_interests, NewUser};
use serde::Deserialize;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub grade: String,
    /// Comma-separated
    pub interests: String,
    pub goals: String,
}

impl RegisterForm {
    /// Check required fields and formats
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::MissingField("name"));
        }
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::MissingField("password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidField {
                field: "password",
                reason: format!("shorter than {} characters", MIN_PASSWORD_LEN),
            });
        }
        Ok(())
    }

    /// Convert a validated form into a store record
    pub fn to_new_user(&self, password_hash: String) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash,
            grade: optional(&self.grade),
            interests: parse_interests(&self.interests),
            goals: optional(&self.goals),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() {
            return Err(AppError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(AppError::MissingField("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdviceForm {
    pub prompt: Option<String>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::MissingField("email"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidField {
            field: "email",
            reason: "not an email address".to_string(),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            name: " Ana ".into(),
            email: "Ana@Example.com".into(),
            password: "correct horse".into(),
            grade: "10".into(),
            interests: "biology, art".into(),
            goals: "".into(),
        }
    }

    #[test]
    fn test_valid_form_converts() {
        let form = form();
        form.validate().unwrap();

        let user = form.to_new_user("hash".into());
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.grade.as_deref(), Some("10"));
        assert_eq!(user.interests, vec!["biology", "art"]);
        assert_eq!(user.goals, None);
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn test_missing_fields() {
        let mut f = form();
        f.name = "  ".into();
        assert!(matches!(f.validate(), Err(AppError::MissingField("name"))));

        let mut f = form();
        f.email = "".into();
        assert!(matches!(f.validate(), Err(AppError::MissingField("email"))));

        let mut f = form();
        f.password = "".into();
        assert!(matches!(f.validate(), Err(AppError::MissingField("password"))));
    }

    #[test]
    fn test_invalid_email_and_short_password() {
        for email in ["ana", "@example.com", "ana@", "a@b@c", "an a@example.com"] {
            let mut f = form();
            f.email = email.into();
            assert!(
                matches!(f.validate(), Err(AppError::InvalidField { field: "email", .. })),
                "accepted {:?}",
                email
            );
        }

        let mut f = form();
        f.password = "short".into();
        assert!(matches!(
            f.validate(),
            Err(AppError::InvalidField { field: "password", .. })
        ));
    }

    #[test]
    fn test_login_form_validation() {
        let empty = LoginForm::default();
        assert!(matches!(empty.validate(), Err(AppError::MissingField("email"))));

        let ok = LoginForm {
            email: "ana@example.com".into(),
            password: "x".into(),
        };
        ok.validate().unwrap();
    }
}
