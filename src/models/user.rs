//! Identity, profile and credential models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated account that owns documents.
///
/// Profiles are keyed by `uid`; every other collection is filtered on `email`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// User profile stored at `users/{uid}`.
///
/// Missing fields deserialize to empty values so validation, not the JSON
/// extractor, reports them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    #[serde(default)]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    /// Age in years
    #[serde(default, deserialize_with = "crate::models::lenient_number::deserialize")]
    #[validate(range(min = 1))]
    pub age: u32,
    /// Height in centimeters
    #[serde(default, deserialize_with = "crate::models::lenient_number::deserialize")]
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
}

/// Email/password pair submitted to the login and register forms.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks applied before a sign-in request.
    pub fn check_sign_in(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation("Please fill in all fields.".to_string()));
        }
        self.validate()
            .map_err(|_| AppError::Validation("Please enter a valid email.".to_string()))
    }

    /// Checks applied before a sign-up request.
    pub fn check_sign_up(&self) -> Result<(), AppError> {
        self.check_sign_in()?;
        validate_new_password(&self.password).map_err(|_| {
            AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ))
        })
    }
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_too_short"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_rejects_empty_name() {
        let profile = Profile {
            name: String::new(),
            age: 30,
            height: 170.0,
        };
        let err = profile.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_profile_rejects_zero_age_and_height() {
        let profile = Profile {
            name: "Ana".to_string(),
            age: 0,
            height: 0.0,
        };
        let err = profile.validate().unwrap_err();
        assert!(err.field_errors().contains_key("age"));
        assert!(err.field_errors().contains_key("height"));
    }

    #[test]
    fn test_profile_missing_fields_default_to_invalid() {
        let profile: Profile = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_reads_numbers_stored_as_strings() {
        let profile: Profile =
            serde_json::from_str(r#"{"name":"Ana","age":"30","height":"165.5"}"#).unwrap();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.height, 165.5);
        assert!(profile.validate().is_ok());

        let blank: Profile =
            serde_json::from_str(r#"{"name":"Ana","age":"","height":170}"#).unwrap();
        assert_eq!(blank.age, 0);
        assert_eq!(blank.height, 170.0);

        assert!(serde_json::from_str::<Profile>(r#"{"name":"Ana","age":"old"}"#).is_err());
    }

    #[test]
    fn test_credentials_checks() {
        assert!(Credentials::new("", "secret1").check_sign_in().is_err());
        assert!(Credentials::new("not-an-email", "secret1").check_sign_in().is_err());
        assert!(Credentials::new("ana@example.com", "secret1").check_sign_in().is_ok());

        assert!(Credentials::new("ana@example.com", "12345").check_sign_up().is_err());
        assert!(Credentials::new("ana@example.com", "123456").check_sign_up().is_ok());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("ana@example.com", "hunter22"));
        assert!(!debug.contains("hunter22"));
    }
}
