//! Users and the registration/login payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::note::timestamp_now;
use crate::validation::{
    body_object, check_email, check_max_chars, check_min_chars, read_string, Presence,
    ValidationErrors,
};

/// Maximum length of a user's name and email, in characters.
pub const USER_FIELD_MAX_CHARS: usize = 255;

/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Canonical form of an email address: trimmed and lowercased.
///
/// Applied when a request is read, so storage lookups and the uniqueness
/// check never see two spellings of one address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated UUID.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated registration payload. The password is still in plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let body = body_object(body);
        let mut errors = ValidationErrors::new();

        let name = read_string(&body, "name", Presence::Required, &mut errors);
        if let Some(name) = &name {
            check_max_chars("name", name, USER_FIELD_MAX_CHARS, &mut errors);
        }

        let email = read_string(&body, "email", Presence::Required, &mut errors)
            .map(|email| normalize_email(&email));
        if let Some(email) = &email {
            check_email("email", email, &mut errors);
            check_max_chars("email", email, USER_FIELD_MAX_CHARS, &mut errors);
        }

        let password = read_string(&body, "password", Presence::Required, &mut errors);
        if let Some(password) = &password {
            check_min_chars("password", password, PASSWORD_MIN_CHARS, &mut errors);
        }

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(Self {
                name,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let body = body_object(body);
        let mut errors = ValidationErrors::new();

        let email = read_string(&body, "email", Presence::Required, &mut errors)
            .map(|email| normalize_email(&email));
        let password = read_string(&body, "password", Presence::Required, &mut errors);

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(Self { email, password }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new("Test User", "test@example.com", "$2b$04$secret");
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "Test User");
        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn register_accepts_valid_body() {
        let request = RegisterRequest::from_json(&json!({
            "name": "Test User",
            "email": "test@example.com",
            "password": "password"
        }))
        .unwrap();

        assert_eq!(request.email, "test@example.com");
        assert_eq!(request.password, "password");
    }

    #[test]
    fn register_reports_each_field() {
        let errors = RegisterRequest::from_json(&json!({
            "email": "not-an-email",
            "password": "short"
        }))
        .unwrap_err();

        assert_eq!(errors.get("name"), ["The name field is required."]);
        assert_eq!(
            errors.get("email"),
            ["The email field must be a valid email address."]
        );
        assert_eq!(
            errors.get("password"),
            ["The password field must be at least 8 characters."]
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginRequest::from_json(&json!({"email": "test@example.com"})).unwrap_err();

        assert!(errors.get("email").is_empty());
        assert_eq!(errors.get("password"), ["The password field is required."]);
    }

    #[test]
    fn emails_are_normalized_on_read() {
        let register = RegisterRequest::from_json(&json!({
            "name": "Test User",
            "email": " Test@Example.COM ",
            "password": "password"
        }))
        .unwrap();
        let login = LoginRequest::from_json(&json!({
            "email": "TEST@example.com",
            "password": "password"
        }))
        .unwrap();

        assert_eq!(register.email, "test@example.com");
        assert_eq!(login.email, "test@example.com");
    }
}
