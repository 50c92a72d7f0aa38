use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;
use crate::validate::{is_valid_email, is_valid_url};

/// Request body for account registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar_url: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "must be a valid e-mail address"));
        }
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "must be at least 6 characters",
            ));
        }
        if let Some(url) = &self.avatar_url {
            if !is_valid_url(url) {
                errors.push(FieldError::new("avatarUrl", "must be a valid URL"));
            }
        }
        errors
    }
}

/// Request body for password authentication.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after successful authentication.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

/// Confirmation body for account creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub display_message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_validation_flags_short_password() {
        let req = RegisterRequest {
            name: "Jhon Doe".into(),
            email: "jhon@example.com".into(),
            password: "12345".into(),
            avatar_url: None,
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn register_validation_accepts_six_char_password() {
        let req = RegisterRequest {
            name: "Jhon Doe".into(),
            email: "jhon@example.com".into(),
            password: "123456".into(),
            avatar_url: None,
        };
        assert!(req.validate().is_empty());
    }

    #[test]
    fn register_validation_flags_malformed_avatar_url() {
        let req = RegisterRequest {
            name: "Jhon Doe".into(),
            email: "jhon@example.com".into(),
            password: "123456".into(),
            avatar_url: Some("not a url".into()),
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "avatarUrl");
    }

    #[test]
    fn register_validation_collects_all_fields() {
        let req = RegisterRequest {
            name: "x".into(),
            email: "bad".into(),
            password: "123".into(),
            avatar_url: Some("bad".into()),
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn profile_response_uses_camel_case() {
        let body = ProfileResponse {
            user: ProfileUser {
                id: Uuid::new_v4(),
                name: None,
                email: "jhon@example.com".into(),
                avatar_url: Some("https://example.com/a.png".into()),
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("avatarUrl"));
        assert!(json.contains("jhon@example.com"));
    }
}
