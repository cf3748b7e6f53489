//! User account Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use validator::ValidateEmail;

use crate::serializer::{FieldErrors, Fields};

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const PASSWORD_MIN_LEN: usize = 8;

pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// User account (password hash is never part of this type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Admin flag; staff may change users and the menu
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    /// Group ids, loaded separately
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub groups: Vec<i64>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Public user representation of the users resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    /// Absolute URL of the user's detail route
    pub url: String,
    pub username: String,
    pub email: String,
    /// Group ids
    pub groups: Vec<i64>,
}

impl UserView {
    pub fn new(user: User, url: String) -> Self {
        Self {
            url,
            username: user.username,
            email: user.email,
            groups: user.groups,
        }
    }
}

/// Account summary returned by the registration endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub email: String,
    pub username: String,
    pub id: i64,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            id: user.id,
        }
    }
}

/// Validated users-resource payload
///
/// `email` and `groups` are optional: `None` means "leave unchanged" on
/// update and "empty" on create.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInput {
    pub username: String,
    pub email: Option<String>,
    pub groups: Option<Vec<i64>>,
}

impl UserInput {
    pub fn from_payload(payload: &Value, base: Option<&User>) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(payload, base.is_some())?;
        let username = username_field(&mut fields);
        let email = email_field(&mut fields);
        let groups = fields.pk_list("groups");

        let errors = fields.into_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        match username.or_else(|| base.map(|b| b.username.clone())) {
            Some(username) => Ok(Self {
                username,
                email,
                groups,
            }),
            None => Err(errors),
        }
    }
}

/// Self-service registration payload
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Registration {
    pub fn from_payload(payload: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(payload, false)?;
        let username = username_field(&mut fields);
        let email = email_field(&mut fields);
        let password = fields.char_field("password", PASSWORD_MAX_LEN);

        if let Some(password) = &password {
            for problem in password_problems(password, username.as_deref()) {
                fields.add_error("password", problem);
            }
        }

        let errors = fields.into_errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        match (username, password) {
            (Some(username), Some(password)) => Ok(Self {
                username,
                password,
                email: email.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

/// Login payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_payload(payload: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(payload, false)?;
        let username = fields.char_field("username", USERNAME_MAX_LEN);
        let password = fields.char_field("password", PASSWORD_MAX_LEN);

        let errors = fields.into_errors();
        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => {
                Ok(Self { username, password })
            }
            _ => Err(errors),
        }
    }
}

fn username_field(fields: &mut Fields<'_>) -> Option<String> {
    let username = fields.char_field("username", USERNAME_MAX_LEN)?;
    if !is_valid_username(&username) {
        fields.add_error("username", INVALID_USERNAME);
        return None;
    }
    Some(username)
}

fn email_field(fields: &mut Fields<'_>) -> Option<String> {
    let email = fields.blank_char_field("email", EMAIL_MAX_LEN)?;
    if !email.is_empty() && !email.validate_email() {
        fields.add_error("email", INVALID_EMAIL);
        return None;
    }
    Some(email)
}

/// Letters, digits and `@ . + - _`
pub fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Password strength problems, empty when acceptable
pub fn password_problems(password: &str, username: Option<&str>) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some(username) = username
        && password.to_lowercase() == username.to_lowercase()
    {
        problems.push("The password is too similar to the username.".to_string());
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("maria.lopez+staff@lemon"));
        assert!(!is_valid_username("maria lopez"));
        assert!(!is_valid_username("maria#1"));

        let errors = UserInput::from_payload(&json!({"username": "bad name"}), None).unwrap_err();
        assert_eq!(errors.get("username").unwrap(), [INVALID_USERNAME]);
    }

    #[test]
    fn test_email_may_be_blank_but_not_malformed() {
        let input = UserInput::from_payload(&json!({"username": "ana", "email": ""}), None).unwrap();
        assert_eq!(input.email.as_deref(), Some(""));

        let errors = UserInput::from_payload(&json!({"username": "ana", "email": "nope"}), None)
            .unwrap_err();
        assert_eq!(errors.get("email").unwrap(), [INVALID_EMAIL]);
    }

    #[test]
    fn test_user_input_groups_are_ids() {
        let input = UserInput::from_payload(&json!({"username": "ana", "groups": [1, "2"]}), None)
            .unwrap();
        assert_eq!(input.groups, Some(vec![1, 2]));

        let errors = UserInput::from_payload(&json!({"username": "ana", "groups": ["kitchen"]}), None)
            .unwrap_err();
        assert_eq!(
            errors.get("groups").unwrap(),
            ["Incorrect type. Expected pk value, received str."]
        );
    }

    #[test]
    fn test_user_input_optional_fields() {
        let input = UserInput::from_payload(&json!({"username": "ana"}), None).unwrap();
        assert_eq!(input.email, None);
        assert_eq!(input.groups, None);
    }

    #[test]
    fn test_registration_password_rules() {
        let errors = Registration::from_payload(&json!({"username": "ana", "password": "1234"}))
            .unwrap_err();
        let problems = errors.get("password").unwrap();
        assert!(problems.iter().any(|p| p.starts_with("This password is too short")));
        assert!(problems.iter().any(|p| p == "This password is entirely numeric."));

        let errors = Registration::from_payload(
            &json!({"username": "littlelemon", "password": "LittleLemon"}),
        )
        .unwrap_err();
        assert_eq!(
            errors.get("password").unwrap(),
            ["The password is too similar to the username."]
        );

        let ok = Registration::from_payload(
            &json!({"username": "ana", "password": "lemon-tree-42", "email": "ana@example.com"}),
        )
        .unwrap();
        assert_eq!(ok.email, "ana@example.com");
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let errors = Credentials::from_payload(&json!({"username": "ana"})).unwrap_err();
        assert_eq!(errors.get("password").unwrap(), ["This field is required."]);
    }
}
