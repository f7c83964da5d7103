//! Authentication primitives: login credentials and signup validation.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::form::FieldErrors;
use super::user::{FullName, UserValidationError, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use yatube::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" leo ", "password").unwrap();
/// assert_eq!(creds.username(), "leo");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw registration form values.
#[derive(Debug, Clone, Default)]
pub struct SignupRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
}

/// A validated registration, ready to be hashed and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    username: Username,
    name: FullName,
    email: Option<String>,
    password: Zeroizing<String>,
}

impl NewAccount {
    /// Validate a signup submission, collecting every field problem at once.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::{NewAccount, SignupRequest};
    ///
    /// let errors = NewAccount::try_from_request(&SignupRequest {
    ///     username: "leo",
    ///     password1: "12345678",
    ///     password2: "12345678",
    ///     ..SignupRequest::default()
    /// })
    /// .unwrap_err();
    /// assert!(!errors.get("password1").is_empty());
    /// ```
    pub fn try_from_request(request: &SignupRequest<'_>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = Username::new(request.username.trim())
            .map_err(|err| errors.add("username", err.to_string()))
            .ok();
        let name = FullName::new(request.first_name, request.last_name)
            .map_err(|err| record_name_error(&mut errors, &err))
            .ok();

        let email = request.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            errors.add("email", "enter a valid email address");
        }

        for problem in password_problems(request.password1) {
            errors.add("password1", problem);
        }
        if request.password1 != request.password2 {
            errors.add("password2", "the two password fields didn't match");
        }

        match (username, name) {
            (Some(username), Some(name)) if errors.is_empty() => Ok(Self {
                username,
                name,
                email: (!email.is_empty()).then(|| email.to_owned()),
                password: Zeroizing::new(request.password1.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Plain-text password; only the hasher should read this.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn record_name_error(errors: &mut FieldErrors, err: &UserValidationError) {
    errors.add("first_name", err.to_string());
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn password_problems(password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.is_empty() {
        problems.push("this field is required".to_owned());
        return problems;
    }
    if password.chars().count() < PASSWORD_MIN {
        problems.push(format!(
            "this password is too short; it must contain at least {PASSWORD_MIN} characters"
        ));
    }
    if password.chars().all(|ch| ch.is_ascii_digit()) {
        problems.push("this password is entirely numeric".to_owned());
    }
    problems
}
