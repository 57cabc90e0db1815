// src/auth.rs
//! Registration and login. Field validation runs entirely client-side and
//! blocks the request; a session is stored only after a successful login.

use std::sync::Arc;
use tracing::info;

use crate::api::JobBoardApi;
use crate::error::{Error, Result};
use crate::session::{Session, SessionStore};
use crate::types::RegisterForm;

const PASSWORD_SPECIALS: &str = "!@#$%^&*";

pub struct AuthManager {
    api: Arc<dyn JobBoardApi>,
    session: Arc<dyn SessionStore>,
}

impl AuthManager {
    pub fn new(api: Arc<dyn JobBoardApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// Validates the form locally, then registers. Success does not create
    /// a session; the caller proceeds to login.
    pub async fn register(&self, form: &RegisterForm) -> Result<()> {
        validate_register(form)?;
        self.api.register(form).await?;
        info!("Registered {}", form.email);
        Ok(())
    }

    /// Stores the session only on a 2xx response. A rejected login leaves
    /// the store untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self.api.login(email, password).await?;
        let session = Session {
            token: response.token,
            user_id: response.user_id,
            role: response.role,
        };
        self.session.store(&session);
        info!("Logged in as {} ({})", email, session.role);
        Ok(session)
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.load()
    }
}

pub fn validate_register(form: &RegisterForm) -> Result<()> {
    validate_name("First name", &form.first_name)?;
    validate_name("Last name", &form.last_name)?;
    validate_email(&form.email)?;
    if form.country.trim().is_empty() {
        return Err(Error::validation("Please select a country"));
    }
    validate_password(&form.password)?;
    Ok(())
}

fn validate_name(label: &str, value: &str) -> Result<()> {
    if value.len() < 2 {
        return Err(Error::validation(format!(
            "{label} must be at least 2 characters long"
        )));
    }
    if value.len() > 50 {
        return Err(Error::validation(format!(
            "{label} must be less than 50 characters"
        )));
    }
    if !value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(Error::validation("Only letters and spaces are allowed"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let invalid = || Error::validation("Please enter a valid email address");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password_strength(password).0 < 5 {
        return Err(Error::validation(
            "Password must be at least 8 characters and include upper and lower case letters, \
             a number, and a special character (!@#$%^&*)",
        ));
    }
    Ok(())
}

/// Score 0-5 with the display label the register form shows.
pub fn password_strength(password: &str) -> (u8, &'static str) {
    let mut score = 0u8;
    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        score += 1;
    }

    let label = match score {
        0 | 1 => "Very Weak",
        2 => "Weak",
        3 => "Moderate",
        4 => "Strong",
        _ => "Very Strong",
    };
    (score, label)
}
