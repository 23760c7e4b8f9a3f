// src/form.rs
use crate::error::{FormError, FormResult};

/// Raw values typed into the "new login" form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub service_name: String,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Checks fields in display order and reports the first problem.
    pub fn validate(&self) -> FormResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(FormError::ServiceNameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::EmailRequired);
        }
        // Checked on the raw value, which is what gets stored.
        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }
        if self.password.trim().is_empty() {
            return Err(FormError::PasswordRequired);
        }
        Ok(())
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
