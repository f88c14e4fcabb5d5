//! Form payloads as the user enters them, with the checks that must pass
//! before anything is sent. Checks run in the order the fields appear and the
//! first failure is reported.

use super::types::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginCredentials, RegisterData,
    ResetPasswordRequest,
};
use crate::app_lib::validation::{
    require, validate_confirmation, validate_email, validate_name,
    validate_password_length, validate_password_strength, validate_phone, ValidationError,
};
use std::fmt;

#[derive(Clone, Debug)]
pub struct LoginForm {
    pub credentials: LoginCredentials,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            credentials: LoginCredentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            },
        }
    }

    /// # Errors
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.credentials.email)?;
        validate_password_length(&self.credentials.password)
    }
}

#[derive(Clone, Debug)]
pub struct RegisterForm {
    pub data: RegisterData,
    pub accepts_terms: bool,
}

impl RegisterForm {
    /// # Errors
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let data = &self.data;
        validate_name("First name", &data.first_name)?;
        validate_name("Last name", &data.last_name)?;
        validate_email(&data.email)?;
        require("Phone", &data.phone)?;
        validate_phone(&data.phone)?;
        validate_confirmation(&data.password, &data.confirm_password)?;
        validate_password_strength(&data.password)?;
        if !self.accepts_terms {
            return Err(ValidationError::Terms);
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ForgotPasswordForm {
    pub request: ForgotPasswordRequest,
}

impl ForgotPasswordForm {
    #[must_use]
    pub fn new(email: &str) -> Self {
        Self {
            request: ForgotPasswordRequest {
                email: email.trim().to_string(),
            },
        }
    }

    /// # Errors
    /// Returns `ValidationError::EmailDomain` for non-institutional addresses.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.request.email)
    }
}

#[derive(Clone)]
pub struct ResetPasswordForm {
    pub request: ResetPasswordRequest,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// # Errors
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Token", &self.request.token)?;
        validate_password_length(&self.request.new_password)?;
        validate_confirmation(&self.request.new_password, &self.confirm_password)
    }
}

#[derive(Clone)]
pub struct ChangePasswordForm {
    pub request: ChangePasswordRequest,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// # Errors
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Current password", &self.request.current_password)?;
        validate_password_strength(&self.request.new_password)?;
        validate_confirmation(&self.request.new_password, &self.confirm_password)
    }
}

impl fmt::Debug for ResetPasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordForm").finish_non_exhaustive()
    }
}

impl fmt::Debug for ChangePasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordForm").finish_non_exhaustive()
    }
}
