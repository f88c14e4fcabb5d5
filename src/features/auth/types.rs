//! Request and response types for auth endpoints. Several of these carry
//! passwords or tokens, so their `Debug` output is redacted and they must never
//! be logged field by field.

use super::user::BackendUser;
use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[redacted]";

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "celular")]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterData")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &REDACTED)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest").finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest").finish_non_exhaustive()
    }
}

/// Login payload: bearer token plus the backend user.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "access_token")]
    pub access_token: String,
    pub user: BackendUser,
    #[serde(default)]
    pub expires_in: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &REDACTED)
            .field("user", &self.user)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    pub user: BackendUser,
}

/// Generic `{ message }` payload used by several endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::{AuthResponse, LoginCredentials, RegisterData, ResetPasswordRequest};
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn register_data_uses_backend_field_names() -> Result<()> {
        let data = RegisterData {
            first_name: "Carlos".into(),
            last_name: "Mendoza".into(),
            email: "carlos@epn.edu.ec".into(),
            phone: "0991234567".into(),
            password: "Abc123!".into(),
            confirm_password: "Abc123!".into(),
        };

        assert_eq!(
            serde_json::to_value(&data)?,
            json!({
                "nombre": "Carlos",
                "apellido": "Mendoza",
                "email": "carlos@epn.edu.ec",
                "celular": "0991234567",
                "password": "Abc123!",
                "confirmPassword": "Abc123!"
            })
        );
        Ok(())
    }

    #[test]
    fn reset_password_uses_camel_case() -> Result<()> {
        let request = ResetPasswordRequest {
            token: "tok".into(),
            new_password: "Nueva123!".into(),
        };
        assert_eq!(
            serde_json::to_value(&request)?,
            json!({ "token": "tok", "newPassword": "Nueva123!" })
        );
        Ok(())
    }

    #[test]
    fn auth_response_decodes_login_payload() -> Result<()> {
        let response: AuthResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "user": { "id": "1", "rol": "PASAJERO", "estadoVerificacion": "NO_VERIFICADO" },
            "expiresIn": "1d"
        }))?;

        assert_eq!(response.access_token, "jwt");
        assert_eq!(response.user.id, "1");
        assert_eq!(response.expires_in.as_deref(), Some("1d"));
        Ok(())
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = LoginCredentials {
            email: "test@epn.edu.ec".into(),
            password: "Abc123!".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("test@epn.edu.ec"));
        assert!(!rendered.contains("Abc123!"));
    }
}
