//! Signed-in user as the client keeps it, and the backend shape it is built
//! from. The converted `User` is what gets persisted as the session snapshot.

use super::roles::Role;
use crate::features::drivers::types::Vehicle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email verification status. Anything other than exactly `VERIFICADO` on the
/// wire is treated as unverified, including other casings and padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationState {
    #[default]
    Unverified,
    Verified,
}

impl VerificationState {
    pub const VERIFIED_WIRE: &'static str = "VERIFICADO";
    pub const UNVERIFIED_WIRE: &'static str = "NO_VERIFICADO";

    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(Self::VERIFIED_WIRE) => VerificationState::Verified,
            _ => VerificationState::Unverified,
        }
    }

    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            VerificationState::Verified => Self::VERIFIED_WIRE,
            VerificationState::Unverified => Self::UNVERIFIED_WIRE,
        }
    }
}

impl From<String> for VerificationState {
    fn from(value: String) -> Self {
        Self::from_wire(Some(&value))
    }
}

impl From<VerificationState> for String {
    fn from(state: VerificationState) -> Self {
        state.as_wire().to_string()
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// User as returned by `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    pub id: String,
    #[serde(default, rename = "nombre")]
    pub first_name: String,
    #[serde(default, rename = "apellido")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "celular")]
    pub phone: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, rename = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado_verificacion: Option<String>,
    #[serde(default, rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BackendUser {
    #[must_use]
    pub fn verification_state(&self) -> VerificationState {
        VerificationState::from_wire(self.estado_verificacion.as_deref())
    }
}

/// Local user model owned by the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub display_alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
    /// Role string exactly as the backend sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_role: Option<String>,
    #[serde(default)]
    pub verification_state: VerificationState,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_vehicle: Option<Vehicle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_funds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verification_state == VerificationState::Verified
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn mark_verified(&mut self) {
        self.verification_state = VerificationState::Verified;
    }

    /// Demo affordance: switches the active role in place.
    pub fn switch_role(&mut self, role: Role) {
        if role == Role::Driver {
            self.display_alias = self.display_alias.replace("Pasajero", "Conductor");
        }
        self.role = role;
    }
}

impl From<BackendUser> for User {
    fn from(backend: BackendUser) -> Self {
        let verification_state = backend.verification_state();
        Self {
            role: Role::from_backend(backend.role.as_deref()),
            id: backend.id,
            email: backend.email,
            first_name: backend.first_name,
            last_name: backend.last_name,
            phone: backend.phone,
            display_alias: backend.alias,
            photo_url: backend.photo_url,
            backend_role: backend.role,
            verification_state,
            rating: backend.rating.unwrap_or_default().max(0.0),
            driver_vehicle: None,
            available_funds: None,
            created_at: backend.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendUser, Role, User, VerificationState};
    use anyhow::Result;
    use serde_json::json;

    fn backend_user(value: serde_json::Value) -> Result<BackendUser> {
        Ok(serde_json::from_value(value)?)
    }

    #[test]
    fn converts_backend_user() -> Result<()> {
        let backend = backend_user(json!({
            "id": "u-1",
            "nombre": "María",
            "apellido": "González",
            "email": "conductor@epn.edu.ec",
            "celular": "0987654321",
            "alias": "Conductor5432",
            "rol": "CONDUCTOR",
            "estadoVerificacion": "VERIFICADO",
            "calificacion": 4.9,
            "createdAt": "2024-05-01T10:00:00Z"
        }))?;

        let user = User::from(backend);
        assert_eq!(user.id, "u-1");
        assert_eq!(user.full_name(), "María González");
        assert_eq!(user.display_alias, "Conductor5432");
        assert_eq!(user.role, Role::Driver);
        assert_eq!(user.backend_role.as_deref(), Some("CONDUCTOR"));
        assert!(user.is_verified());
        assert!((user.rating - 4.9).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn missing_fields_default_safely() -> Result<()> {
        let user = User::from(backend_user(json!({ "id": "u-2", "calificacion": -3.0 }))?);

        assert_eq!(user.role, Role::Passenger);
        assert_eq!(user.verification_state, VerificationState::Unverified);
        assert!(user.rating.abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn verification_state_wire_values() {
        assert_eq!(
            VerificationState::from_wire(Some("VERIFICADO")),
            VerificationState::Verified
        );
        assert_eq!(
            VerificationState::from_wire(Some("NO_VERIFICADO")),
            VerificationState::Unverified
        );
        assert_eq!(
            VerificationState::from_wire(Some("PENDIENTE")),
            VerificationState::Unverified
        );
        for near_miss in ["verificado", "Verificado", " VERIFICADO ", "VERIFICADO\n", ""] {
            assert_eq!(
                VerificationState::from_wire(Some(near_miss)),
                VerificationState::Unverified,
                "{near_miss:?} must not count as verified"
            );
        }
        assert_eq!(VerificationState::from_wire(None), VerificationState::Unverified);
    }

    #[test]
    fn snapshot_roundtrip_keeps_state() -> Result<()> {
        let mut user = User::from(backend_user(json!({
            "id": "u-3",
            "alias": "Pasajero9201",
            "estadoVerificacion": "NO_VERIFICADO"
        }))?);
        user.mark_verified();

        let snapshot = serde_json::to_string(&user)?;
        assert!(snapshot.contains("\"verificationState\":\"VERIFICADO\""));

        let restored: User = serde_json::from_str(&snapshot)?;
        assert_eq!(restored, user);
        Ok(())
    }

    #[test]
    fn switch_role_to_driver_rewrites_alias() -> Result<()> {
        let mut user = User::from(backend_user(json!({
            "id": "u-4",
            "alias": "Pasajero9201",
            "rol": "PASAJERO"
        }))?);

        user.switch_role(Role::Driver);
        assert_eq!(user.role, Role::Driver);
        assert_eq!(user.display_alias, "Conductor9201");

        user.switch_role(Role::Support);
        assert_eq!(user.display_alias, "Conductor9201");
        Ok(())
    }
}
