//! Role vocabulary. The backend speaks `ADMIN`, `SOPORTE`, `CONDUCTOR` and
//! `PASAJERO`; the client navigates and guards on `Role`. The mapping between the
//! two lives here and nowhere else.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    User,
    Passenger,
    Driver,
    Support,
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Guest,
        Role::User,
        Role::Passenger,
        Role::Driver,
        Role::Support,
        Role::Admin,
    ];

    /// Maps the backend role string. Unknown roles become `Role::User`; a
    /// missing or empty role is a regular passenger account.
    #[must_use]
    pub fn from_backend(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => BackendRole::Pasajero.into(),
            Some(raw) => raw
                .parse::<BackendRole>()
                .map_or(Role::User, Role::from),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Passenger => "passenger",
            Role::Driver => "driver",
            Role::Support => "support",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown role: {value}"))
    }
}

/// Roles as named by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackendRole {
    Admin,
    Soporte,
    Conductor,
    Pasajero,
}

impl BackendRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackendRole::Admin => "ADMIN",
            BackendRole::Soporte => "SOPORTE",
            BackendRole::Conductor => "CONDUCTOR",
            BackendRole::Pasajero => "PASAJERO",
        }
    }
}

impl FromStr for BackendRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(BackendRole::Admin),
            "SOPORTE" => Ok(BackendRole::Soporte),
            "CONDUCTOR" => Ok(BackendRole::Conductor),
            "PASAJERO" => Ok(BackendRole::Pasajero),
            other => Err(format!("unknown backend role: {other}")),
        }
    }
}

impl From<BackendRole> for Role {
    fn from(role: BackendRole) -> Self {
        match role {
            BackendRole::Admin => Role::Admin,
            BackendRole::Soporte => Role::Support,
            BackendRole::Conductor => Role::Driver,
            BackendRole::Pasajero => Role::Passenger,
        }
    }
}
