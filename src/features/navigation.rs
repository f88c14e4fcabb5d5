//! Sidebar entries filtered by the active role. Guests and users without a
//! mapped role see nothing.

use crate::features::auth::Role;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<&'static str>,
    #[serde(skip)]
    roles: &'static [Role],
}

const SIGNED_IN: &[Role] = &[Role::Passenger, Role::Driver, Role::Support, Role::Admin];
const RIDERS: &[Role] = &[Role::Passenger, Role::Driver];
const DRIVERS: &[Role] = &[Role::Driver];
const SUPPORT: &[Role] = &[Role::Support];
const STAFF: &[Role] = &[Role::Support, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];

const fn item(
    label: &'static str,
    path: &'static str,
    section: Option<&'static str>,
    roles: &'static [Role],
) -> MenuItem {
    MenuItem {
        label,
        path,
        section,
        roles,
    }
}

const MENU: &[MenuItem] = &[
    item("Inicio", "/dashboard", None, SIGNED_IN),
    item("Buscar Rutas", "/rutas", Some("Pasajero"), RIDERS),
    item("Mis Viajes", "/mis-viajes", Some("Pasajero"), RIDERS),
    item("Chats", "/chats", Some("Pasajero"), RIDERS),
    item("Crear Ruta", "/crear-ruta", Some("Conductor"), DRIVERS),
    item("Mis Rutas", "/mis-rutas", Some("Conductor"), DRIVERS),
    item("Validar OTP", "/validar-otp", Some("Conductor"), DRIVERS),
    item("Historial Viajes", "/historial-conductor", Some("Conductor"), DRIVERS),
    item("Mis Fondos", "/fondos", Some("Conductor"), DRIVERS),
    item("Tickets", "/tickets", Some("Soporte"), SUPPORT),
    item("Usuarios", "/usuarios", Some("Gestión"), STAFF),
    item("Solicitudes", "/solicitudes", Some("Gestión"), ADMINS),
    item("Transacciones", "/transacciones", Some("Gestión"), ADMINS),
    item("Auditoría", "/auditoria", Some("Gestión"), ADMINS),
    item("Mi Perfil", "/perfil", None, SIGNED_IN),
];

impl MenuItem {
    #[must_use]
    pub fn is_visible_to(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Entries visible to `role`, in sidebar order.
#[must_use]
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    MENU.iter()
        .filter(|item| item.is_visible_to(role))
        .copied()
        .collect()
}
