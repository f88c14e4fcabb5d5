//! Route (published trip) types. Wire names follow the backend's Spanish
//! schema; Rust names are English.

use crate::{app_lib::api::DEFAULT_PAGE_SIZE, features::drivers::types::Vehicle};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "salida")]
    pub departure: String,
    #[serde(default, rename = "llegadaEstimada", skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteStatus {
    #[default]
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl RouteStatus {
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            RouteStatus::Available => "disponible",
            RouteStatus::InProgress => "en_progreso",
            RouteStatus::Completed => "completado",
            RouteStatus::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for RouteStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disponible" | "available" => Ok(RouteStatus::Available),
            "en_progreso" | "in-progress" | "in_progress" => Ok(RouteStatus::InProgress),
            "completado" | "completed" => Ok(RouteStatus::Completed),
            "cancelado" | "cancelled" => Ok(RouteStatus::Cancelled),
            other => Err(format!("unknown route status: {other}")),
        }
    }
}

/// Driver as embedded in a route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDriver {
    pub id: String,
    #[serde(default, rename = "nombre")]
    pub first_name: String,
    #[serde(default, rename = "apellido")]
    pub last_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, rename = "calificacion")]
    pub rating: f64,
    #[serde(default, rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "vehiculo", skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    #[serde(rename = "origen")]
    pub origin: Location,
    #[serde(rename = "destino")]
    pub destination: Location,
    #[serde(rename = "horario")]
    pub schedule: Schedule,
    #[serde(default, rename = "conductor", skip_serializing_if = "Option::is_none")]
    pub driver: Option<RouteDriver>,
    #[serde(default, rename = "asientosDisponibles")]
    pub available_seats: u32,
    #[serde(default, rename = "asientosTotales")]
    pub total_seats: u32,
    #[serde(default, rename = "precioBase")]
    pub base_price: f64,
    #[serde(default, rename = "precio")]
    pub price: f64,
    #[serde(default, rename = "estado")]
    pub status: RouteStatus,
    #[serde(default, rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One page of routes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoutePage {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub total: u64,
}

/// Routes without a total, as `/routes/nearby` and `/routes/match` return them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteList {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewSchedule {
    #[serde(rename = "salida")]
    pub departure: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRoute {
    #[serde(rename = "origen")]
    pub origin: Location,
    #[serde(rename = "destino")]
    pub destination: Location,
    #[serde(rename = "horario")]
    pub schedule: NewSchedule,
    #[serde(rename = "asientos")]
    pub seats: u32,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateRoute {
    #[serde(rename = "asientos", skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<RouteStatus>,
}

/// Query for `/routes/search`; unset filters are left out of the URL.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchRoutes {
    #[serde(rename = "origen", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "destino", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "fechaSalida", skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(rename = "asientos", skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(rename = "precioMax", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct MyRoutesQuery {
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub estado: Option<RouteStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for MyRoutesQuery {
    fn default() -> Self {
        Self {
            estado: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct NearbyQuery {
    pub latitud: f64,
    pub longitud: f64,
    pub radio: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchQuery {
    pub origen_latitud: f64,
    pub origen_longitud: f64,
    pub destino_latitud: f64,
    pub destino_longitud: f64,
}

/// Origin/destination pair for `/routes/match`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct CancelReason {
    #[serde(rename = "razon", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteStatus};
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn decodes_route() -> Result<()> {
        let route: Route = serde_json::from_value(json!({
            "id": "r-1",
            "origen": { "direccion": "EPN", "latitud": -0.2105, "longitud": -78.4889 },
            "destino": { "direccion": "Cumbayá", "latitud": -0.2, "longitud": -78.43 },
            "horario": { "salida": "2024-06-01T07:30:00Z", "llegadaEstimada": "2024-06-01T08:00:00Z" },
            "conductor": {
                "id": "d-1",
                "nombre": "María",
                "apellido": "González",
                "alias": "Conductor5432",
                "calificacion": 4.9,
                "vehiculo": { "marca": "Toyota", "modelo": "Corolla", "color": "Blanco", "placa": "PBC1234", "asientos": 4 }
            },
            "asientosDisponibles": 3,
            "asientosTotales": 4,
            "precioBase": 1.5,
            "precio": 2.0,
            "estado": "en_progreso"
        }))?;

        assert_eq!(route.origin.address, "EPN");
        assert_eq!(route.status, RouteStatus::InProgress);
        assert_eq!(route.available_seats, 3);
        assert_eq!(
            route.driver.and_then(|driver| driver.vehicle).map(|vehicle| vehicle.seat_count),
            Some(4)
        );
        Ok(())
    }

    #[test]
    fn status_parses_both_vocabularies() {
        assert_eq!("disponible".parse(), Ok(RouteStatus::Available));
        assert_eq!("cancelled".parse(), Ok(RouteStatus::Cancelled));
        assert!("paused".parse::<RouteStatus>().is_err());
        assert_eq!(RouteStatus::InProgress.to_string(), "en_progreso");
    }
}
