//! Seat bookings on a route.

use crate::app_lib::api::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pendiente",
            BookingStatus::Confirmed => "confirmado",
            BookingStatus::InProgress => "en_progreso",
            BookingStatus::Completed => "completado",
            BookingStatus::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pendiente" | "pending" => Ok(BookingStatus::Pending),
            "confirmado" | "confirmed" => Ok(BookingStatus::Confirmed),
            "en_progreso" | "in-progress" | "in_progress" => Ok(BookingStatus::InProgress),
            "completado" | "completed" => Ok(BookingStatus::Completed),
            "cancelado" | "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Route summary embedded in a booking.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookedRoute {
    pub id: String,
    #[serde(default, rename = "origen")]
    pub origin: String,
    #[serde(default, rename = "destino")]
    pub destination: String,
    #[serde(default, rename = "horariosalida")]
    pub departure: String,
    #[serde(default, rename = "precio")]
    pub price: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default, rename = "nombre")]
    pub first_name: String,
    #[serde(default, rename = "apellido")]
    pub last_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(rename = "ruta")]
    pub route: BookedRoute,
    #[serde(default, rename = "conductor", skip_serializing_if = "Option::is_none")]
    pub driver: Option<Participant>,
    #[serde(default, rename = "pasajero", skip_serializing_if = "Option::is_none")]
    pub passenger: Option<Participant>,
    #[serde(default, rename = "asientoReservado")]
    pub seat: u32,
    #[serde(default, rename = "precio")]
    pub price: f64,
    #[serde(default, rename = "estado")]
    pub status: BookingStatus,
    #[serde(default, rename = "metodoPago")]
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingPage {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingList {
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateBooking {
    #[serde(rename = "rutaId")]
    pub route_id: String,
    #[serde(rename = "asiento", skip_serializing_if = "Option::is_none")]
    pub seat: Option<u32>,
    #[serde(rename = "metodoPago")]
    pub payment_method: String,
    #[serde(rename = "notasConductor", skip_serializing_if = "Option::is_none")]
    pub driver_notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CancelBooking {
    #[serde(rename = "razon")]
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct MyBookingsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<BookingStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for MyBookingsQuery {
    fn default() -> Self {
        Self {
            estado: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}
