use serde::{Deserialize, Serialize};

/// Which side of the trip is being rated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingKind {
    #[serde(rename = "pasajero")]
    Passenger,
    #[serde(rename = "conductor")]
    Driver,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedUser {
    pub id: String,
    #[serde(default, rename = "nombre")]
    pub first_name: String,
    #[serde(default, rename = "apellido")]
    pub last_name: String,
    #[serde(default)]
    pub alias: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedTrip {
    pub id: String,
    #[serde(default, rename = "origen")]
    pub origin: String,
    #[serde(default, rename = "destino")]
    pub destination: String,
    #[serde(default, rename = "fecha")]
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    #[serde(rename = "de")]
    pub from: RatedUser,
    #[serde(rename = "para")]
    pub to: RatedUser,
    #[serde(rename = "viaje")]
    pub trip: RatedTrip,
    #[serde(rename = "calificacion")]
    pub score: f64,
    #[serde(default, rename = "comentario", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: RatingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RatingPage {
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRating {
    #[serde(rename = "viajeId")]
    pub trip_id: String,
    #[serde(rename = "calificacion")]
    pub score: u8,
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: RatingKind,
}

/// Partial update; unset fields are left as they are.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateRating {
    #[serde(rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageRating {
    #[serde(default, rename = "promedio")]
    pub average: f64,
    #[serde(default)]
    pub total: u64,
}
