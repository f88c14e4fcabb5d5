//! Driver profile, vehicle and earnings types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDocuments {
    #[serde(default, rename = "matrizVerificada")]
    pub registration_verified: bool,
    #[serde(default)]
    pub soat: bool,
    #[serde(default, rename = "revisionTecnica")]
    pub inspection_passed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "marca")]
    pub make: String,
    #[serde(rename = "modelo")]
    pub model: String,
    pub color: String,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "asientos")]
    pub seat_count: u32,
    #[serde(default, rename = "documentacion", skip_serializing_if = "Option::is_none")]
    pub documents: Option<VehicleDocuments>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDocuments {
    #[serde(default, rename = "ciVerificada")]
    pub id_card_verified: bool,
    #[serde(default, rename = "licenciaVerificada")]
    pub license_verified: bool,
    #[serde(default, rename = "antecedentesVerificados")]
    pub background_check_verified: bool,
}

/// Account standing shared by driver and passenger profiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
    #[serde(rename = "suspendido")]
    Suspended,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
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
    #[serde(default, rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "calificacion")]
    pub rating: f64,
    #[serde(default, rename = "verificado")]
    pub verified: bool,
    #[serde(default, rename = "estado")]
    pub status: AccountStatus,
    #[serde(default, rename = "vehiculo", skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
    #[serde(default, rename = "documentacion")]
    pub documents: DriverDocuments,
    #[serde(default, rename = "fondosDisponibles")]
    pub available_funds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_account: Option<String>,
    #[serde(default, rename = "racionalesCompletados")]
    pub completed_trips: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_account: Option<String>,
}

/// Application to become a driver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverRequest {
    #[serde(rename = "vehiculo")]
    pub vehicle: Vehicle,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRequestAccepted {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub driver_id: String,
}

/// Trip history page. Trip entries are passed through as the backend sends them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TripHistory {
    #[serde(default)]
    pub trips: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub total_earnings: f64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub this_month_earnings: f64,
    #[serde(default)]
    pub cancelled_trips: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::{AccountStatus, DriverProfile, Vehicle};
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn decodes_driver_profile() -> Result<()> {
        let profile: DriverProfile = serde_json::from_value(json!({
            "id": "d-1",
            "nombre": "María",
            "apellido": "González",
            "calificacion": 4.9,
            "verificado": true,
            "estado": "suspendido",
            "vehiculo": {
                "id": "v-1",
                "marca": "Toyota",
                "modelo": "Corolla",
                "color": "Blanco",
                "placa": "PBC1234",
                "asientos": 4,
                "documentacion": { "matrizVerificada": true, "soat": true, "revisionTecnica": false }
            },
            "documentacion": { "ciVerificada": true, "licenciaVerificada": true, "antecedentesVerificados": false },
            "fondosDisponibles": 127.5,
            "paypalAccount": "maria.g@paypal.com",
            "racionalesCompletados": 42
        }))?;

        assert_eq!(profile.status, AccountStatus::Suspended);
        let vehicle = profile.vehicle.unwrap_or_default();
        assert_eq!(vehicle.plate, "PBC1234");
        assert!(vehicle.documents.is_some_and(|docs| docs.soat && !docs.inspection_passed));
        assert!(!profile.documents.background_check_verified);
        assert_eq!(profile.completed_trips, 42);
        Ok(())
    }

    #[test]
    fn vehicle_request_omits_unknown_fields() -> Result<()> {
        let vehicle = Vehicle {
            make: "Kia".into(),
            model: "Rio".into(),
            color: "Rojo".into(),
            plate: "PCD5678".into(),
            seat_count: 4,
            ..Vehicle::default()
        };
        assert_eq!(
            serde_json::to_value(&vehicle)?,
            json!({ "marca": "Kia", "modelo": "Rio", "color": "Rojo", "placa": "PCD5678", "asientos": 4 })
        );
        Ok(())
    }
}
