use crate::features::drivers::types::AccountStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    #[serde(rename = "tarjeta")]
    Card,
    #[serde(rename = "paypal")]
    Paypal,
    #[serde(rename = "billetera")]
    Wallet,
}

impl PaymentKind {
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            PaymentKind::Card => "tarjeta",
            PaymentKind::Paypal => "paypal",
            PaymentKind::Wallet => "billetera",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tarjeta" | "card" => Ok(PaymentKind::Card),
            "paypal" => Ok(PaymentKind::Paypal),
            "billetera" | "wallet" => Ok(PaymentKind::Wallet),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Masked payment method shown on the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    #[serde(rename = "tipo")]
    pub kind: PaymentKind,
    #[serde(default, rename = "ultimosCuatroDigitos")]
    pub last_four: String,
}

/// Payment method as submitted; `details` is provider specific.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPaymentMethod {
    #[serde(rename = "tipo")]
    pub kind: PaymentKind,
    #[serde(rename = "detalles")]
    pub details: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerProfile {
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
    #[serde(default, rename = "fondosDisponibles")]
    pub available_funds: f64,
    #[serde(default, rename = "metodoPago", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentSummary>,
    #[serde(default, rename = "viajesTotales")]
    pub total_trips: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdatePassengerProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "celular", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "metodoPago", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<NewPaymentMethod>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerStats {
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub this_month_spent: f64,
    #[serde(default)]
    pub cancelled_trips: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodAdded {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub payment_method_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default, rename = "fondosDisponibles")]
    pub available_funds: f64,
    #[serde(default, rename = "moneda")]
    pub currency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recharge {
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "metodoPago")]
    pub payment_method: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RechargeReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "nuevoSaldo")]
    pub new_balance: f64,
}
