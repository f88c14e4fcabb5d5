//! Email verification: the OTP endpoints and the advisory attempt counter the
//! session keeps between a failed confirmation and the next resend.

pub mod attempts;
pub mod client;
pub mod types;

pub use attempts::{AttemptCounter, CODE_TTL_MINUTES, MAX_CONFIRM_ATTEMPTS};
