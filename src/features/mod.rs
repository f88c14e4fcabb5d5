pub mod auth;
pub mod bookings;
pub mod drivers;
pub mod navigation;
pub mod passengers;
pub mod ratings;
pub mod routes;
pub mod verification;
