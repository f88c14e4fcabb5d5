pub mod client;
pub mod dashboard;
pub mod types;

pub use dashboard::{load_driver_home, DriverHome};
