//! Client library for the WasiGo university carpooling API: an HTTP client with
//! bearer authentication, typed endpoint wrappers, the session and verification
//! state machine, route guards and the command line front end built on them.

pub mod app_lib;
pub mod cli;
pub mod features;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
