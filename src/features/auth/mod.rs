//! Authentication: the auth endpoints, the user and role model, the session
//! state machine and the guards and flows built on it.
//!
//! Views hold a `Session` and read `SessionSnapshot`s from it; nothing here is
//! global. The bearer token and a JSON snapshot of the user are persisted
//! through the `Storage` port so a later process can `restore` the session.

pub mod client;
pub mod flows;
pub mod forms;
pub mod gate;
pub mod guards;
pub mod roles;
pub mod state;
pub mod types;
pub mod user;

pub use gate::ConcurrencyPolicy;
pub use guards::{landing_after_login, landing_after_verification, GuardDecision, RouteGuard, View};
pub use roles::{BackendRole, Role};
pub use state::{Session, SessionError, SessionSnapshot, SessionState};
pub use user::{BackendUser, User, VerificationState};
