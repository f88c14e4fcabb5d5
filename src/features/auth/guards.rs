//! Route guard. Pure derived state: the decision is recomputed from the
//! current `SessionSnapshot` every time it changes. UX only; real access
//! control lives on the API.

use super::{
    roles::{BackendRole, Role},
    state::{SessionSnapshot, SessionState},
    user::User,
};
use serde::Serialize;
use std::fmt;

/// Screens the client can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Login,
    Verification,
    Dashboard,
    DriverDashboard,
    PassengerDashboard,
}

impl View {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            View::Home => "/",
            View::Login => "/login",
            View::Verification => "/verification",
            View::Dashboard => "/dashboard",
            View::DriverDashboard => "/driver/dashboard",
            View::PassengerDashboard => "/passenger/dashboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still restoring or a transition is in flight; render nothing yet.
    Pending,
    Redirect(View),
    Render,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteGuard {
    pub required_role: Option<Role>,
    pub requires_verification: bool,
}

impl RouteGuard {
    /// Any signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn verified() -> Self {
        Self {
            required_role: None,
            requires_verification: true,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    #[must_use]
    pub fn evaluate(&self, session: &SessionSnapshot) -> GuardDecision {
        if session.is_loading || session.state == SessionState::Restoring {
            return GuardDecision::Pending;
        }
        let Some(user) = session.user.as_ref().filter(|_| session.is_authenticated()) else {
            return GuardDecision::Redirect(View::Login);
        };
        if self.requires_verification && !user.is_verified() {
            return GuardDecision::Redirect(View::Verification);
        }
        if self.required_role.is_some_and(|role| role != user.role) {
            return GuardDecision::Redirect(View::Home);
        }
        GuardDecision::Render
    }
}

/// Where a successful login lands.
#[must_use]
pub fn landing_after_login(user: &User) -> View {
    if user.is_verified() {
        View::Dashboard
    } else {
        View::Verification
    }
}

/// Where a freshly verified user lands, chosen by the role the backend
/// assigned rather than the active one.
#[must_use]
pub fn landing_after_verification(user: &User) -> View {
    let backend_role = user
        .backend_role
        .as_deref()
        .and_then(|role| role.parse::<BackendRole>().ok());
    match backend_role {
        Some(BackendRole::Conductor) => View::DriverDashboard,
        _ => View::PassengerDashboard,
    }
}
