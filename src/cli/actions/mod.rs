//! One handler module per subcommand group. Every handler opens the persisted
//! session, checks the route guard of the screen it stands in for, runs its
//! calls under the Ctrl-C token and prints the result as JSON on stdout.

pub mod account;
pub mod bookings;
pub mod driver;
pub mod passenger;
pub mod ratings;
pub mod routes;
pub mod verify;

use crate::{
    app_lib::{cancellable, ApiError, ApiResponse, PageQuery},
    cli::globals::GlobalArgs,
    features::{
        auth::{GuardDecision, RouteGuard, Session, User, View},
        bookings::types::BookingStatus,
        passengers::types::PaymentKind,
        routes::types::{RouteStatus, SearchRoutes},
    },
};
use anyhow::{anyhow, bail, Result};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum Action {
    Account(AccountAction),
    Verify(VerifyAction),
    Routes(RoutesAction),
    Bookings(BookingsAction),
    Ratings(RatingsAction),
    Driver(DriverAction),
    Passenger(PassengerAction),
}

#[derive(Debug)]
pub enum AccountAction {
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Whoami,
    Register {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        password: SecretString,
        confirm_password: SecretString,
        accepts_terms: bool,
        code_from_stdin: bool,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: SecretString,
        password: SecretString,
        confirm_password: SecretString,
    },
    ChangePassword {
        current: SecretString,
        new: SecretString,
        confirm_password: SecretString,
    },
}

#[derive(Debug)]
pub enum VerifyAction {
    Send,
    Confirm { code: String },
    Attempts,
}

#[derive(Debug)]
pub enum RoutesAction {
    Search(SearchRoutes),
    Show {
        id: String,
    },
    Mine {
        status: Option<RouteStatus>,
        page: PageQuery,
    },
    Nearby {
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    },
    Cancel {
        id: String,
        reason: Option<String>,
    },
}

#[derive(Debug)]
pub enum BookingsAction {
    Mine {
        status: Option<BookingStatus>,
        page: PageQuery,
    },
    Show {
        id: String,
    },
    Create {
        route_id: String,
        payment: PaymentKind,
        seat: Option<u32>,
        notes: Option<String>,
    },
    Cancel {
        id: String,
        reason: String,
    },
    Active,
}

#[derive(Debug)]
pub enum RatingsAction {
    Received(PageQuery),
    Given(PageQuery),
    Average { user_id: String },
}

#[derive(Debug)]
pub enum DriverAction {
    Home,
    Profile,
    Stats,
    Availability { set: Option<bool> },
}

#[derive(Debug)]
pub enum PassengerAction {
    Profile,
    Balance,
    Stats,
}

/// Restored session plus the token that aborts in-flight work on Ctrl-C.
pub struct Context {
    pub session: Session,
    pub cancel: CancellationToken,
}

impl Context {
    /// Opens the persisted session described by `globals`.
    ///
    /// # Errors
    /// Returns an error if no storage directory is available or the HTTP
    /// client cannot be built.
    pub fn open(globals: &GlobalArgs, cancel: CancellationToken) -> Result<Self> {
        let session = Session::from_config(&globals.config, globals.storage()?)?;
        let state = session.restore();
        debug!(?state, "Session opened");
        Ok(Self { session, cancel })
    }

    /// Resolves the guard for the screen a command stands in for.
    ///
    /// # Errors
    /// Returns an error naming the view the user is sent to instead.
    pub fn require(&self, guard: RouteGuard) -> Result<User> {
        let snapshot = self.session.snapshot();
        match guard.evaluate(&snapshot) {
            GuardDecision::Render => snapshot
                .user
                .ok_or_else(|| anyhow!("session has no user")),
            GuardDecision::Pending => bail!("session is still loading, try again"),
            GuardDecision::Redirect(view) => bail!("{} (redirected to {view})", redirect_reason(view)),
        }
    }

    /// Runs one API call under the cancellation token.
    ///
    /// # Errors
    /// Returns the API error, with the user-facing message.
    pub async fn call<F, T>(&self, future: F) -> Result<ApiResponse<T>>
    where
        F: Future<Output = Result<ApiResponse<T>, ApiError>>,
    {
        cancellable(&self.cancel, future)
            .await
            .map_err(|err| anyhow!(err.user_message()))
    }
}

fn redirect_reason(view: View) -> &'static str {
    match view {
        View::Login => "Sign in first",
        View::Verification => "Verify your email first",
        _ => "Not available for your role",
    }
}

/// Pretty JSON on stdout.
///
/// # Errors
/// Returns an error if the value cannot be encoded.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the envelope's data, or its message when the server sent none.
///
/// # Errors
/// Returns an error if the value cannot be encoded.
pub fn print_response<T: Serialize>(response: ApiResponse<T>) -> Result<()> {
    match response.data {
        Some(data) => print_json(&data),
        None => print_json(&json!({ "message": response.message })),
    }
}
