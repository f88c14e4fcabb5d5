//! Session state for the client. A `Session` is built once by the caller and
//! passed to whatever needs it; it owns the HTTP client and the persisted
//! storage, and publishes every change through a `watch` channel so views and
//! guards recompute from the latest snapshot.
//!
//! All mutations of the signed-in user go through `publish`, which derives the
//! state and `requires_verification` from the user. Transitions that talk to
//! the network take a permit from the transition gate first, so overlapping
//! calls follow the configured `ConcurrencyPolicy` instead of interleaving
//! writes to the persisted snapshot.

use super::{
    client,
    gate::{ConcurrencyPolicy, Permit, TransitionGate},
    roles::Role,
    types::{AuthResponse, LoginCredentials},
    user::{BackendUser, User},
};
use crate::{
    app_lib::{
        cancellable,
        storage::{TOKEN_KEY, USER_KEY},
        ApiClient, ApiError, AppConfig, Storage, StorageError,
    },
    features::verification::{
        self,
        types::ConfirmCodeRequest,
        AttemptCounter,
    },
};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Restoring,
    Anonymous,
    AuthenticatedUnverified,
    AuthenticatedVerified,
}

impl SessionState {
    fn for_user(user: Option<&User>) -> Self {
        match user {
            None => SessionState::Anonymous,
            Some(user) if user.is_verified() => SessionState::AuthenticatedVerified,
            Some(_) => SessionState::AuthenticatedUnverified,
        }
    }

    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(
            self,
            SessionState::AuthenticatedUnverified | SessionState::AuthenticatedVerified
        )
    }
}

/// Everything a view needs to render from the session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub user: Option<User>,
    pub is_loading: bool,
    pub requires_verification: bool,
    pub remaining_attempts: AttemptCounter,
    /// Message of the last failed transition, cleared when the next one starts.
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    fn restoring() -> Self {
        Self {
            state: SessionState::Restoring,
            user: None,
            is_loading: true,
            requires_verification: false,
            remaining_attempts: AttemptCounter::new(),
            last_error: None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Another session operation is already in progress")]
    Busy,
    #[error("No active session")]
    NotAuthenticated,
    #[error("No verification attempts left, request a new code")]
    AttemptsExhausted,
    #[error("Superseded by a newer session operation")]
    Superseded,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Api(err) if err.is_cancelled())
    }
}

pub struct Session {
    api: Arc<ApiClient>,
    storage: Arc<dyn Storage>,
    gate: TransitionGate,
    in_flight: AtomicUsize,
    state: watch::Sender<SessionSnapshot>,
}

/// Keeps `is_loading` set while alive. Dropping it, including when the owning
/// future is dropped mid-flight, clears the flag once nothing else is running.
struct Loading<'a> {
    session: &'a Session,
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let left = self
            .session
            .in_flight
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        self.session
            .state
            .send_modify(|snapshot| snapshot.is_loading = left > 0);
    }
}

impl Session {
    /// `storage` must be the same store the client was built with.
    #[must_use]
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn Storage>, policy: ConcurrencyPolicy) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::restoring());
        Self {
            api,
            storage,
            gate: TransitionGate::new(policy),
            in_flight: AtomicUsize::new(0),
            state,
        }
    }

    /// Builds the client and the session over one storage backend.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(config, storage.clone())?);
        Ok(Self::new(api, storage, config.policy))
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    #[must_use]
    pub fn policy(&self) -> ConcurrencyPolicy {
        self.gate.policy()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn requires_verification(&self) -> bool {
        self.state.borrow().requires_verification
    }

    /// Rebuilds the session from storage. Never fails: a snapshot that does not
    /// parse, or a token without a snapshot (or the reverse), leaves the session
    /// anonymous and clears whatever was left behind.
    #[instrument(skip(self))]
    pub fn restore(&self) -> SessionState {
        self.gate.bump();

        let has_token = self.api.has_token();
        let user = match (has_token, self.storage.get(USER_KEY)) {
            (true, Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("Discarding corrupt session snapshot: {err}");
                    self.clear_persisted();
                    None
                }
            },
            (true, None) => {
                debug!("Token without a user snapshot, clearing it");
                self.clear_persisted();
                None
            }
            (false, Some(_)) => {
                debug!("User snapshot without a token, clearing it");
                self.clear_persisted();
                None
            }
            (false, None) => None,
        };

        if let Some(user) = &user {
            info!(user_id = %user.id, role = %user.role, "Session restored");
        }
        self.publish(user);

        let in_flight = self.in_flight.load(Ordering::SeqCst);
        self.state
            .send_modify(|snapshot| snapshot.is_loading = in_flight > 0);
        self.state.borrow().state
    }

    /// Signs in. Returns `false` on any failure; the reason is left in
    /// `last_error`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.login_scoped(email, password, &CancellationToken::new())
            .await
    }

    /// Same as [`Session::login`], abandoned without touching the session if
    /// `cancel` fires first.
    #[instrument(skip(self, password, cancel))]
    pub async fn login_scoped(&self, email: &str, password: &str, cancel: &CancellationToken) -> bool {
        let credentials = LoginCredentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.sign_in(&credentials, cancel).await.is_ok()
    }

    /// Login transition returning the signed-in user. Raises `is_loading`,
    /// follows the concurrency policy and records failures in `last_error`
    /// like [`Session::login`].
    ///
    /// # Errors
    /// `SessionError::Busy` under `Reject` while another transition runs,
    /// `SessionError::Superseded` if a newer transition started meanwhile,
    /// otherwise the API or storage error. On error the session is unchanged.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn sign_in(
        &self,
        credentials: &LoginCredentials,
        cancel: &CancellationToken,
    ) -> Result<User, SessionError> {
        let _loading = self.loading();
        match self.run_login(credentials, cancel).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "Signed in");
                Ok(user)
            }
            Err(err) => {
                self.record_failure("Login", &err);
                Err(err)
            }
        }
    }

    async fn run_login(
        &self,
        credentials: &LoginCredentials,
        cancel: &CancellationToken,
    ) -> Result<User, SessionError> {
        let permit = self.permit(cancel).await?;
        let auth = cancellable(cancel, client::login(&self.api, credentials))
            .await?
            .into_data()?;
        self.ensure_current(&permit)?;
        self.establish(auth)
    }

    /// Adopts a login or registration completed elsewhere. Applies
    /// immediately and supersedes any transition still in flight.
    ///
    /// # Errors
    /// Returns `SessionError::Storage` when the token or snapshot cannot be
    /// persisted; the session is then left as it was before the call.
    #[instrument(skip_all)]
    pub fn set_auth(&self, user: BackendUser, token: &str) -> Result<User, SessionError> {
        self.gate.bump();
        self.establish(AuthResponse {
            access_token: token.to_string(),
            user,
            expires_in: None,
        })
    }

    /// Ends the session. The logout call is best effort; local state is
    /// cleared whatever it returns.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _loading = self.loading();
        let permit = self.gate.enter_always().await;

        if self.api.has_token() {
            if let Err(err) = client::logout(&self.api).await {
                warn!("Logout request failed, clearing local session anyway: {}", err.user_message());
            }
        }

        if !self.gate.is_current(&permit) {
            debug!("Logout superseded by a newer session operation");
            return;
        }

        self.clear_persisted();
        self.state
            .send_modify(|snapshot| snapshot.remaining_attempts.reset());
        self.publish(None);
        info!("Signed out");
    }

    /// Confirms the emailed code for the signed-in user. A failure consumes
    /// one local attempt and leaves the user untouched.
    pub async fn confirm_verification(&self, code: &str) -> bool {
        self.confirm_verification_scoped(code, &CancellationToken::new())
            .await
    }

    #[instrument(skip(self, code, cancel))]
    pub async fn confirm_verification_scoped(&self, code: &str, cancel: &CancellationToken) -> bool {
        let _loading = self.loading();
        match self.run_confirm(code, cancel).await {
            Ok(user) => {
                info!(user_id = %user.id, "Email verified");
                true
            }
            Err(err) => {
                self.record_failure("Verification", &err);
                false
            }
        }
    }

    async fn run_confirm(&self, code: &str, cancel: &CancellationToken) -> Result<User, SessionError> {
        let user = self.current_user().ok_or(SessionError::NotAuthenticated)?;
        let permit = self.permit(cancel).await?;
        // Checked under the permit so queued confirms see the attempts spent before them.
        if self.state.borrow().remaining_attempts.is_exhausted() {
            return Err(SessionError::AttemptsExhausted);
        }

        let request = ConfirmCodeRequest {
            code: code.trim().to_string(),
        };
        let result = cancellable(
            cancel,
            verification::client::confirm_verification(&self.api, &user.id, &request),
        )
        .await;
        self.ensure_current(&permit)?;

        match result {
            Ok(_) => {}
            Err(err) if err.is_cancelled() => return Err(err.into()),
            Err(err) => {
                self.state
                    .send_modify(|snapshot| snapshot.remaining_attempts.record_failure());
                return Err(err.into());
            }
        }

        let verified = self
            .update_user(User::mark_verified)
            .ok_or(SessionError::NotAuthenticated)?;
        if let Err(err) = self.persist_user(&verified) {
            warn!("Verified user could not be persisted: {err}");
        }
        Ok(verified)
    }

    /// Asks for a fresh code. Success restores the full attempt allowance.
    #[instrument(skip(self))]
    pub async fn send_verification_code(&self) -> bool {
        let Some(user) = self.current_user() else {
            self.record_failure("Send code", &SessionError::NotAuthenticated);
            return false;
        };

        match verification::client::send_verification(&self.api, &user.id).await {
            Ok(_) => {
                self.state.send_modify(|snapshot| {
                    snapshot.remaining_attempts.reset();
                    snapshot.last_error = None;
                });
                true
            }
            Err(err) => {
                self.record_failure("Send code", &SessionError::from(err));
                false
            }
        }
    }

    /// Adopts the backend's count of remaining attempts.
    ///
    /// # Errors
    /// Returns `SessionError::NotAuthenticated` without a user, or the API error.
    #[instrument(skip(self))]
    pub async fn sync_attempts(&self) -> Result<AttemptCounter, SessionError> {
        let user = self.current_user().ok_or(SessionError::NotAuthenticated)?;
        let remaining = verification::client::remaining_attempts(&self.api, &user.id)
            .await?
            .into_data()?;
        let counter = AttemptCounter::from_server(remaining.remaining);
        self.state
            .send_modify(|snapshot| snapshot.remaining_attempts = counter);
        Ok(counter)
    }

    /// Demo affordance: changes the active role in memory only. The persisted
    /// snapshot keeps the role the backend assigned.
    pub fn switch_role(&self, role: Role) -> Option<User> {
        self.update_user(|user| user.switch_role(role))
    }

    fn loading(&self) -> Loading<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|snapshot| {
            snapshot.is_loading = true;
            snapshot.last_error = None;
        });
        Loading { session: self }
    }

    async fn permit(&self, cancel: &CancellationToken) -> Result<Permit<'_>, SessionError> {
        cancellable(cancel, async { Ok(self.gate.enter().await) })
            .await?
            .ok_or(SessionError::Busy)
    }

    fn ensure_current(&self, permit: &Permit<'_>) -> Result<(), SessionError> {
        if self.gate.is_current(permit) {
            Ok(())
        } else {
            Err(SessionError::Superseded)
        }
    }

    /// Persists the token and the user, then publishes the user. Nothing is
    /// published unless both writes succeed; a half-written session is rolled
    /// back to the token that was active before.
    fn establish(&self, auth: AuthResponse) -> Result<User, SessionError> {
        let user = User::from(auth.user);
        let previous_token = self.api.token();

        let persisted = self
            .api
            .set_token(Some(&auth.access_token))
            .map_err(SessionError::from)
            .and_then(|()| self.persist_user(&user));
        if let Err(err) = persisted {
            let previous = previous_token.as_ref().map(|token| token.expose_secret());
            if let Err(rollback) = self.api.set_token(previous) {
                warn!("Failed to restore the previous token: {rollback}");
            }
            return Err(err);
        }

        self.state
            .send_modify(|snapshot| snapshot.remaining_attempts.reset());
        self.publish(Some(user.clone()));
        Ok(user)
    }

    fn persist_user(&self, user: &User) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(user).map_err(StorageError::from)?;
        self.storage.set(USER_KEY, &encoded)?;
        Ok(())
    }

    fn clear_persisted(&self) {
        if let Err(err) = self.api.set_token(None) {
            warn!("Failed to clear {TOKEN_KEY}: {err}");
        }
        if let Err(err) = self.storage.remove(USER_KEY) {
            warn!("Failed to clear {USER_KEY}: {err}");
        }
    }

    fn update_user(&self, change: impl FnOnce(&mut User)) -> Option<User> {
        let mut user = self.current_user()?;
        change(&mut user);
        self.publish(Some(user.clone()));
        Some(user)
    }

    /// The only place the signed-in user is replaced.
    fn publish(&self, user: Option<User>) {
        self.state.send_modify(|snapshot| {
            snapshot.state = SessionState::for_user(user.as_ref());
            snapshot.requires_verification = user.as_ref().is_some_and(|user| !user.is_verified());
            snapshot.user = user;
        });
    }

    fn record_failure(&self, operation: &str, err: &SessionError) {
        match err {
            SessionError::Superseded => debug!("{operation} superseded by a newer session operation"),
            err if err.is_cancelled() => debug!("{operation} cancelled"),
            err => {
                warn!("{operation} failed: {err}");
                let message = err.user_message();
                self.state
                    .send_modify(|snapshot| snapshot.last_error = Some(message));
            }
        }
    }
}
