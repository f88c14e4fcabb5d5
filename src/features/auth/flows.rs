//! Form handlers: validate, call the backend, update the session and say
//! where to go next. Validation failures return before any request is built.

use super::{
    client,
    forms::{ChangePasswordForm, ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm},
    guards::{landing_after_login, View},
    state::{Session, SessionError},
    types::MessageResponse,
    user::{BackendUser, User},
};
use crate::{
    app_lib::{
        api::path_id, validation::validate_code, ApiClient, ApiError, ValidationError,
    },
    features::verification::{
        self,
        types::{ConfirmCodeRequest, SentCode},
        AttemptCounter,
    },
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("No verification attempts left, request a new code")]
    AttemptsExhausted,
}

impl FlowError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Api(err) => err.user_message(),
            FlowError::Session(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub landing: View,
}

/// Login form handler. The request runs as a session transition, so guards
/// see it as pending and the session's concurrency policy applies.
///
/// # Errors
/// Validation errors are returned before any request; session errors leave
/// the session untouched.
#[instrument(skip_all)]
pub async fn submit_login(
    session: &Session,
    form: &LoginForm,
    cancel: &CancellationToken,
) -> Result<LoginOutcome, FlowError> {
    form.validate()?;

    let user = session.sign_in(&form.credentials, cancel).await?;

    Ok(LoginOutcome {
        landing: landing_after_login(&user),
        user,
    })
}

/// Account created but not yet verified. Holds its own attempt counter,
/// separate from any signed-in session.
#[derive(Clone)]
pub struct PendingRegistration {
    api: Arc<ApiClient>,
    user: BackendUser,
    attempts: AttemptCounter,
    code_sent: bool,
}

impl PendingRegistration {
    #[must_use]
    pub fn user(&self) -> &BackendUser {
        &self.user
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> AttemptCounter {
        self.attempts
    }

    /// Whether the last request for a code went through.
    #[must_use]
    pub fn code_sent(&self) -> bool {
        self.code_sent
    }

    /// Confirms the emailed code; the caller then shows the login view.
    ///
    /// # Errors
    /// `FlowError::AttemptsExhausted` once the counter is spent, otherwise the
    /// validation or API error. An API error consumes one attempt.
    #[instrument(skip(self, code), fields(user_id = %self.user.id))]
    pub async fn confirm(&mut self, code: &str) -> Result<View, FlowError> {
        validate_code(code)?;
        if self.attempts.is_exhausted() {
            return Err(FlowError::AttemptsExhausted);
        }

        let request = ConfirmCodeRequest {
            code: code.trim().to_string(),
        };
        match verification::client::confirm_verification(&self.api, &self.user.id, &request).await {
            Ok(_) => {
                info!("Account verified");
                Ok(View::Login)
            }
            Err(err) => {
                self.attempts.record_failure();
                Err(err.into())
            }
        }
    }

    /// Requests a new code and restores the attempt allowance.
    ///
    /// # Errors
    /// Returns the API error; the counter is left as it was.
    #[instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn resend(&mut self) -> Result<SentCode, FlowError> {
        let sent = verification::client::send_verification(&self.api, &self.user.id)
            .await?
            .data
            .unwrap_or_default();
        self.attempts.reset();
        self.code_sent = true;
        Ok(sent)
    }
}

/// Registration form handler. On success a verification code has been
/// requested for the new account; a failure to send it is logged and left for
/// [`PendingRegistration::resend`].
///
/// # Errors
/// Validation errors are returned before any request, then the register call's error.
#[instrument(skip_all)]
pub async fn submit_registration(
    api: &Arc<ApiClient>,
    form: &RegisterForm,
) -> Result<PendingRegistration, FlowError> {
    form.validate()?;

    let registered = client::register(api, &form.data).await?.into_data()?;
    let user_id = path_id(&registered.user.id, "User")?.to_string();
    info!(user_id = %user_id, "Account registered");

    let code_sent = match verification::client::send_verification(api, &user_id).await {
        Ok(_) => true,
        Err(err) => {
            warn!("Verification code could not be sent: {}", err.user_message());
            false
        }
    };

    Ok(PendingRegistration {
        api: api.clone(),
        user: registered.user,
        attempts: AttemptCounter::new(),
        code_sent,
    })
}

/// # Errors
/// Validation error, or whatever the backend returns.
#[instrument(skip_all)]
pub async fn request_password_reset(
    api: &ApiClient,
    form: &ForgotPasswordForm,
) -> Result<MessageResponse, FlowError> {
    form.validate()?;
    Ok(client::forgot_password(api, &form.request)
        .await?
        .data
        .unwrap_or_default())
}

/// Sets a new password from an emailed token; the caller then shows login.
///
/// # Errors
/// Validation error, or whatever the backend returns.
#[instrument(skip_all)]
pub async fn reset_password(api: &ApiClient, form: &ResetPasswordForm) -> Result<View, FlowError> {
    form.validate()?;
    client::reset_password(api, &form.request).await?;
    Ok(View::Login)
}

/// # Errors
/// `SessionError::NotAuthenticated` without a session, the validation error,
/// or whatever the backend returns.
#[instrument(skip_all)]
pub async fn change_password(
    session: &Session,
    form: &ChangePasswordForm,
) -> Result<MessageResponse, FlowError> {
    if !session.snapshot().is_authenticated() {
        return Err(SessionError::NotAuthenticated.into());
    }
    form.validate()?;
    Ok(client::change_password(session.api(), &form.request)
        .await?
        .data
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{submit_login, submit_registration, FlowError};
    use crate::{
        app_lib::{test_support::config_for, MemoryStorage, ValidationError},
        features::auth::{
            forms::{LoginForm, RegisterForm},
            gate::ConcurrencyPolicy,
            guards::View,
            state::{Session, SessionError},
            types::RegisterData,
        },
    };
    use anyhow::Result;
    use serde_json::json;
    use std::{sync::Arc, time::Duration};
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn register_form(email: &str) -> RegisterForm {
        RegisterForm {
            data: RegisterData {
                first_name: "Carlos".into(),
                last_name: "Mendoza".into(),
                email: email.into(),
                phone: "0991234567".into(),
                password: "Abc123!".into(),
                confirm_password: "Abc123!".into(),
            },
            accepts_terms: true,
        }
    }

    #[tokio::test]
    async fn login_lands_on_verification_for_unverified_users() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "access_token": "jwt-1",
                    "user": { "id": "u-1", "rol": "PASAJERO", "estadoVerificacion": "NO_VERIFICADO" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::from_config(&config_for(&server), Arc::new(MemoryStorage::new()))?;
        session.restore();

        let outcome = submit_login(
            &session,
            &LoginForm::new("test@epn.edu.ec", "Abc123!"),
            &CancellationToken::new(),
        )
        .await?;
        assert_eq!(outcome.landing, View::Verification);
        assert!(session.requires_verification());
        Ok(())
    }

    #[tokio::test]
    async fn login_form_runs_as_a_session_transition() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "data": {
                            "access_token": "jwt-1",
                            "user": { "id": "u-1", "rol": "PASAJERO", "estadoVerificacion": "VERIFICADO" }
                        }
                    }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.policy = ConcurrencyPolicy::Reject;
        let session = Session::from_config(&config, Arc::new(MemoryStorage::new()))?;
        session.restore();
        let form = LoginForm::new("test@epn.edu.ec", "Abc123!");
        let cancel = CancellationToken::new();

        let (first, (loading_meanwhile, second)) = tokio::join!(
            submit_login(&session, &form, &cancel),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let loading = session.snapshot().is_loading;
                (loading, submit_login(&session, &form, &cancel).await)
            }
        );

        assert!(loading_meanwhile);
        assert_eq!(first?.landing, View::Dashboard);
        assert!(matches!(second, Err(FlowError::Session(SessionError::Busy))));
        assert!(!session.snapshot().is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_login_form_never_reaches_the_server() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = Session::from_config(&config_for(&server), Arc::new(MemoryStorage::new()))?;
        let err = submit_login(
            &session,
            &LoginForm::new("test@gmail.com", "Abc123!"),
            &CancellationToken::new(),
        )
        .await
        .err();
        assert!(matches!(err, Some(FlowError::Validation(ValidationError::EmailDomain))));
        Ok(())
    }

    #[tokio::test]
    async fn registration_sends_code_and_counts_attempts() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "success": true, "user": { "id": "pub-7", "email": "carlos@epn.edu.ec" } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verification/send/pub-7"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": {} })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verification/confirm/pub-7"))
            .and(body_json(json!({ "code": "111111" })))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Código inválido" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verification/confirm/pub-7"))
            .and(body_json(json!({ "code": "222222" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "message": "ok" } })))
            .mount(&server)
            .await;

        let session = Session::from_config(&config_for(&server), Arc::new(MemoryStorage::new()))?;
        let mut pending = submit_registration(session.api(), &register_form("carlos@epn.edu.ec")).await?;
        assert_eq!(pending.user_id(), "pub-7");
        assert!(pending.code_sent());

        let err = pending.confirm("111111").await.err();
        assert_eq!(err.map(|err| err.user_message()), Some("Código inválido".to_string()));
        assert_eq!(pending.remaining_attempts().remaining(), 2);

        pending.resend().await?;
        assert_eq!(pending.remaining_attempts().remaining(), 3);

        assert_eq!(pending.confirm("222222").await?, View::Login);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_the_server() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let session = Session::from_config(&config_for(&server), Arc::new(MemoryStorage::new()))?;
        let err = submit_registration(session.api(), &register_form("carlos@hotmail.com"))
            .await
            .err();
        assert!(matches!(err, Some(FlowError::Validation(ValidationError::EmailDomain))));
        Ok(())
    }
}
