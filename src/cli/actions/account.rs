use crate::{
    cli::actions::{print_json, AccountAction, Context},
    features::{
        auth::{
            flows::{self, FlowError, PendingRegistration},
            forms::{ChangePasswordForm, ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm},
            types::{ChangePasswordRequest, RegisterData, ResetPasswordRequest},
            RouteGuard, View,
        },
        navigation::menu_for,
    },
};
use anyhow::{anyhow, bail, Result};
use secrecy::ExposeSecret;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

fn flow_error(err: FlowError) -> anyhow::Error {
    anyhow!(err.user_message())
}

/// Handle sign in, sign out, registration and password commands
pub async fn handle(action: AccountAction, ctx: &Context) -> Result<()> {
    match action {
        AccountAction::Login { email, password } => {
            let form = LoginForm::new(&email, password.expose_secret());
            let outcome = flows::submit_login(&ctx.session, &form, &ctx.cancel)
                .await
                .map_err(flow_error)?;

            print_json(&json!({
                "user": outcome.user,
                "next": outcome.landing.path(),
                "menu": menu_for(outcome.user.role),
            }))?;
        }
        AccountAction::Logout => {
            ctx.session.logout().await;
            print_json(&json!({ "message": "Signed out" }))?;
        }
        AccountAction::Whoami => {
            let snapshot = ctx.session.snapshot();
            let menu = snapshot
                .user
                .as_ref()
                .map(|user| menu_for(user.role))
                .unwrap_or_default();

            print_json(&json!({ "session": snapshot, "menu": menu }))?;
        }
        AccountAction::Register {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm_password,
            accepts_terms,
            code_from_stdin,
        } => {
            let form = RegisterForm {
                data: RegisterData {
                    first_name,
                    last_name,
                    email,
                    phone,
                    password: password.expose_secret().to_string(),
                    confirm_password: confirm_password.expose_secret().to_string(),
                },
                accepts_terms,
            };
            let mut pending = flows::submit_registration(ctx.session.api(), &form)
                .await
                .map_err(flow_error)?;

            if code_from_stdin {
                confirm_from_stdin(&mut pending, ctx).await?;
                print_json(&json!({
                    "userId": pending.user_id(),
                    "verified": true,
                    "next": View::Login.path(),
                }))?;
            } else {
                print_json(&json!({
                    "userId": pending.user_id(),
                    "codeSent": pending.code_sent(),
                    "remainingAttempts": pending.remaining_attempts(),
                    "next": "sign in and run `wasigo verify confirm <code>`",
                }))?;
            }
        }
        AccountAction::ForgotPassword { email } => {
            let response = flows::request_password_reset(ctx.session.api(), &ForgotPasswordForm::new(&email))
                .await
                .map_err(flow_error)?;
            print_json(&response)?;
        }
        AccountAction::ResetPassword {
            token,
            password,
            confirm_password,
        } => {
            let form = ResetPasswordForm {
                request: ResetPasswordRequest {
                    token: token.expose_secret().trim().to_string(),
                    new_password: password.expose_secret().to_string(),
                },
                confirm_password: confirm_password.expose_secret().to_string(),
            };
            let next = flows::reset_password(ctx.session.api(), &form)
                .await
                .map_err(flow_error)?;
            print_json(&json!({ "message": "Password updated", "next": next.path() }))?;
        }
        AccountAction::ChangePassword {
            current,
            new,
            confirm_password,
        } => {
            ctx.require(RouteGuard::authenticated())?;
            let form = ChangePasswordForm {
                request: ChangePasswordRequest {
                    current_password: current.expose_secret().to_string(),
                    new_password: new.expose_secret().to_string(),
                },
                confirm_password: confirm_password.expose_secret().to_string(),
            };
            let response = flows::change_password(&ctx.session, &form)
                .await
                .map_err(flow_error)?;
            print_json(&response)?;
        }
    }

    Ok(())
}

/// Reads codes line by line until one is accepted or stdin closes.
/// An empty line asks for a new code.
async fn confirm_from_stdin(pending: &mut PendingRegistration, ctx: &Context) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprintln!(
            "Enter the 6-digit code ({} attempts left, empty line to resend):",
            pending.remaining_attempts().remaining()
        );
        let line = tokio::select! {
            () = ctx.cancel.cancelled() => bail!("cancelled"),
            line = lines.next_line() => line?,
        };
        let Some(code) = line else {
            bail!("no verification code entered");
        };

        if code.trim().is_empty() {
            pending.resend().await.map_err(flow_error)?;
            eprintln!("A new code was sent");
            continue;
        }

        match pending.confirm(&code).await {
            Ok(_) => return Ok(()),
            Err(FlowError::AttemptsExhausted) => {
                eprintln!("No verification attempts left, send an empty line to request a new code");
            }
            Err(err) => eprintln!("{}", err.user_message()),
        }
    }
}
