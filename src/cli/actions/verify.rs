use crate::{
    app_lib::validation::validate_code,
    cli::actions::{print_json, Context, VerifyAction},
    features::auth::{landing_after_verification, RouteGuard},
};
use anyhow::{anyhow, bail, Result};
use serde_json::json;
use tracing::warn;

fn last_error(ctx: &Context, fallback: &str) -> anyhow::Error {
    anyhow!(ctx
        .session
        .snapshot()
        .last_error
        .unwrap_or_else(|| fallback.to_string()))
}

/// Handle the verification commands for the signed-in user
pub async fn handle(action: VerifyAction, ctx: &Context) -> Result<()> {
    let user = ctx.require(RouteGuard::authenticated())?;
    if user.is_verified() {
        bail!("Email already verified");
    }

    match action {
        VerifyAction::Send => {
            if !ctx.session.send_verification_code().await {
                return Err(last_error(ctx, "Verification code could not be sent"));
            }
            print_json(&json!({
                "message": "Verification code sent",
                "remainingAttempts": ctx.session.snapshot().remaining_attempts,
            }))?;
        }
        VerifyAction::Confirm { code } => {
            validate_code(&code)?;

            // Local attempts start fresh in every process; the server count wins.
            if let Err(err) = ctx.session.sync_attempts().await {
                warn!("Remaining attempts unavailable: {}", err.user_message());
            }

            if !ctx
                .session
                .confirm_verification_scoped(&code, &ctx.cancel)
                .await
            {
                let snapshot = ctx.session.snapshot();
                bail!(
                    "{} ({} attempts left)",
                    snapshot
                        .last_error
                        .unwrap_or_else(|| "Verification failed".to_string()),
                    snapshot.remaining_attempts.remaining()
                );
            }

            let user = ctx
                .session
                .current_user()
                .ok_or_else(|| anyhow!("session has no user"))?;
            print_json(&json!({
                "message": "Email verified",
                "next": landing_after_verification(&user).path(),
            }))?;
        }
        VerifyAction::Attempts => {
            let remaining = ctx
                .session
                .sync_attempts()
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            print_json(&json!({ "remainingAttempts": remaining }))?;
        }
    }

    Ok(())
}
