use crate::{
    app_lib::cancellable,
    cli::actions::{print_json, print_response, Context, DriverAction},
    features::{
        auth::{Role, RouteGuard},
        drivers::{client, load_driver_home},
    },
};
use anyhow::{anyhow, Result};

/// Handle the driver dashboard commands
pub async fn handle(action: DriverAction, ctx: &Context) -> Result<()> {
    ctx.require(RouteGuard::verified().with_role(Role::Driver))?;
    let api = ctx.session.api();

    match action {
        DriverAction::Home => {
            let home = cancellable(&ctx.cancel, load_driver_home(api))
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            print_json(&home)
        }
        DriverAction::Profile => print_response(ctx.call(client::profile(api)).await?),
        DriverAction::Stats => print_response(ctx.call(client::stats(api)).await?),
        DriverAction::Availability { set: None } => {
            print_response(ctx.call(client::availability(api)).await?)
        }
        DriverAction::Availability { set: Some(is_available) } => {
            print_response(ctx.call(client::update_availability(api, is_available)).await?)
        }
    }
}
