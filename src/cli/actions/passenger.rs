use crate::{
    cli::actions::{print_response, Context, PassengerAction},
    features::{
        auth::{Role, RouteGuard},
        passengers::client,
    },
};
use anyhow::Result;

/// Handle the passenger dashboard commands
pub async fn handle(action: PassengerAction, ctx: &Context) -> Result<()> {
    ctx.require(RouteGuard::verified().with_role(Role::Passenger))?;
    let api = ctx.session.api();

    match action {
        PassengerAction::Profile => print_response(ctx.call(client::profile(api)).await?),
        PassengerAction::Balance => print_response(ctx.call(client::balance(api)).await?),
        PassengerAction::Stats => print_response(ctx.call(client::stats(api)).await?),
    }
}
