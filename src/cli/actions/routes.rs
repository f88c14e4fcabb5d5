use crate::{
    cli::actions::{print_response, Context, RoutesAction},
    features::{
        auth::{Role, RouteGuard},
        routes::client,
    },
};
use anyhow::Result;

/// Handle the route commands
pub async fn handle(action: RoutesAction, ctx: &Context) -> Result<()> {
    let api = ctx.session.api();

    match action {
        RoutesAction::Search(params) => {
            ctx.require(RouteGuard::verified())?;
            print_response(ctx.call(client::search_routes(api, &params)).await?)
        }
        RoutesAction::Show { id } => {
            ctx.require(RouteGuard::verified())?;
            print_response(ctx.call(client::get_route(api, &id)).await?)
        }
        RoutesAction::Mine { status, page } => {
            ctx.require(RouteGuard::verified().with_role(Role::Driver))?;
            print_response(ctx.call(client::my_routes(api, status, page)).await?)
        }
        RoutesAction::Nearby {
            latitude,
            longitude,
            radius_km,
        } => {
            ctx.require(RouteGuard::verified())?;
            print_response(
                ctx.call(client::nearby_routes(api, latitude, longitude, radius_km))
                    .await?,
            )
        }
        RoutesAction::Cancel { id, reason } => {
            ctx.require(RouteGuard::verified().with_role(Role::Driver))?;
            print_response(
                ctx.call(client::cancel_route(api, &id, reason.as_deref()))
                    .await?,
            )
        }
    }
}
