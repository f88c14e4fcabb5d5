use crate::{
    cli::actions::{print_response, Context, RatingsAction},
    features::{auth::RouteGuard, ratings::client},
};
use anyhow::Result;

/// Handle the rating commands
pub async fn handle(action: RatingsAction, ctx: &Context) -> Result<()> {
    ctx.require(RouteGuard::verified())?;
    let api = ctx.session.api();

    match action {
        RatingsAction::Received(page) => {
            print_response(ctx.call(client::received_ratings(api, page)).await?)
        }
        RatingsAction::Given(page) => print_response(ctx.call(client::given_ratings(api, page)).await?),
        RatingsAction::Average { user_id } => {
            print_response(ctx.call(client::average_rating(api, &user_id)).await?)
        }
    }
}
