use crate::{
    cli::actions::{print_response, BookingsAction, Context},
    features::{
        auth::RouteGuard,
        bookings::{
            client,
            types::{CancelBooking, CreateBooking},
        },
    },
};
use anyhow::Result;

/// Handle the booking commands
pub async fn handle(action: BookingsAction, ctx: &Context) -> Result<()> {
    ctx.require(RouteGuard::verified())?;
    let api = ctx.session.api();

    match action {
        BookingsAction::Mine { status, page } => {
            print_response(ctx.call(client::my_bookings(api, status, page)).await?)
        }
        BookingsAction::Show { id } => print_response(ctx.call(client::get_booking(api, &id)).await?),
        BookingsAction::Create {
            route_id,
            payment,
            seat,
            notes,
        } => {
            let booking = CreateBooking {
                route_id,
                seat,
                payment_method: payment.as_wire().to_string(),
                driver_notes: notes,
            };
            print_response(ctx.call(client::create_booking(api, &booking)).await?)
        }
        BookingsAction::Cancel { id, reason } => {
            let request = CancelBooking { reason };
            print_response(ctx.call(client::cancel_booking(api, &id, &request)).await?)
        }
        BookingsAction::Active => print_response(ctx.call(client::active_bookings(api)).await?),
    }
}
