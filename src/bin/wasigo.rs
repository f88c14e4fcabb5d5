use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use wasigo::cli::{
    actions::{self, Action, Context},
    start,
};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Ctrl-C drops whatever call is in flight
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    let ctx = Context::open(&globals, cancel)?;

    // Handle the action
    match action {
        Action::Account(action) => actions::account::handle(action, &ctx).await?,
        Action::Verify(action) => actions::verify::handle(action, &ctx).await?,
        Action::Routes(action) => actions::routes::handle(action, &ctx).await?,
        Action::Bookings(action) => actions::bookings::handle(action, &ctx).await?,
        Action::Ratings(action) => actions::ratings::handle(action, &ctx).await?,
        Action::Driver(action) => actions::driver::handle(action, &ctx).await?,
        Action::Passenger(action) => actions::passenger::handle(action, &ctx).await?,
    }

    Ok(())
}
