use crate::{
    app_lib::{ConfigOverrides, PageQuery},
    cli::{
        actions::{
            AccountAction, Action, BookingsAction, DriverAction, PassengerAction, RatingsAction,
            RoutesAction, VerifyAction,
        },
        globals::GlobalArgs,
    },
    features::{
        auth::ConcurrencyPolicy, bookings::types::BookingStatus, passengers::types::PaymentKind,
        routes::types::{RouteStatus, SearchRoutes},
    },
};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

pub fn handler(matches: &ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(ConfigOverrides {
        api_base_url: matches.get_one::<String>("api-url").cloned(),
        storage_dir: matches.get_one::<String>("storage-dir").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        policy: matches.get_one::<ConcurrencyPolicy>("policy").copied(),
    });

    let action = match matches.subcommand() {
        Some(("login", sub_m)) => Action::Account(AccountAction::Login {
            email: string(sub_m, "email")?,
            password: secret(sub_m, "password")?,
        }),
        Some(("logout", _)) => Action::Account(AccountAction::Logout),
        Some(("whoami", _)) => Action::Account(AccountAction::Whoami),
        Some(("register", sub_m)) => Action::Account(AccountAction::Register {
            first_name: string(sub_m, "first-name")?,
            last_name: string(sub_m, "last-name")?,
            email: string(sub_m, "email")?,
            phone: string(sub_m, "phone")?,
            password: secret(sub_m, "password")?,
            confirm_password: secret(sub_m, "confirm-password")?,
            accepts_terms: sub_m.get_flag("accept-terms"),
            code_from_stdin: sub_m.get_flag("code-stdin"),
        }),
        Some(("verify", sub_m)) => Action::Verify(verify(sub_m)?),
        Some(("password", sub_m)) => Action::Account(password(sub_m)?),
        Some(("routes", sub_m)) => Action::Routes(routes(sub_m)?),
        Some(("bookings", sub_m)) => Action::Bookings(bookings(sub_m)?),
        Some(("ratings", sub_m)) => Action::Ratings(ratings(sub_m)?),
        Some(("driver", sub_m)) => Action::Driver(driver(sub_m)?),
        Some(("passenger", sub_m)) => Action::Passenger(passenger(sub_m)?),
        _ => bail!("missing subcommand"),
    };

    Ok((action, globals))
}

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

fn page(matches: &ArgMatches) -> PageQuery {
    let defaults = PageQuery::default();
    PageQuery {
        limit: matches.get_one::<u32>("limit").copied().unwrap_or(defaults.limit),
        offset: matches.get_one::<u32>("offset").copied().unwrap_or(defaults.offset),
    }
}

fn id(matches: &ArgMatches) -> Result<String> {
    matches
        .get_one::<String>("id")
        .map(|s| s.to_string())
        .context("missing id")
}

fn verify(matches: &ArgMatches) -> Result<VerifyAction> {
    Ok(match matches.subcommand() {
        Some(("send", _)) => VerifyAction::Send,
        Some(("confirm", sub_m)) => VerifyAction::Confirm {
            code: sub_m
                .get_one::<String>("code")
                .map(|s| s.trim().to_string())
                .context("missing code")?,
        },
        Some(("attempts", _)) => VerifyAction::Attempts,
        _ => bail!("unknown verify command"),
    })
}

fn password(matches: &ArgMatches) -> Result<AccountAction> {
    Ok(match matches.subcommand() {
        Some(("forgot", sub_m)) => AccountAction::ForgotPassword {
            email: string(sub_m, "email")?,
        },
        Some(("reset", sub_m)) => AccountAction::ResetPassword {
            token: secret(sub_m, "token")?,
            password: secret(sub_m, "password")?,
            confirm_password: secret(sub_m, "confirm-password")?,
        },
        Some(("change", sub_m)) => AccountAction::ChangePassword {
            current: secret(sub_m, "current")?,
            new: secret(sub_m, "new")?,
            confirm_password: secret(sub_m, "confirm-password")?,
        },
        _ => bail!("unknown password command"),
    })
}

fn routes(matches: &ArgMatches) -> Result<RoutesAction> {
    Ok(match matches.subcommand() {
        Some(("search", sub_m)) => RoutesAction::Search(SearchRoutes {
            origin: sub_m.get_one::<String>("origin").cloned(),
            destination: sub_m.get_one::<String>("destination").cloned(),
            departure_date: sub_m.get_one::<String>("date").cloned(),
            seats: sub_m.get_one::<u32>("seats").copied(),
            max_price: sub_m.get_one::<f64>("max-price").copied(),
            limit: sub_m.get_one::<u32>("limit").copied(),
            offset: sub_m.get_one::<u32>("offset").copied(),
        }),
        Some(("show", sub_m)) => RoutesAction::Show { id: id(sub_m)? },
        Some(("mine", sub_m)) => RoutesAction::Mine {
            status: sub_m.get_one::<RouteStatus>("status").copied(),
            page: page(sub_m),
        },
        Some(("nearby", sub_m)) => RoutesAction::Nearby {
            latitude: sub_m.get_one::<f64>("lat").copied().context("missing --lat")?,
            longitude: sub_m.get_one::<f64>("lng").copied().context("missing --lng")?,
            radius_km: sub_m.get_one::<f64>("radius").copied(),
        },
        Some(("cancel", sub_m)) => RoutesAction::Cancel {
            id: id(sub_m)?,
            reason: sub_m.get_one::<String>("reason").cloned(),
        },
        _ => bail!("unknown routes command"),
    })
}

fn bookings(matches: &ArgMatches) -> Result<BookingsAction> {
    Ok(match matches.subcommand() {
        Some(("mine", sub_m)) => BookingsAction::Mine {
            status: sub_m.get_one::<BookingStatus>("status").copied(),
            page: page(sub_m),
        },
        Some(("show", sub_m)) => BookingsAction::Show { id: id(sub_m)? },
        Some(("create", sub_m)) => BookingsAction::Create {
            route_id: string(sub_m, "route")?,
            payment: sub_m
                .get_one::<PaymentKind>("payment")
                .copied()
                .context("missing --payment")?,
            seat: sub_m.get_one::<u32>("seat").copied(),
            notes: sub_m.get_one::<String>("notes").cloned(),
        },
        Some(("cancel", sub_m)) => BookingsAction::Cancel {
            id: id(sub_m)?,
            reason: string(sub_m, "reason")?,
        },
        Some(("active", _)) => BookingsAction::Active,
        _ => bail!("unknown bookings command"),
    })
}

fn ratings(matches: &ArgMatches) -> Result<RatingsAction> {
    Ok(match matches.subcommand() {
        Some(("received", sub_m)) => RatingsAction::Received(page(sub_m)),
        Some(("given", sub_m)) => RatingsAction::Given(page(sub_m)),
        Some(("average", sub_m)) => RatingsAction::Average { user_id: id(sub_m)? },
        _ => bail!("unknown ratings command"),
    })
}

fn driver(matches: &ArgMatches) -> Result<DriverAction> {
    Ok(match matches.subcommand() {
        Some(("home", _)) => DriverAction::Home,
        Some(("profile", _)) => DriverAction::Profile,
        Some(("stats", _)) => DriverAction::Stats,
        Some(("availability", sub_m)) => DriverAction::Availability {
            set: sub_m.get_one::<bool>("set").copied(),
        },
        _ => bail!("unknown driver command"),
    })
}

fn passenger(matches: &ArgMatches) -> Result<PassengerAction> {
    Ok(match matches.subcommand() {
        Some(("profile", _)) => PassengerAction::Profile,
        Some(("balance", _)) => PassengerAction::Balance,
        Some(("stats", _)) => PassengerAction::Stats,
        _ => bail!("unknown passenger command"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Result<(Action, GlobalArgs)> {
        let matches = commands::new().try_get_matches_from(args.iter().copied())?;
        handler(&matches)
    }

    fn clean_env() -> [(&'static str, Option<&'static str>); 6] {
        [
            ("WASIGO_API_URL", None),
            ("WASIGO_STORAGE_DIR", None),
            ("WASIGO_TIMEOUT", None),
            ("WASIGO_POLICY", None),
            ("WASIGO_EMAIL", None),
            ("WASIGO_PASSWORD", None),
        ]
    }

    #[test]
    fn test_login_action() {
        temp_env::with_vars(clean_env(), || {
            let (action, globals) = dispatch(&[
                "wasigo",
                "--policy",
                "reject",
                "login",
                "--email",
                "test@epn.edu.ec",
                "--password",
                "Abc123!",
            ])
            .unwrap();

            match action {
                Action::Account(AccountAction::Login { email, password }) => {
                    assert_eq!(email, "test@epn.edu.ec");
                    assert_eq!(password.expose_secret(), "Abc123!");
                }
                other => panic!("unexpected action: {other:?}"),
            }
            assert_eq!(globals.config.policy, ConcurrencyPolicy::Reject);
            assert_eq!(globals.config.api_base_url, "http://localhost:3000/api");
        });
    }

    #[test]
    fn test_action_debug_hides_password() {
        temp_env::with_vars(clean_env(), || {
            let (action, _) = dispatch(&[
                "wasigo",
                "login",
                "--email",
                "test@epn.edu.ec",
                "--password",
                "Abc123!",
            ])
            .unwrap();
            assert!(!format!("{action:?}").contains("Abc123!"));
        });
    }

    #[test]
    fn test_routes_nearby_action() {
        temp_env::with_vars(clean_env(), || {
            let (action, _) = dispatch(&[
                "wasigo", "routes", "nearby", "--lat", "-0.21", "--lng", "-78.49",
            ])
            .unwrap();

            match action {
                Action::Routes(RoutesAction::Nearby {
                    latitude,
                    longitude,
                    radius_km,
                }) => {
                    assert!((latitude + 0.21).abs() < f64::EPSILON);
                    assert!((longitude + 78.49).abs() < f64::EPSILON);
                    assert_eq!(radius_km, None);
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_bookings_create_action() {
        temp_env::with_vars(clean_env(), || {
            let (action, _) = dispatch(&[
                "wasigo", "bookings", "create", "--route", "r-1", "--payment", "wallet", "--seat",
                "2",
            ])
            .unwrap();

            match action {
                Action::Bookings(BookingsAction::Create {
                    route_id,
                    payment,
                    seat,
                    notes,
                }) => {
                    assert_eq!(route_id, "r-1");
                    assert_eq!(payment, PaymentKind::Wallet);
                    assert_eq!(seat, Some(2));
                    assert_eq!(notes, None);
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_ratings_page_action() {
        temp_env::with_vars(clean_env(), || {
            let (action, _) =
                dispatch(&["wasigo", "ratings", "given", "--limit", "5", "--offset", "15"]).unwrap();

            match action {
                Action::Ratings(RatingsAction::Given(page)) => {
                    assert_eq!(page, PageQuery { limit: 5, offset: 15 });
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        temp_env::with_vars(clean_env(), || {
            assert!(dispatch(&["wasigo", "bookings", "mine", "--status", "lost"]).is_err());
        });
    }
}
