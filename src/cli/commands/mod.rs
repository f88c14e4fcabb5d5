use crate::features::{
    auth::ConcurrencyPolicy, bookings::types::BookingStatus, passengers::types::PaymentKind,
    routes::types::RouteStatus,
};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("wasigo")
        .about("University carpooling client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the WasiGo API, example: https://wasigo.tld/api")
                .env("WASIGO_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("storage-dir")
                .long("storage-dir")
                .help("Directory holding the persisted session (default: per-user config dir)")
                .env("WASIGO_STORAGE_DIR")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("WASIGO_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .help("What to do when a session change overlaps another: reject, queue, last-write-wins")
                .env("WASIGO_POLICY")
                .global(true)
                .value_parser(clap::value_parser!(ConcurrencyPolicy)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("WASIGO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with an institutional account")
                .arg(email_arg())
                .arg(secret_arg("password", "Account password", "WASIGO_PASSWORD")),
        )
        .subcommand(Command::new("logout").about("Sign out and forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the current session and menu"))
        .subcommand(register_command())
        .subcommand(verify_command())
        .subcommand(password_command())
        .subcommand(routes_command())
        .subcommand(bookings_command())
        .subcommand(ratings_command())
        .subcommand(driver_command())
        .subcommand(passenger_command())
}

fn email_arg() -> Arg {
    Arg::new("email")
        .long("email")
        .help("Institutional email (@epn.edu.ec)")
        .env("WASIGO_EMAIL")
        .required(true)
}

fn secret_arg(name: &'static str, help: &'static str, env: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .env(env)
        .hide_env_values(true)
        .required(true)
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").help(help).required(true)
}

fn page_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("limit")
                .long("limit")
                .help("Page size")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("offset")
                .long("offset")
                .help("Items to skip")
                .default_value("0")
                .value_parser(clap::value_parser!(u32)),
        )
}

fn register_command() -> Command {
    Command::new("register")
        .about("Create an account and request a verification code")
        .arg(
            Arg::new("first-name")
                .long("first-name")
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new("last-name")
                .long("last-name")
                .help("Last name")
                .required(true),
        )
        .arg(email_arg())
        .arg(
            Arg::new("phone")
                .long("phone")
                .help("Mobile number, example: 0991234567")
                .required(true),
        )
        .arg(secret_arg("password", "Account password", "WASIGO_PASSWORD"))
        .arg(secret_arg(
            "confirm-password",
            "Password confirmation",
            "WASIGO_CONFIRM_PASSWORD",
        ))
        .arg(
            Arg::new("accept-terms")
                .long("accept-terms")
                .help("Accept the terms and conditions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("code-stdin")
                .long("code-stdin")
                .help("Wait for the emailed code on stdin and confirm it")
                .action(ArgAction::SetTrue),
        )
}

fn verify_command() -> Command {
    Command::new("verify")
        .about("Email verification for the signed-in account")
        .subcommand_required(true)
        .subcommand(Command::new("send").about("Send a new 6-digit code"))
        .subcommand(
            Command::new("confirm")
                .about("Confirm the emailed code")
                .arg(Arg::new("code").help("6-digit code").required(true)),
        )
        .subcommand(Command::new("attempts").about("Show remaining attempts"))
}

fn password_command() -> Command {
    Command::new("password")
        .about("Password recovery and change")
        .subcommand_required(true)
        .subcommand(
            Command::new("forgot")
                .about("Email a password reset link")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new("reset")
                .about("Set a new password from a reset token")
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("Token from the reset email")
                        .required(true),
                )
                .arg(secret_arg("password", "New password", "WASIGO_NEW_PASSWORD"))
                .arg(secret_arg(
                    "confirm-password",
                    "New password confirmation",
                    "WASIGO_CONFIRM_PASSWORD",
                )),
        )
        .subcommand(
            Command::new("change")
                .about("Change the password of the signed-in account")
                .arg(secret_arg("current", "Current password", "WASIGO_PASSWORD"))
                .arg(secret_arg("new", "New password", "WASIGO_NEW_PASSWORD"))
                .arg(secret_arg(
                    "confirm-password",
                    "New password confirmation",
                    "WASIGO_CONFIRM_PASSWORD",
                )),
        )
}

fn routes_command() -> Command {
    Command::new("routes")
        .about("Published routes")
        .subcommand_required(true)
        .subcommand(
            Command::new("search")
                .about("Search available routes")
                .arg(Arg::new("origin").long("origin").help("Origin contains"))
                .arg(
                    Arg::new("destination")
                        .long("destination")
                        .help("Destination contains"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Departure date, example: 2025-03-01"),
                )
                .arg(
                    Arg::new("seats")
                        .long("seats")
                        .help("Minimum free seats")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("max-price")
                        .long("max-price")
                        .help("Maximum price per seat")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .help("Page size")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .help("Items to skip")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show one route")
                .arg(id_arg("Route id")),
        )
        .subcommand(page_args(
            Command::new("mine")
                .about("Routes published by the signed-in driver")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("disponible, en_progreso, completado or cancelado")
                        .value_parser(clap::value_parser!(RouteStatus)),
                ),
        ))
        .subcommand(
            Command::new("nearby")
                .about("Routes near a point")
                .arg(
                    Arg::new("lat")
                        .long("lat")
                        .help("Latitude")
                        .allow_negative_numbers(true)
                        .required(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("lng")
                        .long("lng")
                        .help("Longitude")
                        .allow_negative_numbers(true)
                        .required(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("radius")
                        .long("radius")
                        .help("Radius in km (default: 5)")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel one of your routes")
                .arg(id_arg("Route id"))
                .arg(Arg::new("reason").long("reason").help("Reason shown to passengers")),
        )
}

fn bookings_command() -> Command {
    Command::new("bookings")
        .about("Seat bookings")
        .subcommand_required(true)
        .subcommand(page_args(
            Command::new("mine").about("Your bookings").arg(
                Arg::new("status")
                    .long("status")
                    .help("pendiente, confirmado, en_progreso, completado or cancelado")
                    .value_parser(clap::value_parser!(BookingStatus)),
            ),
        ))
        .subcommand(
            Command::new("show")
                .about("Show one booking")
                .arg(id_arg("Booking id")),
        )
        .subcommand(
            Command::new("create")
                .about("Book a seat on a route")
                .arg(
                    Arg::new("route")
                        .long("route")
                        .help("Route id")
                        .required(true),
                )
                .arg(
                    Arg::new("payment")
                        .long("payment")
                        .help("tarjeta, paypal or billetera")
                        .required(true)
                        .value_parser(clap::value_parser!(PaymentKind)),
                )
                .arg(
                    Arg::new("seat")
                        .long("seat")
                        .help("Seat number")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(Arg::new("notes").long("notes").help("Notes for the driver")),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel a booking")
                .arg(id_arg("Booking id"))
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .help("Why the booking is cancelled")
                        .required(true),
                ),
        )
        .subcommand(Command::new("active").about("Bookings on trips in progress"))
}

fn ratings_command() -> Command {
    Command::new("ratings")
        .about("Trip ratings")
        .subcommand_required(true)
        .subcommand(page_args(
            Command::new("received").about("Ratings you received"),
        ))
        .subcommand(page_args(Command::new("given").about("Ratings you gave")))
        .subcommand(
            Command::new("average")
                .about("Average rating of a user")
                .arg(id_arg("User id")),
        )
}

fn driver_command() -> Command {
    Command::new("driver")
        .about("Driver dashboard")
        .subcommand_required(true)
        .subcommand(Command::new("home").about("Available routes and stats"))
        .subcommand(Command::new("profile").about("Driver profile"))
        .subcommand(Command::new("stats").about("Driver statistics"))
        .subcommand(
            Command::new("availability")
                .about("Show or set availability")
                .arg(
                    Arg::new("set")
                        .long("set")
                        .help("true or false")
                        .value_parser(clap::value_parser!(bool)),
                ),
        )
}

fn passenger_command() -> Command {
    Command::new("passenger")
        .about("Passenger dashboard")
        .subcommand_required(true)
        .subcommand(Command::new("profile").about("Passenger profile"))
        .subcommand(Command::new("balance").about("Wallet balance"))
        .subcommand(Command::new("stats").about("Passenger statistics"))
}
