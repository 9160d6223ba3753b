mod history;
mod logging;
mod tui;

use anyhow::{anyhow, Result};
use clap::Parser;
use marmita_core::{
    failure_message, format_day, format_money, parse_day, parse_price, today, view, Action,
    Decision, FileDocumentStore, LocalIdentityProvider, MarmitaService, Session, Settings, Stage,
    View, YearMonth,
};

pub type Service = MarmitaService<FileDocumentStore, LocalIdentityProvider>;

#[derive(Parser)]
#[command(name = "marmita")]
#[command(about = "Keep track of the meal boxes you buy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in (usage: login Ana)
    Login {
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// Set the meal box price (usage: price 18,50)
    Price { value: String },
    /// I bought a meal box today
    Yes {
        /// today, yesterday, -N, YYYY-MM-DD or DD/MM/YYYY
        #[arg(long)]
        day: Option<String>,
    },
    /// No meal box today
    No {
        #[arg(long)]
        day: Option<String>,
    },
    /// Show the answer for a day and the month so far
    Status {
        #[arg(long)]
        day: Option<String>,
    },
    /// Monthly summary (usage: summary --month 2024-03)
    Summary {
        #[arg(long)]
        month: Option<String>,
    },
    /// All months with records
    History,
    /// Open the Terminal User Interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}. Using default settings.", e);
        Settings::default()
    });
    let data_dir = settings.data_dir()?;
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    logging::init(&settings, &data_dir, interactive)?;

    let service = MarmitaService::new(
        FileDocumentStore::new(Some(data_dir.clone()))?,
        LocalIdentityProvider::new(Some(data_dir))?,
    );
    let currency = settings.currency_symbol.as_str();

    match cli.command {
        Some(Commands::Login { name }) => {
            match service.login(&name.join(" "), today()) {
                Ok(session) => {
                    if session.stage() == Stage::NeedsPrice {
                        println!("Welcome, {}!", session.user.display_name);
                        println!("Set your meal box price first: marmita price <value>");
                    } else {
                        print_view(&view(&session), currency);
                    }
                }
                Err(e) => report(Action::Login, &e),
            }
        }
        Some(Commands::Logout) => match service.restore(today()) {
            Ok(Some(session)) => match service.logout(session) {
                Ok(()) => println!("Logged out."),
                Err(e) => report(Action::Logout, &e),
            },
            Ok(None) => println!("Not logged in."),
            Err(e) => report(Action::Logout, &e),
        },
        Some(Commands::Whoami) => match service.restore(today()) {
            Ok(Some(session)) => println!("{} ({})", session.user.display_name, session.user.uid),
            Ok(None) => println!("Not logged in."),
            Err(e) => report(Action::Login, &e),
        },
        Some(Commands::Price { value }) => {
            let price = match parse_price(&value) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(());
                }
            };
            let result = require_session(&service).and_then(|mut session| {
                service.set_price(&mut session, price)?;
                Ok(session)
            });
            match result {
                Ok(session) => {
                    println!("Meal box price set to {}.", format_money(price, currency));
                    print_view(&view(&session), currency);
                }
                Err(e) => report(Action::SavePrice, &e),
            }
        }
        Some(Commands::Yes { day }) => decide(&service, Decision::Yes, day, currency),
        Some(Commands::No { day }) => decide(&service, Decision::No, day, currency),
        Some(Commands::Status { day }) => {
            let result = require_session(&service).and_then(|mut session| {
                if let Some(d) = day {
                    service.select_day(&mut session, parse_day(&d)?);
                }
                Ok(session)
            });
            match result {
                Ok(session) => print_view(&view(&session), currency),
                Err(e) => report(Action::LoadRecords, &e),
            }
        }
        Some(Commands::Summary { month }) => {
            let result = require_session(&service).and_then(|mut session| {
                if let Some(m) = month {
                    service.select_month(&mut session, m.parse::<YearMonth>()?);
                }
                Ok(session)
            });
            match result {
                Ok(session) => {
                    let v = view(&session);
                    print_summary(&v, currency);
                }
                Err(e) => report(Action::LoadRecords, &e),
            }
        }
        Some(Commands::History) => match require_session(&service) {
            Ok(session) => history::show_history(&service.history(&session), currency),
            Err(e) => report(Action::LoadRecords, &e),
        },
        Some(Commands::Tui) | None => {
            tui::run(service, settings.currency_symbol.clone())?;
        }
    }
    Ok(())
}

fn decide(service: &Service, decision: Decision, day: Option<String>, currency: &str) {
    let result = require_session(service).and_then(|mut session| {
        if let Some(d) = day {
            service.select_day(&mut session, parse_day(&d)?);
        }
        service.decide(&mut session, decision)?;
        Ok(session)
    });
    match result {
        Ok(session) => print_view(&view(&session), currency),
        Err(e) => report(Action::Decide, &e),
    }
}

fn require_session(service: &Service) -> Result<Session> {
    service
        .restore(today())?
        .ok_or_else(|| anyhow!("Not logged in. Run `marmita login <name>` first."))
}

fn report(action: Action, err: &anyhow::Error) {
    tracing::error!(?action, error = %format!("{:#}", err), "Action failed");
    eprintln!("{} ({})", failure_message(action), err);
}

fn print_view(v: &View, currency: &str) {
    println!("{} | {}", v.display_name, format_day(v.day));
    if v.stage == Stage::NeedsPrice {
        println!("No meal box price yet: marmita price <value>");
        return;
    }
    println!("Answer: {}", v.state.label());
    print_summary(v, currency);
}

fn print_summary(v: &View, currency: &str) {
    println!("Meal boxes in {}: {}", v.month.label(), v.summary.count);
    println!("Total spent: {}", format_money(v.summary.total, currency));
}
