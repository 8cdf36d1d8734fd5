//! Line-oriented front end over the command layer.

use std::path::Path;

use earlycare_app::commands;
use earlycare_app::config::{self, Identity};
use earlycare_app::state::AppState;
use earlycare_app::views::{ProfileGate, Report, ReportView, Screen, TipsView};
use earlycare_core::models::submission::{Gender, RiskFactor};

pub enum Flow {
    Continue,
    Quit,
}

pub fn print_help() {
    println!(
        "commands:
  go <home|test|tips|emergency|reports>   switch screen
  profile                                 show profile status
  save-profile <name> [email]             create or update your profile
  name <text> | age <n> | gender <male|female|other>
  flag <smoking|alcohol|pain|lump|weight_loss> <yes|no>
  attach <path> | detach
  next | back | submit
  retry                                   reload your latest report
  signin <token> | signout
  config | help | quit
  reset                                   forget saved settings and quit"
    );
}

pub async fn dispatch(state: &AppState, line: &str) -> eyre::Result<Flow> {
    let mut parts = line.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default().trim();

    let outcome: Result<(), String> = match cmd {
        "" => Ok(()),
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            print_help();
            Ok(())
        }
        "go" => match Screen::parse(arg) {
            Some(target) => commands::navigate(state, target).await.map(|_| ()),
            None => Err(format!("unknown screen: {arg}")),
        },
        "profile" => {
            print_profile(&commands::profile_gate(state).await);
            Ok(())
        }
        "save-profile" => {
            let mut words = arg.rsplitn(2, ' ');
            let last = words.next().unwrap_or_default();
            let (name, email) = match words.next() {
                Some(rest) if last.contains('@') => (rest.to_string(), Some(last.to_string())),
                _ => (arg.to_string(), None),
            };
            commands::save_profile(state, name, email).await
        }
        "name" => commands::set_name(state, arg.to_string()).await,
        "age" => commands::set_age(state, arg.to_string()).await,
        "gender" => match parse_gender(arg) {
            Some(gender) => commands::set_gender(state, gender).await,
            None => Err(format!("unknown gender: {arg}")),
        },
        "flag" => {
            let (factor, value) = arg.split_once(' ').unwrap_or((arg, "yes"));
            match (parse_factor(factor), parse_yes_no(value.trim())) {
                (Some(factor), Some(value)) => commands::set_flag(state, factor, value).await,
                _ => Err(format!("usage: flag <factor> <yes|no>, got: {arg}")),
            }
        }
        "attach" => commands::attach(state, Path::new(arg))
            .await
            .map(|notice| println!("{notice}")),
        "detach" => commands::detach(state).await,
        "next" => commands::next_step(state).await.map(|_| ()),
        "back" => commands::previous_step(state).await.map(|_| ()),
        "submit" => match commands::submit(state).await {
            Ok(report) => {
                println!("Test submitted successfully!");
                print_report(&report);
                Ok(())
            }
            Err(e) => Err(e),
        },
        "retry" => {
            print_report_view(&commands::retry_report(state).await);
            Ok(())
        }
        "signin" if !arg.is_empty() => {
            commands::set_identity(
                state,
                Identity::Token {
                    token: arg.to_string(),
                },
            )
            .await;
            persist(state).await
        }
        "signout" => {
            commands::set_identity(state, Identity::Anonymous).await;
            persist(state).await
        }
        "config" => {
            let info = commands::config_info(state).await;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        "reset" => match config::delete_config() {
            Ok(()) => {
                println!("Saved settings removed.");
                return Ok(Flow::Quit);
            }
            Err(e) => Err(e.to_string()),
        },
        other => Err(format!("unknown command: {other} (try `help`)")),
    };

    if let Err(message) = outcome {
        eprintln!("! {message}");
    }
    if !matches!(cmd, "" | "help" | "profile" | "config" | "retry" | "submit") {
        show_current(state).await;
    }
    Ok(Flow::Continue)
}

pub async fn show_current(state: &AppState) {
    let screen = commands::current_screen(state).await;
    match screen {
        Screen::Splash | Screen::Home => {
            let home = commands::home(state).await;
            if let Some(greeting) = home.greeting {
                println!("{greeting}");
            }
            for card in home.cards {
                let lock = if card.enabled { "" } else { " (sign in required)" };
                println!("  [{:?}] {}{lock}", card.target, card.title);
            }
        }
        Screen::Test => {
            if let Ok(view) = commands::wizard_view(state).await {
                println!(
                    "Step {} of 4: {} ({}%)",
                    view.step.number(),
                    view.title,
                    view.progress_percent
                );
                let draft = &view.draft;
                println!(
                    "  name={:?} age={:?} gender={}",
                    draft.name, draft.age, draft.gender
                );
                for factor in view.step.risk_factors() {
                    let answer = if draft.flag(*factor) { "yes" } else { "no" };
                    println!("  {}: {answer} ({})", factor.label(), factor.hint());
                }
                if let Some(path) = &draft.attachment {
                    println!("  image: {}", path.display());
                }
            }
        }
        Screen::Result | Screen::Reports => {
            print_report_view(&commands::report(state).await);
        }
        Screen::Tips => match commands::tips(state).await {
            TipsView::Loading { placeholders } => {
                for _ in 0..placeholders {
                    println!("  ...");
                }
            }
            TipsView::Tips(tips) => {
                for tip in tips {
                    println!("  [{}] {}: {}", tip.icon_name(), tip.title, tip.description);
                }
            }
        },
        Screen::Emergency => {
            println!("  If this is an emergency, call your local emergency number now.");
        }
    }
    if screen.shows_bottom_nav() {
        println!("-- home | test | tips | reports | emergency --");
    }
}

fn print_profile(gate: &ProfileGate) {
    match gate {
        ProfileGate::Loading => println!("Loading..."),
        ProfileGate::Anonymous => println!("Not signed in."),
        ProfileGate::SetupRequired => {
            println!("Welcome! Set up your profile with `save-profile <name> [email]`.")
        }
        ProfileGate::Ready(profile) => {
            println!("{}", profile.name);
            if let Some(email) = &profile.email {
                println!("{email}");
            }
        }
        ProfileGate::Unavailable(e) => println!("Profile unavailable: {e}"),
    }
}

fn print_report_view(view: &ReportView) {
    match view {
        ReportView::Loading => println!("Loading..."),
        ReportView::Empty => println!("{}", earlycare_app::views::NO_REPORT_MESSAGE),
        ReportView::Report(report) => print_report(report),
        ReportView::Unavailable(e) => println!("Could not load your report: {e} (try `retry`)"),
    }
}

fn print_report(report: &Report) {
    println!("{}", report.badge);
    println!("  {} ({}, {})", report.name, report.age, report.gender);
    println!("  Risk factors: {}", report.risk_factor_summary());
    println!("  {}", report.advice);
    println!("  {}", report.submitted_at);
}

async fn persist(state: &AppState) -> Result<(), String> {
    let snapshot = state.config.lock().await.clone();
    config::save_config(&snapshot).map_err(|e| e.to_string())
}

fn parse_gender(s: &str) -> Option<Gender> {
    Gender::ALL
        .into_iter()
        .find(|g| g.label().eq_ignore_ascii_case(s) || g.label()[..1].eq_ignore_ascii_case(s))
}

fn parse_factor(s: &str) -> Option<RiskFactor> {
    match s {
        "smoking" => Some(RiskFactor::Smoking),
        "alcohol" => Some(RiskFactor::Alcohol),
        "pain" => Some(RiskFactor::Pain),
        "lump" => Some(RiskFactor::Lump),
        "weight_loss" | "weight-loss" => Some(RiskFactor::WeightLoss),
        _ => None,
    }
}

fn parse_yes_no(s: &str) -> Option<bool> {
    match s {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}
