use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use earlycare_app::config::{self, EarlyCareConfig, Identity, LogFormat};
use earlycare_app::state::AppState;

mod terminal;

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = if config::has_config() {
        config::load_config()?
    } else {
        let fresh = EarlyCareConfig::new(DEFAULT_SERVICE_URL, Identity::Anonymous);
        config::save_config(&fresh)?;
        fresh
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
    }

    let state = AppState::connect(config);
    terminal::print_help();
    terminal::show_current(&state).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match terminal::dispatch(&state, line.trim()).await? {
            terminal::Flow::Continue => {}
            terminal::Flow::Quit => break,
        }
    }

    Ok(())
}
