use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use draftdesk::api::ApiClient;
use draftdesk::app::{initial_route, App};
use draftdesk::config::{default_config_path, Config};
use draftdesk::session::SessionStore;
use draftdesk::{logging, terminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "draftdesk")]
#[command(about = "Review and post AI-drafted tweet replies from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: <config dir>/draftdesk/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, env = "DRAFTDESK_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Forget the saved session
    SignOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(default_config_path);

    let session = SessionStore::default_location()
        .context("Could not determine a data directory for the session file")?;

    match cli.command {
        Some(Command::Init { force }) => {
            let path = config_path.context("Could not determine a config directory")?;
            Config::write_default(&path, force)?;
            println!("Wrote default config to {}", path.display());
            return Ok(());
        }
        Some(Command::SignOut) => {
            session.clear()?;
            println!("Signed out.");
            return Ok(());
        }
        None => {}
    }

    let config = Config::resolve(cli.config.as_deref())?.with_base_url(cli.base_url);
    logging::init(&config.log)?;
    info!(base_url = %config.api.base_url, "starting draftdesk");

    let api = ApiClient::new(&config.api)?;
    let route = initial_route(&api, &session).await;

    terminal::install_panic_hook();
    let mut tui = terminal::setup_terminal()?;

    let mut app = App::new(Arc::new(api), session, config.ui.clone());
    app.start(route);
    let result = app.run(&mut tui).await;

    terminal::restore_terminal()?;
    result
}
