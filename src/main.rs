use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bizdir::api::ProfileApi;
use bizdir::app::{App, Services};
use bizdir::config::Config;
use bizdir::logging;
use bizdir::profile::IdGenerator;
use bizdir::registration::WizardVariant;
use bizdir::session::{self, Session, SessionStore};
use bizdir::templates::{TemplateId, TemplateRenderer};
use bizdir::ui::{install_panic_hook, TerminalGuard};

#[derive(Parser)]
#[command(name = "bizdir")]
#[command(about = "Register a business and manage its directory profile")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registration wizard (default)
    Register {
        /// Skip the account credentials page
        #[arg(long)]
        profile_only: bool,
    },

    /// Edit the business profile (requires a valid session)
    Profile,

    /// Store a session token for authenticated commands
    Login {
        /// JWT issued by the directory service
        #[arg(long)]
        token: String,
    },

    /// Remove the stored session token
    Logout,

    /// Print the profile rendered with one of the layouts
    Preview {
        /// Layout number 1-8 (defaults to the active layout)
        #[arg(short, long)]
        template: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(
        cli.command,
        None | Some(Commands::Register { .. }) | Some(Commands::Profile)
    );

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        None => {
            cmd_register(config, false, logging_handle.log_file_path).await?;
        }
        Some(Commands::Register { profile_only }) => {
            cmd_register(config, profile_only, logging_handle.log_file_path).await?;
        }
        Some(Commands::Profile) => {
            cmd_profile(config, logging_handle.log_file_path).await?;
        }
        Some(Commands::Login { token }) => {
            cmd_login(&config, token)?;
        }
        Some(Commands::Logout) => {
            cmd_logout(&config)?;
        }
        Some(Commands::Preview { template }) => {
            cmd_preview(&config, template).await?;
        }
    }

    Ok(())
}

fn load_session(config: &Config) -> Result<Option<Session>> {
    SessionStore::new(config.session_path())
        .load()
        .context("Failed to read stored session")
}

async fn run_tui(mut app: App, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();
    let (guard, mut terminal) = TerminalGuard::enter()?;
    let result = app.run(&mut terminal).await;
    drop(terminal);
    guard.restore();

    if let Some(message) = app.exit_message() {
        println!("{}", message);
    }

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_register(
    config: Config,
    profile_only: bool,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let services = Services::for_registration(&config)?;
    let variant = if profile_only {
        WizardVariant::ProfileOnly
    } else {
        WizardVariant::CredentialsFirst
    };
    run_tui(App::registration(config, services, variant), log_file_path).await
}

async fn cmd_profile(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let session = load_session(&config)?;
    let services = Services::from_config(&config, session)?;
    let app = App::profile(config, services)?;
    run_tui(app, log_file_path).await
}

fn cmd_login(config: &Config, token: String) -> Result<()> {
    let session = Session::new(token);
    let store = SessionStore::new(config.session_path());
    store.save(&session).context("Failed to store session")?;

    match session.expires_at() {
        Some(exp) if exp > Utc::now() => {
            println!("Session stored. Valid until {}.", exp.format("%Y-%m-%d %H:%M UTC"));
        }
        Some(exp) => {
            println!(
                "Session stored, but it already expired at {}.",
                exp.format("%Y-%m-%d %H:%M UTC")
            );
        }
        None => println!("Session stored, but the token carries no expiry."),
    }
    Ok(())
}

fn cmd_logout(config: &Config) -> Result<()> {
    SessionStore::new(config.session_path())
        .clear()
        .context("Failed to remove session")?;
    println!("Signed out.");
    Ok(())
}

async fn cmd_preview(config: &Config, template: Option<u8>) -> Result<()> {
    let session = load_session(config)?;
    if !session::is_valid(session.as_ref(), Utc::now()) {
        bail!("No valid session. Run `bizdir login --token <TOKEN>` first.");
    }

    let services = Services::from_config(config, session)?;
    let Some(api) = services.profile else {
        bail!("Profile service is unavailable");
    };

    let document = api.fetch().await.context("Failed to load profile data")?;
    let data = document.into_profile(&mut IdGenerator::new());

    let template = match template {
        Some(number) => match TemplateId::from_number(number) {
            Some(id) => id,
            None => bail!("Unknown template {}. Choose 1-8.", number),
        },
        None => data.active_template,
    };

    let renderer = TemplateRenderer::new()?;
    let output = renderer.render(&data, template)?;
    println!("{}", output);
    Ok(())
}
