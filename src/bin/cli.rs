//! boardwatch CLI
//!
//! Scheduled execution entry point: log in, crawl, persist the watermark,
//! send the digest when there is something to report.

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};

use boardwatch::{
    config::Config,
    error::{AppError, Result},
    notify::{self, Mailer},
    pipeline,
    services::Session,
    storage::StateStore,
    utils::time,
};

/// boardwatch - Forum Board Watcher
#[derive(Parser, Debug)]
#[command(name = "boardwatch", version, about = "Forum board watcher and digest mailer")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Path to the persisted state file
    #[arg(long, default_value = "data/state.json")]
    state: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in, crawl the board, and send the digest if warranted
    Run {
        /// Forum account the crawl authenticates as
        #[arg(short, long)]
        username: String,

        /// Password for the forum account
        #[arg(short, long)]
        password: String,

        /// User whose posts and score are watched
        #[arg(short, long)]
        target: String,

        /// Digest recipient; repeat the flag for multiple addresses
        #[arg(short, long = "email")]
        emails: Vec<String>,

        /// Print the digest to stdout instead of sending email
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show persisted state (last score and watermark)
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let store = StateStore::new(&cli.state);

    match cli.command {
        Command::Run {
            username,
            password,
            target,
            emails,
            dry_run,
        } => {
            if emails.is_empty() && !dry_run {
                return Err(AppError::config(
                    "no --email recipients given (use --dry-run to print instead)",
                ));
            }

            let started = std::time::Instant::now();
            let run_started_at = Local::now().naive_local();

            let state = store.load().await?;
            log::info!(
                "Watching {} on {} since {}",
                target,
                config.site.board_url,
                time::format_watermark(state.watermark)
            );

            let session = Session::login(&config, &username, &password).await?;
            let outcome = pipeline::run_crawl(
                &session,
                &config,
                &target,
                state.watermark,
                run_started_at,
            )
            .await?;

            // The run succeeded; advance the watermark to the run start so
            // nothing posted mid-crawl is skipped next time.
            store.save(outcome.score, run_started_at).await?;

            log::info!("Crawl finished in {:.1?}", started.elapsed());

            let Some(html) = notify::digest_for(&outcome, &target, state.last_score) else {
                log::info!("Nothing new; no digest sent");
                return Ok(());
            };

            if dry_run {
                println!("{html}");
            } else {
                let smtp_password = config
                    .mail
                    .password
                    .clone()
                    .or_else(|| std::env::var("SMTP_PASSWORD").ok())
                    .ok_or_else(|| {
                        AppError::config("mail.password not set and SMTP_PASSWORD is not set")
                    })?;
                Mailer::new(config.mail.clone(), smtp_password).send(&emails, &html)?;
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }

        Command::Info => {
            log::info!("State file: {}", store.path().display());
            let state = store.load().await?;
            log::info!("Last score: {}", state.last_score);
            log::info!("Watermark: {}", time::format_watermark(state.watermark));
        }
    }

    Ok(())
}
