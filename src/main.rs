//! Fancount - track a social profile's follower count
//!
//! Fetches the follower count from the upstream profile API on a configured
//! schedule, caches the resolved value on disk, and prints it on demand,
//! falling back gracefully when the upstream is unavailable.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fancount::cli::{Cli, Command, SetupForm};
use fancount::config::Settings;
use fancount::fetch::CountClient;
use fancount::state::StateStore;
use fancount::tracker::{RefreshOutcome, Tracker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fancount=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show => {
            let tracker = build_tracker()?;
            // Due refreshes piggyback on reads; a failed cycle still shows
            // the cached or fallback value.
            tracker.refresh(false).await?;
            println!("{}", tracker.display_count());
        }
        Command::Refresh { force } => {
            let tracker = build_tracker()?;
            let outcome = tracker.refresh(force).await?;
            report_outcome(&outcome);
        }
        Command::Setup {
            profile,
            every,
            fallback_text,
            average_window,
        } => {
            let form = SetupForm {
                profile,
                every,
                fallback_text,
                average_window,
            };
            let new_settings = match form.validate() {
                Ok(settings) => settings,
                Err(errors) => {
                    for error in &errors {
                        eprintln!("error: {error}");
                    }
                    std::process::exit(1);
                }
            };

            let previous = Settings::load().context("failed to load existing settings")?;
            let first_time = !previous.is_configured();
            new_settings.save().context("failed to save settings")?;
            println!("Settings saved.");

            // First-time setup fetches immediately so `show` has a value.
            if first_time {
                let tracker = tracker_with(new_settings)?;
                let outcome = tracker.refresh(true).await?;
                report_outcome(&outcome);
            }
        }
        Command::Status => {
            let tracker = build_tracker()?;
            print_status(&tracker);
        }
        Command::Watch { poll } => {
            let tracker = build_tracker()?;
            watch(&tracker, poll).await?;
        }
        Command::Reset => {
            reset()?;
            println!("Configuration and state deleted.");
        }
    }

    Ok(())
}

fn build_tracker() -> Result<Tracker> {
    let settings = Settings::load().context("failed to load settings")?;
    tracker_with(settings)
}

fn tracker_with(settings: Settings) -> Result<Tracker> {
    let store = StateStore::new().context("could not determine the data directory")?;
    let client = CountClient::new().context("failed to construct the HTTP client")?;
    Ok(Tracker::new(settings, store, client))
}

fn report_outcome(outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::NotConfigured => {
            eprintln!("No profile configured; run `fancount setup --profile <name>` first.");
        }
        RefreshOutcome::NotDue => println!("Not due yet; use --force to fetch anyway."),
        RefreshOutcome::Updated(count) => println!("Follower count updated: {count}"),
        RefreshOutcome::FellBack(text) => println!("No valid count; stored fallback: {text}"),
        RefreshOutcome::Retained => println!("No valid count; kept the previous value."),
    }
}

fn print_status(tracker: &Tracker) {
    let settings = tracker.settings();

    println!("Profile:        {}", display_or(&settings.profile, "(unset)"));
    println!(
        "Check every:    {} ({})",
        settings.every,
        settings
            .every_secs()
            .map_or_else(|| "invalid".to_string(), |secs| format!("{secs}s")),
    );
    println!(
        "Fallback text:  {}",
        display_or(&settings.fallback_text, "(use last value)")
    );
    println!(
        "Average window: {}",
        display_or(&settings.average_window, "(disabled)")
    );
    println!("Last checked:   {}", format_last_checked(tracker.last_checked()));
    println!("Current value:  {}", tracker.display_count());

    if settings.is_configured() {
        let url = tracker.client().build_request_url(
            &settings.profile,
            settings.average_window_secs(),
            Local::now().date_naive(),
        );
        println!("Request URL:    {url}");
    }
}

fn display_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

fn format_last_checked(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(
            || "never".to_string(),
            |utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        )
}

/// Runs refresh-if-due on a fixed poll cadence until ctrl-c.
///
/// The poll interval only controls how often due-ness is checked; the
/// configured `every` setting decides whether a fetch actually happens, so
/// a short poll does not hammer the upstream.
async fn watch(tracker: &Tracker, poll_secs: u64) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs.max(1)));
    info!(poll_secs, "watching; press ctrl-c to stop");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tracker.refresh(false).await {
                    Ok(RefreshOutcome::NotConfigured) => {
                        warn!("no profile configured; waiting for setup");
                    }
                    Ok(outcome) => info!(?outcome, "refresh tick"),
                    Err(err) => warn!(error = %err, "refresh failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn reset() -> Result<()> {
    if let Some(path) = Settings::config_path() {
        match std::fs::remove_file(&path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                return Err(err).with_context(|| format!("failed to delete {}", path.display()));
            }
            _ => {}
        }
    }
    let store = StateStore::new().context("could not determine the data directory")?;
    store.delete().context("failed to delete tracker state")?;
    Ok(())
}
