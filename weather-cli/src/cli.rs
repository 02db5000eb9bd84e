use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use weather_core::{App, Config, History, ResultsPanel, provider_from_config};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up current weather by city name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Search for a city, pick a match and show its current weather.
    Show {
        /// City name to search for.
        query: String,
    },

    /// List previously viewed locations, newest first.
    History {
        /// Remove entry N (as numbered in the listing).
        #[arg(long, value_name = "N")]
        remove: Option<usize>,
    },

    /// Type-ahead search session (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { query } => show(&query).await,
            Command::History { remove } => history(remove),
            Command::Interactive => session::run(&Config::load()?).await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    cfg.set_api_key(api_key.trim().to_string());
    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(query: &str) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let history_path = Config::history_file_path()?;
    let mut app = App::with_history(provider, History::load(&history_path)?);

    app.handle_search(query).await;
    if let Some(message) = app.error() {
        bail!("{message}");
    }

    let labels = match app.results_panel() {
        Some(ResultsPanel::List(rows)) => rows.iter().map(|r| r.label()).collect::<Vec<_>>(),
        Some(ResultsPanel::NoResults) | None => {
            println!("{}", render::results_panel(ResultsPanel::NoResults));
            return Ok(());
        }
    };

    let choice = Select::new("Select a location:", labels)
        .raw_prompt()
        .context("No location selected")?;

    app.select_result_at(choice.index).await;
    if let Some(message) = app.error() {
        bail!("{message}");
    }

    if let Some(selected) = app.selected() {
        println!("{}", render::detail(selected));
    }

    app.history().save(&history_path)
}

fn history(remove: Option<usize>) -> anyhow::Result<()> {
    let path = Config::history_file_path()?;
    let mut history = History::load(&path)?;

    if let Some(n) = remove {
        let removed = n
            .checked_sub(1)
            .and_then(|i| history.remove_displayed(i))
            .ok_or_else(|| anyhow::anyhow!("No history entry #{n}"))?;
        history.save(&path)?;
        println!("Removed {}, {}", removed.weather.name, removed.weather.country);
    }

    println!("{}", render::history(&history));
    Ok(())
}
