//! Interactive terminal session.
//!
//! Each plain input line replaces the search box text, as if typed; searches
//! are debounced and delivered back over a channel. Lines starting with `:`
//! are commands. Every state change is applied by this one loop.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use weather_core::{
    App, Config, History, SEARCH_DEBOUNCE, SearchInput, WeatherProvider, provider_from_config,
};

use crate::render;

const HELP: &str = "\
Type a city name and pause to search (each line replaces the search text).
Commands:
  :go        search the current text now
  :pick N    show weather for search result N
  :history   list search history (newest first)
  :open N    show history entry N again
  :rm N      remove history entry N
  :clear     clear the search text
  :help      show this help
  :quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Edit(String),
    Go,
    Pick(usize),
    Open(usize),
    Remove(usize),
    History,
    Clear,
    Help,
    Quit,
    Invalid(String),
}

impl SessionCommand {
    /// Parse one input line. Indices are 1-based on screen and 0-based here.
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.trim().strip_prefix(':') else {
            return SessionCommand::Edit(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let index = || {
            arg.and_then(|a| a.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
        };

        let parsed = match name {
            "go" => Some(SessionCommand::Go),
            "pick" => index().map(SessionCommand::Pick),
            "open" => index().map(SessionCommand::Open),
            "rm" => index().map(SessionCommand::Remove),
            "history" => Some(SessionCommand::History),
            "clear" => Some(SessionCommand::Clear),
            "help" => Some(SessionCommand::Help),
            "quit" | "q" => Some(SessionCommand::Quit),
            _ => None,
        };

        parsed.unwrap_or_else(|| SessionCommand::Invalid(line.trim().to_string()))
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let provider = provider_from_config(config)?;
    let history_path = Config::history_file_path()?;
    let history = History::load(&history_path)?;

    let mut session = Session::new(App::with_history(provider, history), history_path);
    session.run().await
}

struct Session<P> {
    app: App<P>,
    history_path: PathBuf,
}

impl<P: WeatherProvider> Session<P> {
    fn new(app: App<P>, history_path: PathBuf) -> Self {
        Self { app, history_path }
    }

    async fn run(&mut self) -> Result<()> {
        let (tx, mut searches) = mpsc::unbounded_channel::<String>();
        let mut input = SearchInput::new(SEARCH_DEBOUNCE, move |query| {
            // Receiver lives as long as the session loop.
            let _ = tx.send(query);
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{HELP}");
        if !self.app.history().is_empty() {
            println!("\n{}", render::history(self.app.history()));
        }

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(&line, &mut input).await {
                        break;
                    }
                }
                Some(query) = searches.recv() => {
                    self.search(&query).await;
                }
            }
        }

        drop(input);
        self.app.history().save(&self.history_path)
    }

    /// Returns false when the session should end.
    async fn handle_line(&mut self, line: &str, input: &mut SearchInput) -> bool {
        match SessionCommand::parse(line) {
            SessionCommand::Edit(text) => input.set_text(text),
            SessionCommand::Go => {
                if !input.submit() {
                    println!("Type a city name first.");
                }
            }
            SessionCommand::Pick(index) => {
                println!("Loading...");
                if !self.app.select_result_at(index).await {
                    println!("No search result #{}.", index + 1);
                    return true;
                }
                if self.app.take_clear_input() {
                    input.clear();
                }
                self.show_selection();
                persist(self.app.history(), &self.history_path);
            }
            SessionCommand::Open(index) => {
                if self.app.select_from_history(index) {
                    self.show_selection();
                } else {
                    println!("No history entry #{}.", index + 1);
                }
            }
            SessionCommand::Remove(index) => {
                let before = self.app.history().len();
                self.app.remove_displayed(index);
                if self.app.history().len() == before {
                    println!("No history entry #{}.", index + 1);
                } else {
                    persist(self.app.history(), &self.history_path);
                    println!("{}", render::history(self.app.history()));
                }
            }
            SessionCommand::History => println!("{}", render::history(self.app.history())),
            SessionCommand::Clear => input.clear(),
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => return false,
            SessionCommand::Invalid(cmd) => println!("Unknown command `{cmd}`. Try :help."),
        }
        true
    }

    async fn search(&mut self, query: &str) {
        if !query.trim().is_empty() {
            println!("Searching for \"{query}\"...");
        }

        self.app.handle_search(query).await;

        if let Some(message) = self.app.error() {
            println!("{}", render::error(message));
        }
        if let Some(panel) = self.app.results_panel() {
            println!("{}", render::results_panel(panel));
        }
    }

    fn show_selection(&self) {
        if let Some(message) = self.app.error() {
            println!("{}", render::error(message));
        }
        if let Some(selected) = self.app.selected() {
            println!("\n{}\n", render::detail(selected));
        }
    }
}

fn persist(history: &History, path: &Path) {
    if let Err(err) = history.save(path) {
        tracing::warn!(error = %err, path = %path.display(), "could not save history");
    }
}
