use anyhow::Context;
use chrono::Utc;
use citycast_core::{
    Config, JsonlHistoryStore, TodayView, WeatherService, config::API_KEY_ENV,
    openweather_from_config,
};
use clap::{Parser, Subcommand};
use inquire::Password;
use serde::Serialize;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "City weather search with history")]
pub struct Cli {
    /// Print results as JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Look up current weather for a city and add it to the history.
    Search {
        city: String,
    },

    /// Today's temperature, high/low and conditions.
    Today {
        city: String,
    },

    /// The next 12 forecast slots (3 hours apart).
    Hourly {
        city: String,

        /// Include slots that already started.
        #[arg(long)]
        all: bool,
    },

    /// Up to 5 days of high/low summaries.
    Daily {
        city: String,
    },

    /// The 6 most recent searches.
    History,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let service = match self.command {
            Command::Configure => return configure(),
            _ => build_service()?,
        };
        let now = Utc::now();

        match &self.command {
            Command::Configure => {}
            Command::Search { city } => {
                let current = service.search(city, now).await?;
                let view = TodayView::new(city.trim(), &current, now);
                self.print(&view, render::today)?;
            }
            Command::Today { city } => {
                let view = service.today(city, now).await?;
                self.print(&view, render::today)?;
            }
            Command::Hourly { city, all } => {
                let view = service.hourly(city, (!all).then_some(now)).await?;
                self.print(&view, render::hourly)?;
            }
            Command::Daily { city } => {
                let view = service.daily(city).await?;
                self.print(&view, render::daily)?;
            }
            Command::History => {
                let views = service.history()?;
                self.print(&views, |v| render::history(v))?;
            }
        }

        Ok(())
    }

    fn print<T: Serialize>(&self, view: &T, human: impl Fn(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(view).context("Failed to serialize output")?;
            println!("{json}");
        } else {
            print!("{}", human(view));
        }
        Ok(())
    }
}

fn build_service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    let provider = openweather_from_config(&config)?;
    let history_path = config.history_path()?;
    debug!(path = %history_path.display(), "using history file");

    Ok(WeatherService::new(
        Box::new(provider),
        Box::new(JsonlHistoryStore::new(history_path)),
    ))
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message(&format!("{API_KEY_ENV} overrides this value when set"))
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["citycast", "daily", "Oslo", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Daily { ref city } if city == "Oslo"));
    }

    #[test]
    fn hourly_all_flag() {
        let cli = Cli::try_parse_from(["citycast", "hourly", "Rome", "--all"]).unwrap();
        assert!(matches!(cli.command, Command::Hourly { all: true, .. }));
    }

    #[test]
    fn search_requires_city() {
        assert!(Cli::try_parse_from(["citycast", "search"]).is_err());
    }
}
