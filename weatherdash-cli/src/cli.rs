use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weatherdash_core::{
    Config, Dashboard, FileStore, LocationQuery, LookupOutcome, OpenWeatherClient, Theme,
    UnitSystem, favorites::Favorites, provider::client_from_config, startup_query,
};

use crate::{facts, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, units and default city.
    Configure,

    /// Show current weather and the 5-day forecast.
    ///
    /// Without a city or coordinates the configured default city is used.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Override the configured unit system.
        #[arg(long)]
        units: Option<UnitSystem>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List recent locations, or look one up again.
    Favorites {
        /// 1-based position in the list.
        #[arg(long)]
        open: Option<usize>,
    },

    /// Show or toggle the light/dark theme.
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

type AppDashboard = Dashboard<OpenWeatherClient, FileStore>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                units,
                json,
            } => {
                let config = Config::load()?;
                let query = match city {
                    Some(city) => LocationQuery::city(&city)
                        .ok_or_else(|| anyhow!("City name must not be empty"))?,
                    None => startup_query(lat.zip(lon), &config.default_city),
                };

                let mut dash = open_dashboard(&config)?;
                if let Some(units) = units {
                    dash.set_units(units);
                }
                show(&mut dash, query, &config, json).await
            }
            Command::Favorites { open } => {
                let config = Config::load()?;

                let Some(position) = open else {
                    let store = FileStore::new(Config::data_dir()?);
                    print!("{}", render::favorites(Favorites::load(&store).list()));
                    return Ok(());
                };

                let mut dash = open_dashboard(&config)?;
                let query = position
                    .checked_sub(1)
                    .and_then(|i| dash.favorites().get(i))
                    .map(|fav| fav.query())
                    .ok_or_else(|| {
                        anyhow!(
                            "No recent location at position {position} ({} stored)",
                            dash.favorites().len()
                        )
                    })?;

                show(&mut dash, query, &config, false).await
            }
            Command::Theme { toggle } => {
                let mut store = FileStore::new(Config::data_dir()?);
                let mut theme = Theme::load(&store);
                if toggle {
                    theme = theme
                        .toggle_and_persist(&mut store)
                        .context("Failed to save theme preference")?;
                }
                println!("Theme: {theme}");
                Ok(())
            }
        }
    }
}

fn open_dashboard(config: &Config) -> anyhow::Result<AppDashboard> {
    let client = client_from_config(config)?;
    let store = FileStore::new(Config::data_dir()?);
    Ok(Dashboard::new(client, store, config.units))
}

async fn show(
    dash: &mut AppDashboard,
    query: LocationQuery,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let outcome = {
        let _loading = render::Loading::start(&query.to_string());
        dash.lookup(query).await
    };

    match outcome {
        Ok(LookupOutcome::Displayed(view)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::view(&view, &config.icon_base_url));
                println!("\nDid you know? {}", facts::random_fact());
            }
            Ok(())
        }
        Ok(LookupOutcome::Superseded { .. }) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Lookup failed");
            let message = e.user_message();
            Err(anyhow::Error::new(e).context(message))
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let start = UnitSystem::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    config.units = Select::new("Units:", UnitSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;
    config.default_city = default_city;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
