use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::{ArgAction, Parser, Subcommand};
use gg_weather_core::{
    CityId, ClientConfig, Config, Presenter, Session, SubmitOutcome, WeatherError,
};
use inquire::{Password, Select};
use std::{
    fmt,
    io::{IsTerminal, stdin},
    process::ExitCode,
};
use tracing::debug;

use crate::render::TerminalPresenter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "gg-weather", version, about = "Current weather for Gyeonggi-do cities")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the data.go.kr service key and a default city.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City key (e.g. "suwon") or Korean name. Falls back to the default city.
        city: Option<String>,

        /// Local date/time "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long)]
        at: Option<String>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List supported cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Show { city, at, json } => show(city, at, json).await,
            Command::Cities => {
                for id in CityId::all() {
                    let e = id.entry();
                    println!("{:<12}{:<8}nx={:<4}ny={}", e.key, e.display_name, e.grid_x, e.grid_y);
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Select option showing both the Korean name and the key.
struct CityOption(CityId);

impl fmt::Display for CityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.display_name(), self.0)
    }
}

fn city_options() -> Vec<CityOption> {
    CityId::all().iter().copied().map(CityOption).collect()
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("data.go.kr service key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read service key")?;
    if key.trim().is_empty() {
        return Err(anyhow!("Service key must not be empty"));
    }
    cfg.set_service_key(key);

    let start = cfg
        .default_city
        .and_then(|c| CityId::all().iter().position(|id| *id == c))
        .unwrap_or(0);
    let city = Select::new("Default city:", city_options())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default city")?;
    cfg.set_default_city(city.0);

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(city: Option<String>, at: Option<String>, json: bool) -> Result<ExitCode> {
    let cfg = Config::load()?;
    let mut presenter = TerminalPresenter::new(json);

    let (city, client_config) = match plan_show(city.as_deref(), &cfg)? {
        ShowPlan::CityRequired => {
            presenter.prompt_city_required();
            return Ok(ExitCode::FAILURE);
        }
        ShowPlan::Fetch { city, client } => (city, client),
    };

    let now = match at {
        Some(text) => parse_local_time(&text)?,
        None => Local::now(),
    };
    debug!(%city, %now, "Submitting weather lookup");

    let session = Session::from_config(&client_config)?;

    Ok(match session.submit(Some(city), &now, &mut presenter).await {
        SubmitOutcome::Rendered(_) => ExitCode::SUCCESS,
        SubmitOutcome::Failed(_) | SubmitOutcome::CityRequired | SubmitOutcome::Ignored => {
            ExitCode::FAILURE
        }
    })
}

#[derive(Debug)]
enum ShowPlan {
    CityRequired,
    Fetch { city: CityId, client: ClientConfig },
}

/// The city precondition is checked before the service key, so a missing
/// city is reported even when nothing is configured yet.
fn plan_show(arg: Option<&str>, cfg: &Config) -> Result<ShowPlan> {
    let Some(city) = resolve_city(arg, cfg)? else {
        return Ok(ShowPlan::CityRequired);
    };

    Ok(ShowPlan::Fetch { city, client: cfg.client_config()? })
}

/// Command-line argument, then configured default, then an interactive pick.
/// `None` means no city could be obtained.
fn resolve_city(arg: Option<&str>, cfg: &Config) -> Result<Option<CityId>> {
    if let Some(text) = arg {
        return match CityId::try_from(text) {
            Ok(id) => Ok(Some(id)),
            Err(WeatherError::CityNotSelected) => Ok(None),
            Err(err) => Err(err.into()),
        };
    }

    if cfg.default_city.is_some() {
        return Ok(cfg.default_city);
    }

    if !stdin().is_terminal() {
        return Ok(None);
    }

    match Select::new("도시를 선택하세요:", city_options()).prompt_skippable() {
        Ok(choice) => Ok(choice.map(|c| c.0)),
        Err(err) => Err(err).context("Failed to read city selection"),
    }
}

fn parse_local_time(text: &str) -> Result<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M")
        .with_context(|| format!("Invalid --at value '{text}', expected \"YYYY-MM-DD HH:MM\""))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("'{text}' does not exist in the local time zone"))
}
