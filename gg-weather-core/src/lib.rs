//! Core library for the `gg-weather` CLI.
//!
//! This crate defines:
//! - The static table of supported Gyeonggi-do cities
//! - Building the nowcast query and interpreting the response
//! - Mapping observations to a condition, icon and display card
//! - The HTTP client and the submit session driving a presenter
//! - Configuration & credentials handling
//!
//! It is used by `gg-weather-cli`, but the pipeline can be driven by any
//! presentation layer implementing [`Presenter`].

pub mod city;
pub mod config;
pub mod error;
pub mod interpret;
pub mod model;
pub mod present;
pub mod provider;
pub mod query;
pub mod session;

pub use city::{CityEntry, CityId};
pub use config::Config;
pub use error::WeatherError;
pub use model::{Condition, ObservationFields, Theme, WeatherSnapshot};
pub use present::DisplayCard;
pub use provider::{ClientConfig, KmaClient, ObservationClient};
pub use query::ObservationQuery;
pub use session::{Phase, Presenter, Report, Session, SubmitOutcome, fetch_snapshot};
