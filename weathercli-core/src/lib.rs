//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The on-disk config store holding the OpenWeather API key
//! - Request URL construction and the HTTP client
//! - Response models and terminal rendering
//!
//! It is used by `weathercli`, but can also be reused by other binaries.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod query;
pub mod service;

/// Name of the per-user application directory.
pub const APP_NAME: &str = "weathercli";

pub use client::{HttpWeatherApi, WeatherApi};
pub use config::{Config, ConfigStore};
pub use display::{DisplayStyle, Renderer, select_display_params};
pub use error::WeatherError;
pub use model::{CurrentReport, ForecastReport, Units};
pub use query::{Endpoints, QueryBuilder};
pub use service::WeatherService;
