use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::Write;
use tracing::info;
use weathercli_core::{
    APP_NAME, ConfigStore, Endpoints, HttpWeatherApi, QueryBuilder, Renderer, Units,
    WeatherService,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    about = "gets weather and temperature information for a city",
    disable_version_flag = true
)]
pub struct Cli {
    /// enter the city name
    pub city: Vec<String>,

    /// display the temperature in imperial units
    #[arg(short, long)]
    pub imperial: bool,

    /// show 3-hour forecast periods instead of the current weather
    #[arg(short, long)]
    pub forecast: bool,

    /// number of forecast periods (3h) to query, 1 to 40; sent to the API as given
    #[arg(short, long, default_value = "3", allow_hyphen_values = true)]
    pub number: String,

    /// print weather CLI version
    #[arg(long)]
    pub version: bool,

    /// create config.ini and store the API key
    #[arg(long, value_name = "API_KEY")]
    pub api_key: Option<String>,

    /// print the config file location and contents
    #[arg(long)]
    pub show_config: bool,

    /// log verbosity on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,
}

/// What one invocation does, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Version,
    SaveApiKey(String),
    ShowConfig,
    Forecast,
    Current,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.version {
            return Action::Version;
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Action::SaveApiKey(key.to_string());
        }
        if self.show_config {
            Action::ShowConfig
        } else if self.forecast {
            Action::Forecast
        } else {
            Action::Current
        }
    }

    pub async fn run<W: Write>(self, out: &mut W) -> Result<()> {
        if self.action() == Action::Version {
            return print_version(out);
        }

        let store = ConfigStore::from_platform()?;
        self.execute(&store, out).await
    }

    /// Perform the selected action against `store`, writing user output to `out`.
    pub async fn execute<W: Write>(self, store: &ConfigStore, out: &mut W) -> Result<()> {
        let action = self.action();
        info!(?action, "dispatching");

        match &action {
            Action::Version => print_version(out)?,
            Action::SaveApiKey(key) => {
                let path = store.set_api_key(key)?;
                writeln!(out, "API key successfully saved: {}", path.display())?;
            }
            Action::ShowConfig => {
                writeln!(out, "{}\n", store.path().display())?;
                let config = store.load()?;
                write!(out, "{config}")?;
            }
            Action::Forecast => {
                let units = Units::from_imperial_flag(self.imperial);
                let report = weather_service(store)?
                    .forecast(&self.city, units, &self.number)
                    .await?;
                let text = Renderer::default().render_forecast(&report, units);
                out.write_all(text.as_bytes())
                    .context("Failed to write forecast")?;
            }
            Action::Current => {
                let units = Units::from_imperial_flag(self.imperial);
                let report = weather_service(store)?.current(&self.city, units).await?;
                let text = Renderer::default().render_current(&report, units);
                out.write_all(text.as_bytes())
                    .context("Failed to write weather report")?;
            }
        }

        out.flush().context("Failed to flush output")?;
        Ok(())
    }
}

/// Service wired to the real endpoints with the stored API key.
fn weather_service(store: &ConfigStore) -> Result<WeatherService<HttpWeatherApi>> {
    let queries = QueryBuilder::new(Endpoints::default(), store.api_key()?);
    Ok(WeatherService::new(queries, HttpWeatherApi::new()))
}

fn print_version<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{APP_NAME} {}", env!("CARGO_PKG_VERSION"))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use weathercli_core::WeatherError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("weather").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn temp_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = ConfigStore::at(dir.path().join(APP_NAME).join("config.ini"));
        (dir, store)
    }

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&["New", "York"]);
        assert_eq!(cli.city, ["New", "York"]);
        assert_eq!(cli.number, "3");
        assert!(!cli.imperial && !cli.forecast);
        assert_eq!(cli.action(), Action::Current);
    }

    #[test]
    fn number_is_kept_verbatim() {
        assert_eq!(parse(&["-f", "-n", "abc", "Rome"]).number, "abc");
        assert_eq!(parse(&["-f", "-n", "-5", "Rome"]).number, "-5");
        assert_eq!(parse(&["-f", "--number", "99", "Rome"]).number, "99");
    }

    #[test]
    fn actions_follow_priority_order() {
        assert_eq!(
            parse(&["--version", "--api-key", "K", "--show-config"]).action(),
            Action::Version
        );
        assert_eq!(
            parse(&["--api-key", "K", "--show-config", "-f"]).action(),
            Action::SaveApiKey("K".into())
        );
        assert_eq!(parse(&["--show-config", "-f"]).action(), Action::ShowConfig);
        assert_eq!(parse(&["-f", "Oslo"]).action(), Action::Forecast);
    }

    #[test]
    fn empty_api_key_falls_through() {
        assert_eq!(parse(&["--api-key", "", "Oslo"]).action(), Action::Current);
    }

    #[tokio::test]
    async fn version_output() {
        let mut out = Vec::new();
        parse(&["--version"]).run(&mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("weathercli {}\n", env!("CARGO_PKG_VERSION"))
        );
    }

    #[tokio::test]
    async fn save_then_show_config() {
        let (_dir, store) = temp_store();

        let mut out = Vec::new();
        parse(&["--api-key", "SECRET"]).execute(&store, &mut out).await.unwrap();
        let saved = String::from_utf8(out).unwrap();
        assert!(saved.starts_with("API key successfully saved: "));
        assert!(saved.contains("config.ini"));

        let mut out = Vec::new();
        parse(&["--show-config"]).execute(&store, &mut out).await.unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(
            shown,
            format!("{}\n\n[openweather]\napi_key = SECRET\n\n", store.path().display())
        );
    }

    #[tokio::test]
    async fn weather_without_config_fails_before_any_request() {
        let (_dir, store) = temp_store();

        let mut out = Vec::new();
        let err = parse(&["Berlin"]).execute(&store, &mut out).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<WeatherError>(),
            Some(WeatherError::ConfigNotFound)
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn forecast_without_key_reports_missing_key() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();

        let mut out = Vec::new();
        let err = parse(&["-f", "Berlin"]).execute(&store, &mut out).await.unwrap_err();

        assert!(err.to_string().starts_with("API key not found."));
    }

    #[tokio::test]
    async fn current_without_key_reports_missing_key() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();

        let mut out = Vec::new();
        let err = parse(&["New", "York"]).execute(&store, &mut out).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<WeatherError>(),
            Some(WeatherError::ApiKeyMissing)
        ));
        assert!(out.is_empty());
    }
}
