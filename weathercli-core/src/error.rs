use std::io;

use thiserror::Error;

/// Every way a weathercli invocation can fail.
///
/// The display text of each variant is the exact message shown to the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Could not determine the application data directory for this platform")]
    DataDirUnavailable,

    #[error("config directory error")]
    ConfigDirectory(#[source] io::Error),

    #[error("config file error")]
    ConfigFile(#[source] io::Error),

    #[error(
        "No config file found.\n\
         Run weather --api-key {{API KEY}} to set an API key.\n\
         Generate an API key at https://openweathermap.org/"
    )]
    ConfigNotFound,

    #[error(
        "API key not found.\n\
         Run weather --api-key {{API KEY}} to set an API key.\n\
         Generate an API key at https://openweathermap.org/"
    )]
    ApiKeyMissing,

    #[error("config file is not valid: {0}")]
    MalformedConfig(#[from] ini::ParseError),

    #[error("Access denied. Check your API key.")]
    Unauthorized,

    #[error("Can't find weather data for this city.")]
    CityNotFound,

    #[error("Something went wrong...({0})")]
    Status(u16),

    #[error("Couldn't read the server response.")]
    InvalidResponse,

    #[error("Couldn't reach the weather service: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WeatherError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
