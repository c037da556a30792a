use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, WeatherError};

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Unit system requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn from_imperial_flag(imperial: bool) -> Self {
        if imperial { Units::Imperial } else { Units::Metric }
    }

    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature unit letter shown after the degree sign.
    pub fn symbol(&self) -> char {
        match self {
            Units::Metric => 'C',
            Units::Imperial => 'F',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Temperature {
    pub temp: f64,
    pub feels_like: f64,
}

/// Current conditions for one city.
/// See <https://openweathermap.org/current#name>.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReport {
    pub city: String,
    pub condition: Condition,
    pub temperature: Temperature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub condition: Condition,
    pub temperature: Temperature,
    /// Period start in UTC, as sent in `dt_txt`.
    pub time_utc: NaiveDateTime,
    /// Period start in the city's local time.
    pub local_time: NaiveDateTime,
}

impl ForecastEntry {
    /// Local period start formatted `YYYY-MM-DD HH:MM`.
    pub fn local_label(&self) -> String {
        self.local_time.format(LOCAL_TIME_FORMAT).to_string()
    }
}

/// `time_utc` moved by `offset_secs`, or `None` when either is out of range.
pub fn shift_by_offset(time_utc: NaiveDateTime, offset_secs: i64) -> Option<NaiveDateTime> {
    Duration::try_seconds(offset_secs).and_then(|offset| time_utc.checked_add_signed(offset))
}

/// 3-hour forecast periods for one city, in the order the API sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub city: String,
    /// Shift from UTC in seconds.
    pub timezone: i64,
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    weather: Vec<Condition>,
    main: Temperature,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    weather: Vec<Condition>,
    main: Temperature,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: Vec<Condition>) -> Result<Condition> {
    weather.into_iter().next().ok_or(WeatherError::InvalidResponse)
}

impl TryFrom<Value> for CurrentReport {
    type Error = WeatherError;

    fn try_from(value: Value) -> Result<Self> {
        let parsed: OwCurrentResponse =
            serde_json::from_value(value).map_err(|_| WeatherError::InvalidResponse)?;

        Ok(CurrentReport {
            city: parsed.name,
            condition: first_condition(parsed.weather)?,
            temperature: parsed.main,
        })
    }
}

impl TryFrom<Value> for ForecastReport {
    type Error = WeatherError;

    fn try_from(value: Value) -> Result<Self> {
        let parsed: OwForecastResponse =
            serde_json::from_value(value).map_err(|_| WeatherError::InvalidResponse)?;

        let offset = parsed.city.timezone;
        let entries = parsed
            .list
            .into_iter()
            .map(|entry| {
                let time_utc = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
                    .map_err(|_| WeatherError::InvalidResponse)?;
                let local_time =
                    shift_by_offset(time_utc, offset).ok_or(WeatherError::InvalidResponse)?;
                Ok(ForecastEntry {
                    condition: first_condition(entry.weather)?,
                    temperature: entry.main,
                    time_utc,
                    local_time,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastReport {
            city: parsed.city.name,
            timezone: parsed.city.timezone,
            entries,
        })
    }
}
