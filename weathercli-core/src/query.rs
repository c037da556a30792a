use reqwest::Url;

use crate::model::Units;

pub const BASE_WEATHER_API_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const BASE_FORECAST_API_URL: &str = "http://api.openweathermap.org/data/2.5/forecast";

/// Base URLs of the two OpenWeather endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub current: Url,
    pub forecast: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current: Url::parse(BASE_WEATHER_API_URL).expect("static URL is valid"),
            forecast: Url::parse(BASE_FORECAST_API_URL).expect("static URL is valid"),
        }
    }
}

/// Builds request URLs for one API key.
///
/// City tokens are joined with single spaces and form-encoded, so spaces
/// become `+`. Nothing about the city is validated; no tokens yield `q=`.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoints: Endpoints,
    api_key: String,
}

impl QueryBuilder {
    pub fn new(endpoints: Endpoints, api_key: impl Into<String>) -> Self {
        Self { endpoints, api_key: api_key.into() }
    }

    pub fn current<S: AsRef<str>>(&self, city: &[S], units: Units) -> Url {
        let city = join_city(city);
        let mut url = self.endpoints.current.clone();
        url.query_pairs_mut()
            .append_pair("q", &city)
            .append_pair("units", units.as_str())
            .append_pair("appid", &self.api_key);
        url
    }

    /// `count` is passed through verbatim, even when it is not a number.
    pub fn forecast<S: AsRef<str>>(&self, city: &[S], units: Units, count: &str) -> Url {
        let city = join_city(city);
        let mut url = self.endpoints.forecast.clone();
        url.query_pairs_mut()
            .append_pair("q", &city)
            .append_pair("units", units.as_str())
            .append_pair("cnt", count)
            .append_pair("appid", &self.api_key);
        url
    }
}

fn join_city<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

/// Copy of `url` with the `appid` value masked, for logging.
pub fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked
}
