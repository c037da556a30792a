use tracing::debug;

use crate::{
    client::WeatherApi,
    error::Result,
    model::{CurrentReport, ForecastReport, Units},
    query::QueryBuilder,
};

/// Builds the query, fetches it and decodes the answer.
#[derive(Debug)]
pub struct WeatherService<A> {
    queries: QueryBuilder,
    api: A,
}

impl<A: WeatherApi> WeatherService<A> {
    pub fn new(queries: QueryBuilder, api: A) -> Self {
        Self { queries, api }
    }

    pub async fn current<S: AsRef<str>>(&self, city: &[S], units: Units) -> Result<CurrentReport> {
        let url = self.queries.current(city, units);
        let report = CurrentReport::try_from(self.api.fetch(&url).await?)?;
        debug!(city = %report.city, code = report.condition.id, "current weather decoded");
        Ok(report)
    }

    pub async fn forecast<S: AsRef<str>>(
        &self,
        city: &[S],
        units: Units,
        count: &str,
    ) -> Result<ForecastReport> {
        let url = self.queries.forecast(city, units, count);
        let report = ForecastReport::try_from(self.api.fetch(&url).await?)?;
        debug!(city = %report.city, periods = report.entries.len(), "forecast decoded");
        Ok(report)
    }
}
