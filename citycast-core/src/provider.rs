use crate::{
    Config, CurrentWeather, ForecastSeries, error::CoreResult,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and 3-hour forecast feeds.
///
/// Implementations translate transport and status failures into
/// [`CoreError`](crate::CoreError) variants and validate every sample before
/// returning it.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> CoreResult<CurrentWeather>;

    async fn forecast(&self, city: &str) -> CoreResult<ForecastSeries>;
}

/// Construct the OpenWeather client from config.
pub fn openweather_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `citycast configure` or set OWM_API_KEY."
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key).with_timeout(config.request_timeout());
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(provider)
}
