use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{CoreError, CoreResult},
    model::{CurrentWeather, ForecastSeries, SunWindow, WeatherSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> CoreResult<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(CoreError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> CoreResult<CurrentWeather> {
        let parsed: OwCurrentResponse = self.fetch("weather", city).await?;
        parsed.into_current(city)
    }

    async fn forecast(&self, city: &str) -> CoreResult<ForecastSeries> {
        let parsed: OwForecastResponse = self.fetch("forecast", city).await?;
        parsed.into_series(city)
    }
}

// Every field is optional on the wire so a missing one surfaces as
// `InvalidSample` naming the field, not as a generic decode error.

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    #[serde(default)]
    timezone: i32,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Default, Deserialize)]
struct OwCity {
    name: Option<String>,
    #[serde(default)]
    timezone: i32,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: OwCity,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl OwCurrentResponse {
    fn into_current(self, query: &str) -> CoreResult<CurrentWeather> {
        let main = self.main.ok_or_else(|| missing("main"))?;
        let (condition, description) = condition(&self.weather)?;
        let temperature_c = main.temp.ok_or_else(|| missing("main.temp"))?;

        Ok(CurrentWeather {
            city: self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| query.to_string()),
            temperature_c,
            temp_max_c: main.temp_max.unwrap_or(temperature_c),
            temp_min_c: main.temp_min.unwrap_or(temperature_c),
            humidity_pct: main.humidity.ok_or_else(|| missing("main.humidity"))?,
            main: condition,
            description,
            observed_at: unix_to_utc(self.dt.ok_or_else(|| missing("dt"))?)?,
            sun: sun_window(self.sys.sunrise, self.sys.sunset)?,
            utc_offset_secs: self.timezone,
        })
    }
}

impl OwForecastResponse {
    fn into_series(self, query: &str) -> CoreResult<ForecastSeries> {
        let samples = self
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(ForecastSeries {
            city: self.city.name.filter(|n| !n.is_empty()).unwrap_or_else(|| query.to_string()),
            samples,
            sun: sun_window(self.city.sunrise, self.city.sunset)?,
            utc_offset_secs: self.city.timezone,
        })
    }
}

impl OwForecastEntry {
    fn into_sample(self) -> CoreResult<WeatherSample> {
        let main = self.main.ok_or_else(|| missing("list[].main"))?;
        let (condition, description) = condition(&self.weather)?;
        let dt_txt = self.dt_txt.ok_or_else(|| missing("list[].dt_txt"))?;
        let date = NaiveDateTime::parse_from_str(&dt_txt, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| CoreError::invalid_sample(format!("bad dt_txt '{dt_txt}': {e}")))?
            .date();

        Ok(WeatherSample {
            timestamp: unix_to_utc(self.dt.ok_or_else(|| missing("list[].dt"))?)?,
            temperature_c: main.temp.ok_or_else(|| missing("list[].main.temp"))?,
            humidity_pct: main.humidity.ok_or_else(|| missing("list[].main.humidity"))?,
            main: condition,
            description,
            date,
        })
    }
}

fn condition(weather: &[OwWeather]) -> CoreResult<(String, String)> {
    let first = weather.first().ok_or_else(|| missing("weather[0]"))?;
    let main = first.main.clone().ok_or_else(|| missing("weather[0].main"))?;
    let description = first
        .description
        .clone()
        .ok_or_else(|| missing("weather[0].description"))?;
    Ok((main, description))
}

fn sun_window(sunrise: Option<i64>, sunset: Option<i64>) -> CoreResult<Option<SunWindow>> {
    match (sunrise, sunset) {
        (Some(rise), Some(set)) if rise > 0 && set > 0 => {
            Ok(Some(SunWindow::new(unix_to_utc(rise)?, unix_to_utc(set)?)))
        }
        _ => Ok(None),
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::invalid_sample(format!("missing field `{field}`"))
}

fn unix_to_utc(ts: i64) -> CoreResult<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| CoreError::invalid_sample(format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    #[test]
    fn forecast_entry_becomes_sample() {
        let entry: OwForecastEntry = serde_json::from_value(json!({
            "dt": 1772884800,
            "main": { "temp": 7.4, "humidity": 81 },
            "weather": [{ "main": "Rain", "description": "light rain" }],
            "dt_txt": "2026-03-07 12:00:00"
        }))
        .unwrap();

        let sample = entry.into_sample().unwrap();
        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap());
        assert_eq!(sample.temperature_c, 7.4);
        assert_eq!(sample.humidity_pct, 81);
        assert_eq!(sample.main, "Rain");
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
    }

    #[test]
    fn missing_temperature_is_rejected() {
        let entry: OwForecastEntry = serde_json::from_value(json!({
            "dt": 1772884800,
            "main": { "humidity": 81 },
            "weather": [{ "main": "Rain", "description": "light rain" }],
            "dt_txt": "2026-03-07 12:00:00"
        }))
        .unwrap();

        let err = entry.into_sample().unwrap_err();
        assert!(matches!(err, CoreError::InvalidSample(_)));
        assert!(err.to_string().contains("list[].main.temp"));
    }

    #[test]
    fn missing_condition_is_rejected() {
        let entry: OwForecastEntry = serde_json::from_value(json!({
            "dt": 1772884800,
            "main": { "temp": 3.0, "humidity": 81 },
            "weather": [],
            "dt_txt": "2026-03-07 12:00:00"
        }))
        .unwrap();

        assert!(entry.into_sample().unwrap_err().to_string().contains("weather[0]"));
    }

    #[test]
    fn current_falls_back_to_query_name() {
        let parsed: OwCurrentResponse = serde_json::from_value(json!({
            "dt": 1772884800,
            "main": { "temp": 21.0, "humidity": 40 },
            "weather": [{ "main": "Clear", "description": "clear sky" }]
        }))
        .unwrap();

        let current = parsed.into_current("Lisbon").unwrap();
        assert_eq!(current.city, "Lisbon");
        assert_eq!(current.temp_max_c, 21.0);
        assert_eq!(current.sun, None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
