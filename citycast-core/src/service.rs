use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::{CoreError, CoreResult},
    forecast::{self, round_temp},
    history::{HISTORY_LIMIT, HistoryStore},
    icon::{Icon, classify, classify_condition},
    model::{CurrentWeather, DaySummary, HistoryRecord, HourlyEntry},
    provider::WeatherProvider,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayView {
    pub city: String,
    pub temp: i32,
    pub high: i32,
    pub low: i32,
    pub description: String,
    pub icon: Icon,
    /// e.g. "07 Mar 2026, 02:00 PM", in city local time.
    pub observed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyView {
    pub city: String,
    pub entries: Vec<HourlyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyView {
    pub city: String,
    pub days: Vec<DaySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub city: String,
    pub temperature: f64,
    pub icon: Icon,
    /// e.g. "07-Mar-2026 09:00 AM", UTC.
    pub captured: String,
}

impl TodayView {
    /// Day/night aware when the observation carries a sun window.
    pub fn new(city: &str, current: &CurrentWeather, now: DateTime<Utc>) -> Self {
        let local_now = now.with_timezone(&current.utc_offset());

        Self {
            city: city.to_string(),
            temp: round_temp(current.temperature_c),
            high: round_temp(current.temp_max_c),
            low: round_temp(current.temp_min_c),
            description: current.description.clone(),
            icon: classify(&current.main, &current.description, Some(now), current.sun),
            observed: local_now.format("%d %b %Y, %I:%M %p").to_string(),
        }
    }
}

impl From<&HistoryRecord> for HistoryView {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            city: record.city.clone(),
            temperature: record.temperature_c,
            icon: classify_condition(&record.main, &record.description),
            captured: record.captured_at.format("%d-%b-%Y %I:%M %p").to_string(),
        }
    }
}

/// Glue between a weather provider, the forecast core and a history store.
///
/// Both collaborators are passed in; nothing here reaches for global state.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    history: Box<dyn HistoryStore>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, history: Box<dyn HistoryStore>) -> Self {
        Self { provider, history }
    }

    /// Looks up current weather and logs the search.
    #[instrument(skip(self))]
    pub async fn search(&self, city: &str, now: DateTime<Utc>) -> CoreResult<CurrentWeather> {
        let city = normalize_city(city)?;
        let current = self.provider.current(city).await?;

        self.history.append(HistoryRecord::from_current(city, &current, now))?;
        info!(city, temperature = current.temperature_c, "search recorded");

        Ok(current)
    }

    #[instrument(skip(self))]
    pub async fn today(&self, city: &str, now: DateTime<Utc>) -> CoreResult<TodayView> {
        let city = normalize_city(city)?;
        let current = self.provider.current(city).await?;

        Ok(TodayView::new(city, &current, now))
    }

    #[instrument(skip(self))]
    pub async fn hourly(&self, city: &str, now: Option<DateTime<Utc>>) -> CoreResult<HourlyView> {
        let city = normalize_city(city)?;
        let series = self.provider.forecast(city).await?;

        Ok(HourlyView {
            city: city.to_string(),
            entries: forecast::hourly(&series, now),
        })
    }

    #[instrument(skip(self))]
    pub async fn daily(&self, city: &str) -> CoreResult<DailyView> {
        let city = normalize_city(city)?;
        let series = self.provider.forecast(city).await?;

        Ok(DailyView {
            city: city.to_string(),
            days: forecast::daily(&series.samples),
        })
    }

    pub fn history(&self) -> CoreResult<Vec<HistoryView>> {
        Ok(self
            .history
            .recent(HISTORY_LIMIT)?
            .iter()
            .map(HistoryView::from)
            .collect())
    }
}

fn normalize_city(city: &str) -> CoreResult<&str> {
    let city = city.trim();
    if city.is_empty() {
        return Err(CoreError::EmptyCity);
    }
    Ok(city)
}
