//! Core library for the `citycast` weather tool.
//!
//! This crate defines:
//! - Icon classification for weather conditions
//! - Hourly and daily aggregation of 3-hour forecast feeds
//! - The OpenWeather client and the provider abstraction
//! - An append-only search history store
//! - Configuration & credentials handling
//!
//! It is used by `citycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod icon;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use forecast::{daily, hourly};
pub use history::{HISTORY_LIMIT, HistoryStore, JsonlHistoryStore, MemoryHistoryStore};
pub use icon::{Icon, classify, classify_condition};
pub use model::{
    CurrentWeather, DaySummary, ForecastSeries, HistoryRecord, HourlyEntry, SunWindow,
    WeatherSample,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, openweather_from_config};
pub use service::{DailyView, HistoryView, HourlyView, TodayView, WeatherService};
