use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::icon::Icon;

/// One 3-hour forecast point as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub main: String,
    pub description: String,
    /// Calendar date as reported by the provider; used for day bucketing.
    pub date: NaiveDate,
}

/// Sunrise and sunset of the day a series (or observation) was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunWindow {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunWindow {
    pub fn new(sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Self {
        Self { sunrise, sunset }
    }

    /// Inclusive on both ends.
    pub fn is_daylight(&self, at: DateTime<Utc>) -> bool {
        at >= self.sunrise && at <= self.sunset
    }

    /// Moves the window by whole days so that it lands on the local calendar
    /// day of `at`. Sunrise/sunset drift over a 5-day feed is ignored.
    pub fn aligned_to(&self, at: DateTime<Utc>, offset: FixedOffset) -> Self {
        let target = at.with_timezone(&offset).date_naive();
        let base = self.sunrise.with_timezone(&offset).date_naive();
        let days = Duration::days((target - base).num_days());

        Self {
            sunrise: self.sunrise + days,
            sunset: self.sunset + days,
        }
    }
}

/// A decoded 5-day / 3-hour forecast feed for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub city: String,
    pub samples: Vec<WeatherSample>,
    pub sun: Option<SunWindow>,
    /// Seconds east of UTC for the city.
    pub utc_offset_secs: i32,
}

impl ForecastSeries {
    pub fn new(city: impl Into<String>, samples: Vec<WeatherSample>) -> Self {
        Self {
            city: city.into(),
            samples,
            sun: None,
            utc_offset_secs: 0,
        }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        fixed_offset(self.utc_offset_secs)
    }
}

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature_c: f64,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub humidity_pct: u8,
    pub main: String,
    pub description: String,
    pub observed_at: DateTime<Utc>,
    pub sun: Option<SunWindow>,
    pub utc_offset_secs: i32,
}

impl CurrentWeather {
    pub fn utc_offset(&self) -> FixedOffset {
        fixed_offset(self.utc_offset_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyEntry {
    pub time: String,
    pub temperature: i32,
    pub humidity: u8,
    pub icon: Icon,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    /// Uppercased abbreviated weekday, e.g. "MON".
    pub label: String,
    /// Zero-padded month/day, e.g. "03/07".
    pub date: String,
    pub icon: Icon,
    pub high: i32,
    pub low: i32,
    pub description: String,
}

/// A single logged search. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub city: String,
    pub temperature_c: f64,
    pub main: String,
    pub description: String,
    pub captured_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn from_current(
        city: impl Into<String>,
        current: &CurrentWeather,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            city: city.into(),
            temperature_c: current.temperature_c,
            main: current.main.clone(),
            description: current.description.clone(),
            captured_at: at,
        }
    }
}

/// Out-of-range offsets fall back to UTC.
fn fixed_offset(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sun_window_bounds_are_inclusive() {
        let sunrise = Utc.with_ymd_and_hms(2026, 3, 7, 6, 0, 0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2026, 3, 7, 18, 0, 0).unwrap();
        let sun = SunWindow::new(sunrise, sunset);

        assert!(sun.is_daylight(sunrise));
        assert!(sun.is_daylight(sunset));
        assert!(!sun.is_daylight(sunset + Duration::seconds(1)));
    }

    #[test]
    fn aligned_window_moves_by_whole_days() {
        let sunrise = Utc.with_ymd_and_hms(2026, 3, 7, 6, 0, 0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2026, 3, 7, 18, 0, 0).unwrap();
        let sun = SunWindow::new(sunrise, sunset);

        let later = Utc.with_ymd_and_hms(2026, 3, 9, 21, 0, 0).unwrap();
        let aligned = sun.aligned_to(later, FixedOffset::east_opt(0).unwrap());

        assert_eq!(aligned.sunrise, Utc.with_ymd_and_hms(2026, 3, 9, 6, 0, 0).unwrap());
        assert_eq!(aligned.sunset, Utc.with_ymd_and_hms(2026, 3, 9, 18, 0, 0).unwrap());
        assert!(!aligned.is_daylight(later));
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let series = ForecastSeries {
            utc_offset_secs: 200_000,
            ..ForecastSeries::new("Nowhere", Vec::new())
        };
        assert_eq!(series.utc_offset().local_minus_utc(), 0);
    }
}
