//! Reshapes a 5-day / 3-hour forecast feed into hourly rows and day summaries.
//!
//! Everything here is pure: no I/O, no shared state. Callers may run these
//! from any task.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::{
    icon::{classify, classify_condition},
    model::{DaySummary, ForecastSeries, HourlyEntry, WeatherSample},
};

/// Maximum number of rows returned by [`hourly`].
pub const HOURLY_LIMIT: usize = 12;

/// Maximum number of days returned by [`daily`].
pub const DAILY_LIMIT: usize = 5;

/// Length of one provider forecast slot.
pub const SLOT_HOURS: i64 = 3;

/// Upcoming samples from `now` on (or from the start of the feed when `now`
/// is `None`), in provider order, capped at [`HOURLY_LIMIT`].
///
/// Icons are day/night aware when the series carries a sun window. The first
/// row is flagged current when it starts less than one slot after `now`; with
/// no `now` nothing is flagged.
pub fn hourly(series: &ForecastSeries, now: Option<DateTime<Utc>>) -> Vec<HourlyEntry> {
    let offset = series.utc_offset();

    series
        .samples
        .iter()
        .filter(|s| now.is_none_or(|now| s.timestamp >= now))
        .take(HOURLY_LIMIT)
        .enumerate()
        .map(|(idx, s)| {
            let sun = series.sun.map(|sun| sun.aligned_to(s.timestamp, offset));
            HourlyEntry {
                time: format_clock(&s.timestamp.with_timezone(&offset)),
                temperature: round_temp(s.temperature_c),
                humidity: s.humidity_pct,
                icon: classify(&s.main, &s.description, Some(s.timestamp), sun),
                is_current: idx == 0 && now.is_some_and(|now| starts_within_slot(s.timestamp, now)),
            }
        })
        .collect()
}

/// One summary per provider calendar date, earliest first, capped at
/// [`DAILY_LIMIT`].
pub fn daily(samples: &[WeatherSample]) -> Vec<DaySummary> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&WeatherSample>> = BTreeMap::new();
    for sample in samples {
        buckets.entry(sample.date).or_default().push(sample);
    }

    buckets
        .iter()
        .take(DAILY_LIMIT)
        .filter_map(|(date, bucket)| summarize_day(*date, bucket))
        .collect()
}

fn summarize_day(date: NaiveDate, bucket: &[&WeatherSample]) -> Option<DaySummary> {
    let (low, high) = bucket.iter().map(|s| s.temperature_c).fold(None, |acc, t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((f64::min(lo, t), f64::max(hi, t))),
    })?;

    // Main label and description are picked independently and may come from
    // different samples.
    let main = most_common(bucket.iter().map(|s| s.main.as_str()))?;
    let description = most_common(bucket.iter().map(|s| s.description.as_str()))?;

    Some(DaySummary {
        label: date.format("%a").to_string().to_uppercase(),
        date: date.format("%m/%d").to_string(),
        icon: classify_condition(main, description),
        high: round_temp(high),
        low: round_temp(low),
        description: capitalize(description),
    })
}

/// Most frequent value; ties go to the value seen first.
pub fn most_common<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

/// 12-hour clock without a leading zero, e.g. "2:00 PM".
pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-I:%M %p").to_string()
}

/// Half-way values round to even.
pub fn round_temp(celsius: f64) -> i32 {
    celsius.round_ties_even() as i32
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn starts_within_slot(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start - now < Duration::hours(SLOT_HOURS)
}
