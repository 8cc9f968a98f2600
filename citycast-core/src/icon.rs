use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::SunWindow;

/// Display category for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Thunderstorm,
    Snow,
    Rain,
    Cloud,
    Mist,
    Night,
    Clear,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Thunderstorm => "thunderstorm",
            Icon::Snow => "snow",
            Icon::Rain => "rain",
            Icon::Cloud => "cloud",
            Icon::Mist => "mist",
            Icon::Night => "night",
            Icon::Clear => "clear",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Icon::Thunderstorm => "⛈️",
            Icon::Snow => "❄️",
            Icon::Rain => "🌧️",
            Icon::Cloud => "☁️",
            Icon::Mist => "🌫️",
            Icon::Night => "🌙",
            Icon::Clear => "☀️",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Classifies a condition into an [`Icon`].
///
/// Checks run in a fixed order and the first match wins: thunder, snow,
/// rain/drizzle, cloud, mist/fog/haze, then night, then clear. Precipitation
/// and cloud cover always take priority over day/night, and night is only
/// considered when both `at` and `sun` are supplied.
pub fn classify(
    main: &str,
    description: &str,
    at: Option<DateTime<Utc>>,
    sun: Option<SunWindow>,
) -> Icon {
    let main = main.to_lowercase();
    let description = description.to_lowercase();

    if main.contains("thunder") || description.contains("thunder") {
        return Icon::Thunderstorm;
    }
    if main.contains("snow") {
        return Icon::Snow;
    }
    if main.contains("rain") || description.contains("drizzle") {
        return Icon::Rain;
    }
    if main.contains("cloud") {
        return Icon::Cloud;
    }
    if ["mist", "fog", "haze"].iter().any(|k| main.contains(k)) {
        return Icon::Mist;
    }

    match (at, sun) {
        (Some(at), Some(sun)) if !sun.is_daylight(at) => Icon::Night,
        _ => Icon::Clear,
    }
}

/// Classification without day/night context.
pub fn classify_condition(main: &str, description: &str) -> Icon {
    classify(main, description, None, None)
}
