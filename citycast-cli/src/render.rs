//! Plain-text tables for the terminal.

use citycast_core::{DailyView, HistoryView, HourlyView, TodayView};

pub fn today(view: &TodayView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", view.city, view.observed));
    out.push_str(&format!("{} {}°C  {}\n", view.icon, view.temp, view.description));
    out.push_str(&format!("H {}°  L {}°\n", view.high, view.low));
    out
}

pub fn hourly(view: &HourlyView) -> String {
    let mut out = format!("{} - next {} slots\n", view.city, view.entries.len());
    for entry in &view.entries {
        let marker = if entry.is_current { "*" } else { " " };
        out.push_str(&format!(
            "{marker}{:>9}  {}  {:>4}°C  {:>3}%\n",
            entry.time, entry.icon, entry.temperature, entry.humidity
        ));
    }
    out
}

pub fn daily(view: &DailyView) -> String {
    let mut out = format!("{} - {} day forecast\n", view.city, view.days.len());
    for day in &view.days {
        out.push_str(&format!(
            "{} {}  {}  {:>4}° / {:>4}°  {}\n",
            day.label, day.date, day.icon, day.high, day.low, day.description
        ));
    }
    out
}

pub fn history(views: &[HistoryView]) -> String {
    if views.is_empty() {
        return "No searches yet.\n".to_string();
    }

    let mut out = String::new();
    for view in views {
        out.push_str(&format!(
            "{}  {:<20} {} {:.1}°C\n",
            view.captured, view.city, view.icon, view.temperature
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use citycast_core::{DaySummary, HourlyEntry, Icon};

    #[test]
    fn today_lists_high_and_low() {
        let view = TodayView {
            city: "Oslo".into(),
            temp: 4,
            high: 6,
            low: 1,
            description: "light snow".into(),
            icon: Icon::Snow,
            observed: "07 Mar 2026, 01:00 PM".into(),
        };
        let out = today(&view);
        assert!(out.contains("Oslo  07 Mar 2026, 01:00 PM"));
        assert!(out.contains("❄️ 4°C  light snow"));
        assert!(out.contains("H 6°  L 1°"));
    }

    #[test]
    fn hourly_marks_current_slot() {
        let view = HourlyView {
            city: "Oslo".into(),
            entries: vec![
                HourlyEntry {
                    time: "2:00 PM".into(),
                    temperature: 5,
                    humidity: 70,
                    icon: Icon::Cloud,
                    is_current: true,
                },
                HourlyEntry {
                    time: "5:00 PM".into(),
                    temperature: 3,
                    humidity: 75,
                    icon: Icon::Night,
                    is_current: false,
                },
            ],
        };
        let lines: Vec<String> = hourly(&view).lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with('*'));
        assert!(lines[2].starts_with(' '));
        assert!(lines[2].contains("5:00 PM"));
    }

    #[test]
    fn daily_rows() {
        let view = DailyView {
            city: "Oslo".into(),
            days: vec![DaySummary {
                label: "SAT".into(),
                date: "03/07".into(),
                icon: Icon::Rain,
                high: 8,
                low: 2,
                description: "Light rain".into(),
            }],
        };
        let out = daily(&view);
        assert!(out.contains("SAT 03/07"));
        assert!(out.contains("Light rain"));
    }

    #[test]
    fn history_rows() {
        let views = vec![HistoryView {
            city: "Rome".into(),
            temperature: 18.3,
            icon: Icon::Rain,
            captured: "07-Mar-2026 09:00 AM".into(),
        }];
        let out = history(&views);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("07-Mar-2026 09:00 AM  Rome"));
        assert!(out.trim_end().ends_with("18.3°C"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(history(&[]), "No searches yet.\n");
    }
}
