//! Mood trend projection over a user's entries.
//!
//! Everything here is pure: callers pass the entries (newest first, as
//! returned by the entry store) and a window, and recompute whenever either
//! changes.

use std::{fmt, str::FromStr};

use serde::Serialize;
use time::{format_description::FormatItem, macros::format_description, Duration, OffsetDateTime};

use crate::entries::Entry;

pub const DEFAULT_ADVICE: &str =
    "Start journaling regularly to get personalized mood insights and advice.";
pub const UNTITLED: &str = "Untitled";

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl Window {
    pub fn length(self) -> Option<Duration> {
        match self {
            Window::Week => Some(Duration::days(7)),
            Window::Month => Some(Duration::days(30)),
            Window::Year => Some(Duration::days(365)),
            Window::All => None,
        }
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Window::Week),
            "month" => Ok(Window::Month),
            "year" => Ok(Window::Year),
            "all" => Ok(Window::All),
            other => Err(format!("unknown window {other:?}")),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Window::Week => "week",
            Window::Month => "month",
            Window::Year => "year",
            Window::All => "all",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub mood: f64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub window: Window,
    pub points: Vec<TrendPoint>,
    pub advice: String,
    /// Fewer than two points render as a placeholder instead of a chart.
    pub show_chart: bool,
}

pub fn project(entries: &[Entry], window: Window) -> Vec<TrendPoint> {
    project_at(entries, window, OffsetDateTime::now_utc())
}

/// Keeps entries at or after `now - window`, oldest first.
pub fn project_at(entries: &[Entry], window: Window, now: OffsetDateTime) -> Vec<TrendPoint> {
    let cutoff = window.length().map(|len| now - len);
    entries
        .iter()
        .filter(|e| cutoff.map_or(true, |c| e.created_at >= c))
        .map(to_point)
        .rev()
        .collect()
}

/// Advice of the most recent entry, or the default prompt.
pub fn current_advice(entries: &[Entry]) -> &str {
    entries
        .first()
        .map(|e| e.ai_advice.as_str())
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_ADVICE)
}

/// Trend for the current instant.
pub fn report(entries: &[Entry], window: Window) -> TrendReport {
    let points = project(entries, window);
    build_report(entries, window, points)
}

pub fn report_at(entries: &[Entry], window: Window, now: OffsetDateTime) -> TrendReport {
    let points = project_at(entries, window, now);
    build_report(entries, window, points)
}

fn build_report(entries: &[Entry], window: Window, points: Vec<TrendPoint>) -> TrendReport {
    TrendReport {
        window,
        show_chart: points.len() >= 2,
        points,
        advice: current_advice(entries).to_string(),
    }
}

fn to_point(e: &Entry) -> TrendPoint {
    TrendPoint {
        date: e
            .created_at
            .format(DATE_FORMAT)
            .unwrap_or_else(|_| e.created_at.date().to_string()),
        mood: e.mood_score,
        title: e
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
            .to_string(),
    }
}
