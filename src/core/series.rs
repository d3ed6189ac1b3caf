//! Time-series normalization and chart derivation

use crate::core::request::{Granularity, IntradayInterval};
use anyhow::anyhow;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

const SERIES_KEY_MARKER: &str = "Time Series";
const CLOSE_FIELD: &str = "4. close";

/// Extracts closing prices from a raw time-series payload, oldest first.
///
/// The series container is the first top-level key containing `"Time Series"`. Dates are
/// sorted newest first, optionally truncated to the `limit` most recent observations and
/// then reversed. A missing or malformed container yields an empty series; an unparseable
/// close yields `NaN`.
pub fn extract_closing_prices(payload: &Value, limit: Option<usize>) -> Vec<f64> {
    let Some(object) = payload.as_object() else {
        return vec![];
    };
    let Some(series) = object
        .iter()
        .find(|(key, _)| key.contains(SERIES_KEY_MARKER))
        .and_then(|(_, value)| value.as_object())
    else {
        return vec![];
    };

    let mut points: Vec<(&String, &Value)> = series.iter().collect();
    points.sort_unstable_by(|a, b| b.0.cmp(a.0));
    if let Some(limit) = limit {
        points.truncate(limit);
    }

    points
        .into_iter()
        .rev()
        .map(|(_, point)| parse_close(point))
        .collect()
}

fn parse_close(point: &Value) -> f64 {
    match point.get(CLOSE_FIELD) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Chart window selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    OneDay,
    #[default]
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
    ];

    /// Parses a timeframe tag; anything unrecognized falls back to one week.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Backing series granularity and the number of most recent points to keep.
    pub fn backing(&self) -> (Granularity, usize) {
        match self {
            Timeframe::OneDay => (Granularity::Intraday(IntradayInterval::FiveMinutes), 78),
            Timeframe::OneWeek => (Granularity::Daily, 5),
            Timeframe::OneMonth => (Granularity::Weekly, 4),
            Timeframe::ThreeMonths => (Granularity::Weekly, 12),
            Timeframe::OneYear => (Granularity::Monthly, 12),
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Timeframe::OneDay => "1D",
                Timeframe::OneWeek => "1W",
                Timeframe::OneMonth => "1M",
                Timeframe::ThreeMonths => "3M",
                Timeframe::OneYear => "1Y",
            }
        )
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Timeframe::OneDay),
            "1w" => Ok(Timeframe::OneWeek),
            "1m" => Ok(Timeframe::OneMonth),
            "3m" => Ok(Timeframe::ThreeMonths),
            "1y" => Ok(Timeframe::OneYear),
            _ => Err(anyhow!("Invalid timeframe: {}", s)),
        }
    }
}

/// The four raw payloads a chart can be drawn from.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    pub intraday: Option<Value>,
    pub daily: Option<Value>,
    pub weekly: Option<Value>,
    pub monthly: Option<Value>,
}

impl SeriesSet {
    fn payload(&self, granularity: Granularity) -> Option<&Value> {
        match granularity {
            Granularity::Intraday(_) => self.intraday.as_ref(),
            Granularity::Daily => self.daily.as_ref(),
            Granularity::Weekly => self.weekly.as_ref(),
            Granularity::Monthly => self.monthly.as_ref(),
        }
    }

    /// Normalized series for a timeframe; empty when the backing payload is missing.
    pub fn series_for(&self, timeframe: Timeframe) -> Vec<f64> {
        let (granularity, count) = timeframe.backing();
        self.payload(granularity)
            .map(|payload| extract_closing_prices(payload, Some(count)))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSummary {
    pub latest: f64,
    pub oldest: f64,
    pub change: f64,
    pub change_pct: f64,
    pub min: f64,
    pub max: f64,
    /// Axis labels from top to bottom
    pub y_labels: [f64; 4],
}

impl ChartSummary {
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Insufficient,
    Ready(ChartSummary),
}

/// Derives the chart summary for a normalized series. Fewer than two points, or no
/// finite value to range over, is reported as `Chart::Insufficient`.
pub fn summarize_chart(series: &[f64]) -> Chart {
    if series.len() < 2 {
        return Chart::Insufficient;
    }
    let Some((min, max)) = finite_range(series) else {
        return Chart::Insufficient;
    };

    // Endpoints skip non-finite points; finite_range guarantees at least one exists.
    let mut finite = series.iter().copied().filter(|v| v.is_finite());
    let oldest = finite.next().unwrap_or(min);
    let latest = finite.next_back().unwrap_or(oldest);
    let change = latest - oldest;
    let change_pct = if oldest != 0.0 {
        change / oldest * 100.0
    } else {
        0.0
    };
    let range = max - min;

    Chart::Ready(ChartSummary {
        latest,
        oldest,
        change,
        change_pct,
        min,
        max,
        y_labels: [max, max - range * 0.33, max - range * 0.66, min],
    })
}

fn finite_range(series: &[f64]) -> Option<(f64, f64)> {
    series
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Projects a series onto a `width` x `height` canvas with y growing downwards.
/// A flat series is drawn along the bottom edge.
pub fn plot_points(series: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if series.len() < 2 {
        return vec![];
    }
    let Some((min, max)) = finite_range(series) else {
        return vec![];
    };
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let last = (series.len() - 1) as f64;

    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = i as f64 / last * width;
            let y = height - (v - min) / range * height;
            (x, y)
        })
        .collect()
}
