//! Statistics Calculator Module
//! Descriptive statistics over derived heritage series.

use crate::data::RegionTotals;
use serde::Serialize;

/// Descriptive statistics for a set of counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub p95: f64,
    pub p05: f64,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            p95: f64::NAN,
            p05: f64::NAN,
        }
    }
}

/// Region-total distribution with its extremes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub stats: SeriesStats,
    pub largest: Option<String>,
    pub smallest: Option<String>,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics, ignoring NaN values.
    pub fn describe(values: &[f64]) -> SeriesStats {
        let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = values.len();
        if n == 0 {
            return SeriesStats::default();
        }

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum = values.iter().sum::<f64>();
        let mean = sum / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        SeriesStats {
            count: n,
            sum,
            mean,
            median: Self::quantile(&sorted, 0.5),
            std: variance.sqrt(),
            variance,
            p95: Self::quantile(&sorted, 0.95),
            p05: Self::quantile(&sorted, 0.05),
        }
    }

    /// Value at fraction `q` of ascending `sorted`, interpolated between
    /// neighbours the way NumPy's default `quantile` does.
    fn quantile(sorted: &[f64], q: f64) -> f64 {
        let Some(&first) = sorted.first() else {
            return f64::NAN;
        };
        let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
        let below = pos.floor() as usize;
        let weight = pos - below as f64;
        let base = sorted.get(below).copied().unwrap_or(first);
        match sorted.get(below + 1) {
            Some(&above) if weight > 0.0 => base + (above - base) * weight,
            _ => base,
        }
    }

    /// Statistics of the region totals plus the regions holding the
    /// largest and smallest total (first one wins on ties).
    pub fn summarize_regions(totals: &RegionTotals) -> RegionSummary {
        let stats = Self::describe(&totals.totals());

        let mut largest: Option<(&str, f64)> = None;
        let mut smallest: Option<(&str, f64)> = None;
        for entry in &totals.entries {
            if largest.map_or(true, |(_, t)| entry.total > t) {
                largest = Some((entry.region.as_str(), entry.total));
            }
            if smallest.map_or(true, |(_, t)| entry.total < t) {
                smallest = Some((entry.region.as_str(), entry.total));
            }
        }

        RegionSummary {
            stats,
            largest: largest.map(|(r, _)| r.to_string()),
            smallest: smallest.map(|(r, _)| r.to_string()),
        }
    }
}
