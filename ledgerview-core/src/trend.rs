//! Fixed-width sparkline series.
//!
//! Stat cards always draw [`TREND_WINDOW`] points. Longer series keep their
//! most recent points, shorter ones repeat cyclically. When there is no real
//! data at all the window is filled with placeholder values; those points are
//! flagged `synthetic` and must never be read as figures.

use rand::Rng;
use serde::Serialize;

pub const TREND_WINDOW: usize = 30;

/// Upper bound of placeholder revenue points
pub const REVENUE_FILLER_CEILING: f64 = 10_000.0;
/// Upper bound of placeholder expense points
pub const EXPENSE_FILLER_CEILING: f64 = 8_000.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TrendPoint {
    pub value: f64,
    /// Visual filler, not derived from the dataset
    pub synthetic: bool,
}

impl TrendPoint {
    pub fn real(value: f64) -> Self {
        Self {
            value,
            synthetic: false,
        }
    }

    pub fn filler(value: f64) -> Self {
        Self {
            value,
            synthetic: true,
        }
    }
}

/// Source of placeholder values for empty series
pub trait FillerSource {
    /// A value in `[0, ceiling)`
    fn next_filler(&mut self, ceiling: f64) -> f64;
}

/// Uniformly random filler, the default for display
#[derive(Debug, Default)]
pub struct RandomFiller;

impl FillerSource for RandomFiller {
    fn next_filler(&mut self, ceiling: f64) -> f64 {
        if ceiling <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..ceiling)
    }
}

/// Constant filler, handy for reproducible output
#[derive(Debug, Clone, Copy)]
pub struct FixedFiller(pub f64);

impl FillerSource for FixedFiller {
    fn next_filler(&mut self, ceiling: f64) -> f64 {
        self.0.min(ceiling)
    }
}

/// Pad or trim `series` to exactly [`TREND_WINDOW`] points.
pub fn pad_trend(series: &[f64], ceiling: f64, filler: &mut impl FillerSource) -> Vec<TrendPoint> {
    if series.len() >= TREND_WINDOW {
        return series[series.len() - TREND_WINDOW..]
            .iter()
            .copied()
            .map(TrendPoint::real)
            .collect();
    }

    if series.is_empty() {
        return (0..TREND_WINDOW)
            .map(|_| TrendPoint::filler(filler.next_filler(ceiling)))
            .collect();
    }

    (0..TREND_WINDOW)
        .map(|i| TrendPoint::real(series[i % series.len()]))
        .collect()
}

/// Elementwise `a - b`; a point is synthetic if either input is.
pub fn difference(a: &[TrendPoint], b: &[TrendPoint]) -> Vec<TrendPoint> {
    a.iter()
        .zip(b)
        .map(|(x, y)| TrendPoint {
            value: x.value - y.value,
            synthetic: x.synthetic || y.synthetic,
        })
        .collect()
}

pub fn values(points: &[TrendPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}
