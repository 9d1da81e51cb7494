// src/stats/core.rs

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Median of already-sorted data: middle value, or mean of the middle pair.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Order statistic at index `floor(len * q)`, clamped to the last element.
pub fn quantile_floor_sorted(sorted: &[f64], q: f64) -> f64 {
    let idx = (sorted.len() as f64 * q).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Order statistics of a sample of final values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptive {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl Descriptive {
    pub fn from_sorted(sorted: &[f64]) -> Result<Self> {
        if sorted.is_empty() {
            return Err(SimError::EmptyData);
        }
        Ok(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: median_sorted(sorted),
            q25: quantile_floor_sorted(sorted, 0.25),
            q50: quantile_floor_sorted(sorted, 0.50),
            q75: quantile_floor_sorted(sorted, 0.75),
        })
    }

    pub fn from_values(values: &[f64]) -> Result<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self::from_sorted(&sorted)
    }
}
