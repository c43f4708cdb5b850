//! Cross-method aggregation
//!
//! Filters the per-method regression outputs down to the usable, enabled set
//! (always in canonical method order), averages their reserve estimates and
//! shapes them into chart rows.

use crate::types::{Method, MethodResult, MethodResults, MethodSelection};
use serde::Serialize;
use tracing::debug;

// ============================================================================
// Filtering
// ============================================================================

/// A method result that passed filtering, tagged with its method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidResult<'a> {
    pub method: Method,
    pub result: &'a MethodResult,
}

impl ValidResult<'_> {
    /// Remaining reserves; always present for a filtered result.
    pub fn remaining_oil_reserves(&self) -> f64 {
        self.result.remaining_oil_reserves.unwrap_or(0.0)
    }
}

/// Results that have a remaining-reserve estimate and whose method is enabled.
///
/// Output order is the canonical method order regardless of how the inputs
/// were produced or toggled.
pub fn filter_valid<'a>(
    results: &'a MethodResults,
    selection: &MethodSelection,
) -> Vec<ValidResult<'a>> {
    let valid: Vec<ValidResult<'a>> = results
        .present()
        .filter(|(_, r)| r.remaining_oil_reserves.is_some())
        .filter(|(m, _)| selection.is_enabled(*m))
        .map(|(method, result)| ValidResult { method, result })
        .collect();

    debug!(
        valid = valid.len(),
        enabled = selection.enabled_methods().len(),
        "Filtered method results"
    );
    valid
}

// ============================================================================
// Averaging
// ============================================================================

/// Arithmetic mean of the reserve estimates across valid results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveAverage {
    pub remaining_oil_reserves: f64,
    pub extractable_oil_reserves: f64,
}

/// Average both reserve fields over `valid`.
///
/// `None` when there is nothing to average, so "no data" never reads as 0.
/// A result that does not report extractable reserves contributes 0 to that
/// sum while still counting in the denominator.
pub fn average(valid: &[ValidResult<'_>]) -> Option<ReserveAverage> {
    if valid.is_empty() {
        return None;
    }

    let n = valid.len() as f64;
    let remaining: f64 = valid.iter().map(ValidResult::remaining_oil_reserves).sum();
    let extractable: f64 = valid
        .iter()
        .map(|v| v.result.extractable_oil_reserves.or_zero())
        .sum();

    Some(ReserveAverage {
        remaining_oil_reserves: remaining / n,
        extractable_oil_reserves: extractable / n,
    })
}

// ============================================================================
// Chart Rows
// ============================================================================

/// One bar on the reserves chart / one row of the method-results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub method: Method,
    pub remaining_oil_reserves: f64,
    pub extractable_oil_reserves: Option<f64>,
    pub a: f64,
    pub b: f64,
    pub r_squared: f64,
}

/// Chart data: bars per valid method plus the flat average line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub rows: Vec<ChartRow>,
    pub average: Option<ReserveAverage>,
}

impl ChartData {
    pub fn from_valid(valid: &[ValidResult<'_>]) -> Self {
        let rows = valid
            .iter()
            .map(|v| ChartRow {
                method: v.method,
                remaining_oil_reserves: v.remaining_oil_reserves(),
                extractable_oil_reserves: v.result.extractable_oil_reserves.value(),
                a: v.result.a,
                b: v.result.b,
                r_squared: v.result.r_squared,
            })
            .collect();

        Self {
            rows,
            average: average(valid),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.rows.iter().map(|r| r.method.display_name()).collect()
    }

    /// The average remaining reserve repeated once per label, for the overlay
    /// line. Empty when there is no average.
    pub fn average_series(&self) -> Vec<f64> {
        match self.average {
            Some(avg) => vec![avg.remaining_oil_reserves; self.rows.len()],
            None => Vec::new(),
        }
    }
}
