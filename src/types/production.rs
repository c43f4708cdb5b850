//! Production history types: one record per imported year

use serde::{Deserialize, Serialize};

/// One year's production observation with derived water figures.
///
/// `water` and `water_cut` are kept as 2-decimal display strings, which is
/// the representation written to spreadsheets and compared on round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 1-based position among retained rows, assigned once at parse time
    pub index: usize,
    /// Year label exactly as imported, untrimmed (not necessarily numeric)
    pub year: String,
    /// Oil volume
    pub oil_volume: f64,
    /// Liquid (oil + water) volume
    pub liquid_volume: f64,
    /// `max(0, liquid - oil)`, formatted to 2 decimals
    pub water_volume: String,
    /// Year-over-year water cut (%), formatted to 2 decimals
    pub water_cut_percent: String,
    /// Marks records inside a regression window. Owned by the caller.
    #[serde(default)]
    pub active: bool,
}

/// Water volume derived from oil and liquid; never negative.
pub fn water_volume(oil: f64, liquid: f64) -> f64 {
    (liquid - oil).max(0.0)
}
