//! Oil Recovery Coefficient (ORC / КИН)
//!
//! `ORC = (cumulative oil production + remaining reserves) / geological reserves`
//!
//! Geological reserves come from the user and may be missing or non-positive;
//! both mean "no ORC", not an error. The result keeps three decimals as text
//! so trailing zeros survive into displays and spreadsheets.

use serde::Serialize;

/// Decimal places of the reported coefficient.
pub const ORC_DECIMALS: usize = 3;

/// A computed recovery coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrcValue {
    pub value: f64,
    /// `value` rounded to three decimals, e.g. `"1.000"`
    pub formatted: String,
}

impl std::fmt::Display for OrcValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Compute the ORC. Pure: same inputs, same output.
pub fn compute_orc(
    geological_reserves: Option<f64>,
    cumulative_oil_production: f64,
    remaining_oil_reserves: f64,
) -> Option<OrcValue> {
    let geological = geological_reserves.filter(|g| g.is_finite() && *g > 0.0)?;
    let value = (cumulative_oil_production + remaining_oil_reserves) / geological;

    Some(OrcValue {
        value,
        formatted: format!("{:.*}", ORC_DECIMALS, value),
    })
}

/// Read the geological-reserves text field. Empty, unparseable, non-finite
/// and non-positive input all mean "not provided".
pub fn parse_geological_reserves(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let value = crate::production::parse_decimal(input);
    (value > 0.0).then_some(value)
}

// ============================================================================
// Display Breakdown
// ============================================================================

/// Figures shown next to the ORC: both numerator terms, their total and the
/// coefficient itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrcBreakdown {
    pub cumulative_oil_production: f64,
    pub remaining_oil_reserves: f64,
    pub total: f64,
    pub orc: Option<OrcValue>,
}

impl OrcBreakdown {
    pub fn new(
        geological_reserves: Option<f64>,
        cumulative_oil_production: f64,
        remaining_oil_reserves: f64,
    ) -> Self {
        Self {
            cumulative_oil_production,
            remaining_oil_reserves,
            total: cumulative_oil_production + remaining_oil_reserves,
            orc: compute_orc(
                geological_reserves,
                cumulative_oil_production,
                remaining_oil_reserves,
            ),
        }
    }

    /// Human-readable lines, volumes with thousands separators. Empty when
    /// there is no ORC to explain.
    pub fn lines(&self) -> Vec<String> {
        let Some(orc) = &self.orc else {
            return Vec::new();
        };
        vec![
            format!(
                "Накопленные добыча нефть: {}",
                format_thousands(self.cumulative_oil_production, ORC_DECIMALS)
            ),
            format!(
                "V остаточные: {}",
                format_thousands(self.remaining_oil_reserves, ORC_DECIMALS)
            ),
            format!("Total: {}", format_thousands(self.total, ORC_DECIMALS)),
            format!("ORC (КИН) = {orc}"),
        ]
    }
}

/// Format with `,` thousands separators and a fixed number of decimals,
/// e.g. `46564979.63` -> `"46,564,979.630"`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
