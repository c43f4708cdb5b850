//! Record Parser: raw spreadsheet rows -> `ProductionRecord`s
//!
//! Rows are `[year, oil, liquid, ...]` as text. The parser is total: a row is
//! either skipped (empty first cell) or retained, and every retained row
//! yields a record. Malformed numbers degrade to 0.

use crate::types::{water_volume, ProductionRecord};
use tracing::{debug, info};

/// One imported row, each cell already rendered as text.
pub type RawRow = Vec<String>;

// ============================================================================
// Row Predicate
// ============================================================================

/// Whether a raw row becomes a record.
///
/// This is the only header-detection rule: a row is dropped iff it is empty
/// or its first cell is empty. A textual header such as `["Год", "Нефть",
/// "Жидкость"]` is therefore retained as record 1 with zero volumes.
pub fn is_record_row(row: &[String]) -> bool {
    row.first().is_some_and(|cell| !cell.is_empty())
}

// ============================================================================
// Numeric Cells
// ============================================================================

/// Parse a decimal cell that may use `,` as the decimal separator.
///
/// Leading numeric text is accepted the way spreadsheet exports usually carry
/// it (`"120 т"` -> 120). Anything without a leading number, or a non-finite
/// value, resolves to 0.
pub fn parse_decimal(cell: &str) -> f64 {
    let normalized = cell.trim().replacen(',', ".", 1);
    if normalized.is_empty() {
        return 0.0;
    }

    let value = normalized
        .parse::<f64>()
        .ok()
        .or_else(|| numeric_prefix(&normalized).and_then(|p| p.parse::<f64>().ok()))
        .unwrap_or(0.0);

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Longest leading slice of `s` that reads as a decimal literal.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Format a value the way it is persisted: exactly two decimals.
pub fn format_fixed2(value: f64) -> String {
    format!("{value:.2}")
}

// ============================================================================
// Parser
// ============================================================================

/// Year-over-year water cut (%) between two consecutive retained records.
///
/// Returns 0 when liquid volume did not change. Never returns negative zero.
pub fn water_cut_percent(prev_oil: f64, prev_liquid: f64, oil: f64, liquid: f64) -> f64 {
    let water_change = water_volume(oil, liquid) - water_volume(prev_oil, prev_liquid);
    let liquid_change = liquid - prev_liquid;

    if liquid_change == 0.0 {
        return 0.0;
    }
    let percent = water_change / liquid_change * 100.0;
    // Unchanged water over falling liquid gives -0.0, which formats as "-0.00"
    if percent == 0.0 {
        0.0
    } else {
        percent
    }
}

/// Convert raw rows into production records.
///
/// Skipped rows consume no index and are invisible to the water-cut lookup:
/// "previous" always means the previous retained record.
pub fn parse_rows(rows: &[RawRow]) -> Vec<ProductionRecord> {
    let mut records: Vec<ProductionRecord> = Vec::with_capacity(rows.len());
    let mut prev: Option<(f64, f64)> = None;

    for (row_number, row) in rows.iter().enumerate() {
        if !is_record_row(row) {
            debug!(row = row_number + 1, "Skipping row with empty first cell");
            continue;
        }

        let cell = |i: usize| row.get(i).map_or("", String::as_str);
        let year = cell(0).to_string();
        let oil = parse_decimal(cell(1));
        let liquid = parse_decimal(cell(2));

        let water_cut = match prev {
            Some((prev_oil, prev_liquid)) => water_cut_percent(prev_oil, prev_liquid, oil, liquid),
            None => 0.0,
        };

        records.push(ProductionRecord {
            index: records.len() + 1,
            year,
            oil_volume: oil,
            liquid_volume: liquid,
            water_volume: format_fixed2(water_volume(oil, liquid)),
            water_cut_percent: format_fixed2(water_cut),
            active: false,
        });
        prev = Some((oil, liquid));
    }

    info!(
        rows = rows.len(),
        records = records.len(),
        "Parsed production history"
    );
    records
}
