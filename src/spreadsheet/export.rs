//! Workbook export
//!
//! Two workbooks are produced:
//! - the full results workbook: `Raw Data` plus one sheet per method that has
//!   a result, in canonical method order;
//! - the summary workbook: the `ORC расчет` parameter sheet, optionally
//!   preceded by the per-method results table.
//!
//! Workbooks are assembled completely in memory and serialized to bytes;
//! writing the bytes to disk is the caller's single step.

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregation::{ChartData, ReserveAverage};
use crate::error::ExportError;
use crate::orc::OrcValue;
use crate::types::{MethodResult, MethodResults, ProductionRecord};

pub const RAW_DATA_SHEET: &str = "Raw Data";
pub const ORC_SHEET: &str = "ORC расчет";
pub const METHOD_RESULTS_SHEET: &str = "Результаты методов";

/// Label of the average row in the method results table.
pub const AVERAGE_ROW_LABEL: &str = "Среднее значение";

// ============================================================================
// Full Results Workbook
// ============================================================================

/// Build the full results workbook and serialize it.
pub fn results_workbook_bytes(
    records: &[ProductionRecord],
    results: &MethodResults,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(raw_data_sheet(records)?);

    let mut method_sheets = 0usize;
    for (method, result) in results.iter() {
        match result {
            Some(result) => {
                workbook.push_worksheet(method_sheet(method.display_name(), result)?);
                method_sheets += 1;
            }
            None => debug!(method = %method, "No result, sheet omitted"),
        }
    }

    let bytes = workbook.save_to_buffer()?;
    info!(
        records = records.len(),
        method_sheets,
        bytes = bytes.len(),
        "Assembled results workbook"
    );
    Ok(bytes)
}

/// `year | oil | liquid | water | water cut | active(0/1)`, no header row.
fn raw_data_sheet(records: &[ProductionRecord]) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(RAW_DATA_SHEET)?;

    for (i, record) in records.iter().enumerate() {
        let row = sheet_row(i);
        sheet.write_string(row, 0, record.year.as_str())?;
        sheet.write_number(row, 1, record.oil_volume)?;
        sheet.write_number(row, 2, record.liquid_volume)?;
        sheet.write_string(row, 3, record.water_volume.as_str())?;
        sheet.write_string(row, 4, record.water_cut_percent.as_str())?;
        sheet.write_number(row, 5, if record.active { 1.0 } else { 0.0 })?;
    }
    Ok(sheet)
}

/// Coefficients, spacer, regression points, then any method-specific extras.
fn method_sheet(name: &str, result: &MethodResult) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;

    sheet.write_string(0, 0, "A")?;
    sheet.write_number(0, 1, result.a)?;
    sheet.write_string(1, 0, "B")?;
    sheet.write_number(1, 1, result.b)?;
    sheet.write_string(2, 0, "R²")?;
    sheet.write_number(2, 1, result.r_squared)?;
    // row 3 left blank

    let mut row = 4u32;
    for (i, point) in result.points.iter().enumerate() {
        sheet.write_string(row, 0, format!("Point {}", i + 1))?;
        sheet.write_string(row, 1, format!("X: {}, Y: {}", point.x, point.y))?;
        row += 1;
    }

    for (label, value) in result.extra_fields() {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, value)?;
        row += 1;
    }
    Ok(sheet)
}

// ============================================================================
// Summary Workbook
// ============================================================================

/// Everything the summary workbook shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub geological_reserves: Option<f64>,
    pub cumulative_oil_production: f64,
    pub average: Option<ReserveAverage>,
    pub orc: Option<OrcValue>,
    pub chart: ChartData,
}

/// Build the summary workbook and serialize it.
pub fn summary_workbook_bytes(
    report: &SummaryReport,
    include_method_results: bool,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    if include_method_results {
        workbook.push_worksheet(method_results_sheet(&report.chart)?);
    }
    workbook.push_worksheet(orc_sheet(report)?);

    let bytes = workbook.save_to_buffer()?;
    info!(
        orc = report.orc.as_ref().map_or("-", |o| o.formatted.as_str()),
        bytes = bytes.len(),
        "Assembled summary workbook"
    );
    Ok(bytes)
}

/// `Параметр | Значение` pairs; missing values stay blank.
fn orc_sheet(report: &SummaryReport) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(ORC_SHEET)?;

    sheet.write_string(0, 0, "Параметр")?;
    sheet.write_string(0, 1, "Значение")?;

    let avg_remaining = report.average.map(|a| a.remaining_oil_reserves);
    let avg_extractable = report.average.map(|a| a.extractable_oil_reserves);
    let numeric_rows: [(&str, Option<f64>); 4] = [
        ("Q geological reserves", report.geological_reserves),
        ("Накопленные добыча нефть", Some(report.cumulative_oil_production)),
        ("V остаточные (средниее)", avg_remaining),
        ("V извлекаемые (средниее)", avg_extractable),
    ];

    for (i, (label, value)) in numeric_rows.iter().enumerate() {
        let row = sheet_row(i + 1);
        sheet.write_string(row, 0, *label)?;
        if let Some(v) = value {
            sheet.write_number(row, 1, *v)?;
        }
    }

    sheet.write_string(5, 0, "ORC (КИН)")?;
    if let Some(orc) = &report.orc {
        sheet.write_string(5, 1, orc.formatted.as_str())?;
    }
    Ok(sheet)
}

/// Per-method table with an average row when one exists.
fn method_results_sheet(chart: &ChartData) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(METHOD_RESULTS_SHEET)?;

    let headers = [
        "Метод",
        "V остаточные",
        "V извлекаемые",
        "Коэффициент A",
        "Коэффициент B",
        "R²",
    ];
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string(0, col, header)?;
    }

    for (i, row) in chart.rows.iter().enumerate() {
        let r = sheet_row(i + 1);
        sheet.write_string(r, 0, row.method.display_name())?;
        sheet.write_number(r, 1, row.remaining_oil_reserves)?;
        if let Some(extractable) = row.extractable_oil_reserves {
            sheet.write_number(r, 2, extractable)?;
        }
        sheet.write_number(r, 3, row.a)?;
        sheet.write_number(r, 4, row.b)?;
        sheet.write_number(r, 5, row.r_squared)?;
    }

    if let Some(avg) = chart.average {
        let r = sheet_row(chart.rows.len() + 1);
        sheet.write_string(r, 0, AVERAGE_ROW_LABEL)?;
        sheet.write_number(r, 1, avg.remaining_oil_reserves)?;
        sheet.write_number(r, 2, avg.extractable_oil_reserves)?;
    }
    Ok(sheet)
}

/// Row index as the writer's row type. Sheets here are far below the
/// 1,048,576-row limit, which the writer enforces on its own.
fn sheet_row(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}
