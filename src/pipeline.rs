//! Analysis pipeline
//!
//! File in -> records; method results + selection -> chart data, averages and
//! the two ORC figures; in-memory workbook -> file out.
//!
//! Each call works on the inputs it is given. Selection flags and `active`
//! markers belong to the caller and are only read.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregation::{filter_valid, ChartData, ReserveAverage};
use crate::config::{OrcConfig, ReserveSource};
use crate::error::{ExportError, ImportError};
use crate::orc::{compute_orc, OrcBreakdown};
use crate::production::{parse_rows, RawRow};
use crate::spreadsheet::{self, SummaryReport};
use crate::types::{MethodResults, MethodSelection, ProductionRecord};

// ============================================================================
// Import
// ============================================================================

/// Read a workbook file and return the raw rows of its first sheet.
pub async fn import_raw_rows(path: impl AsRef<Path>) -> Result<Vec<RawRow>, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::Io(path.to_path_buf(), e))?;

    info!(file = %path.display(), bytes = bytes.len(), "Read workbook");
    spreadsheet::read_first_sheet(bytes)
}

/// Read a workbook file and parse its first sheet into production records.
pub async fn import_records(
    path: impl AsRef<Path>,
) -> Result<Vec<ProductionRecord>, ImportError> {
    let rows = import_raw_rows(path).await?;
    Ok(parse_rows(&rows))
}

// ============================================================================
// Aggregation
// ============================================================================

/// Everything derived from one set of method results.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Bars, labels and the average line
    pub chart: ChartData,
    /// ORC as shown next to the chart
    pub display: OrcBreakdown,
    /// Contents of the summary workbook
    pub report: SummaryReport,
}

/// Filter, average and compute both ORC figures.
///
/// The displayed ORC and the exported ORC each take their remaining-reserve
/// term from their own configured source, so they can legitimately differ.
pub fn summarize(
    results: &MethodResults,
    selection: &MethodSelection,
    geological_reserves: Option<f64>,
    orc: &OrcConfig,
) -> AnalysisSummary {
    let valid = filter_valid(results, selection);
    let chart = ChartData::from_valid(&valid);

    let display_remaining = remaining_reserves(orc.display_reserve_source, orc, chart.average);
    let export_remaining = remaining_reserves(orc.export_reserve_source, orc, chart.average);

    let shown = OrcBreakdown::new(
        geological_reserves,
        orc.cumulative_oil_production,
        display_remaining,
    );
    let export_orc = compute_orc(
        geological_reserves,
        orc.cumulative_oil_production,
        export_remaining,
    );

    let shown_orc = shown.orc.as_ref().map(|o| o.formatted.as_str());
    let export_orc_text = export_orc.as_ref().map(|o| o.formatted.as_str());
    if shown.orc != export_orc {
        warn!(
            shown = ?shown_orc,
            exported = ?export_orc_text,
            "Displayed and exported ORC differ (different reserve sources)"
        );
    }

    info!(
        valid_methods = chart.rows.len(),
        has_average = chart.average.is_some(),
        orc = ?shown_orc,
        "Summarized method results"
    );

    let report = SummaryReport {
        geological_reserves,
        cumulative_oil_production: orc.cumulative_oil_production,
        average: chart.average,
        orc: export_orc,
        chart: chart.clone(),
    };

    AnalysisSummary {
        chart,
        display: shown,
        report,
    }
}

/// Remaining-reserve term for one ORC call site.
pub fn remaining_reserves(
    source: ReserveSource,
    orc: &OrcConfig,
    average: Option<ReserveAverage>,
) -> f64 {
    match (source, average) {
        (ReserveSource::Fixed, _) => orc.remaining_oil_reserves,
        (ReserveSource::Average, Some(avg)) => avg.remaining_oil_reserves,
        (ReserveSource::Average, None) => {
            warn!("No valid method results to average, using fixed remaining reserves");
            orc.remaining_oil_reserves
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Write the full results workbook (`Raw Data` + per-method sheets).
pub async fn export_results(
    path: impl AsRef<Path>,
    records: &[ProductionRecord],
    results: &MethodResults,
) -> Result<(), ExportError> {
    let bytes = spreadsheet::results_workbook_bytes(records, results)?;
    write_workbook(path.as_ref(), &bytes).await
}

/// Write the summary workbook.
pub async fn export_summary(
    path: impl AsRef<Path>,
    report: &SummaryReport,
    include_method_results: bool,
) -> Result<(), ExportError> {
    let bytes = spreadsheet::summary_workbook_bytes(report, include_method_results)?;
    write_workbook(path.as_ref(), &bytes).await
}

/// Write a serialized workbook in one step.
///
/// Bytes go to a hidden sibling file first and are renamed over the target,
/// so the target is either the complete new workbook or untouched.
pub async fn write_workbook(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let tmp = temp_path_for(path);

    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ExportError::Io(tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ExportError::Io(path.to_path_buf(), e));
    }

    info!(file = %path.display(), bytes = bytes.len(), "Workbook written");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "workbook".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp"))
}
