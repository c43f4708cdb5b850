//! Pipeline Regression Tests
//!
//! Exercises the full path: workbook on disk -> records -> method results ->
//! summary -> workbooks on disk, then reads the written workbooks back.
//! Input workbooks are generated on the fly in a temp directory.

use calamine::{open_workbook_auto, Data, Reader};
use oil_recovery::config::OrcConfig;
use oil_recovery::pipeline;
use oil_recovery::spreadsheet::{self, METHOD_RESULTS_SHEET, ORC_SHEET, RAW_DATA_SHEET};
use oil_recovery::{
    parse_rows, ImportError, Method, MethodResult, MethodResults, MethodSelection,
    RegressionPoint,
};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Write a single-sheet workbook where every cell is text.
fn write_text_workbook(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                sheet
                    .write_string(r as u32, c as u16, *cell)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("input workbook saved");
}

fn method_result(remaining: Option<f64>, extractable: Option<f64>) -> MethodResult {
    MethodResult {
        a: 1.25,
        b: -0.5,
        r_squared: 0.97,
        points: vec![
            RegressionPoint { x: 1.0, y: 10.5 },
            RegressionPoint { x: 2.0, y: 12.0 },
        ],
        remaining_oil_reserves: remaining,
        extractable_oil_reserves: extractable.into(),
        fn_value: None,
        fe: None,
        water_influx: None,
        oil_recovery: None,
    }
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).expect("workbook opens");
    let range = workbook.worksheet_range(sheet).expect("sheet exists");
    range.rows().map(<[Data]>::to_vec).collect()
}

fn sheet_names(path: &Path) -> Vec<String> {
    let workbook = open_workbook_auto(path).expect("workbook opens");
    workbook.sheet_names()
}

fn tmp_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn import_parses_scenario_workbook() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = tmp_file(&dir, "history.xlsx");
    write_text_workbook(&input, &[&["2020", "100", "120"], &["2021", "110", "150"]]);

    let records = pipeline::import_records(&input).await.expect("import ok");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].year, "2020");
    assert_eq!(records[0].water_volume, "20.00");
    assert_eq!(records[0].water_cut_percent, "0.00");
    assert_eq!(records[1].water_volume, "40.00");
    assert_eq!(records[1].water_cut_percent, "66.67");
}

#[tokio::test]
async fn import_handles_decimal_commas_and_blank_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = tmp_file(&dir, "history.xlsx");
    write_text_workbook(
        &input,
        &[
            &["2019", "95,5", "100,5"],
            &["", "", ""],
            &["", "1", "2"],
            &["2020", "100", "120"],
        ],
    );

    let records = pipeline::import_records(&input).await.expect("import ok");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].oil_volume, 95.5);
    assert_eq!(records[0].liquid_volume, 100.5);
    assert_eq!(records[0].water_volume, "5.00");
    assert_eq!(records[1].index, 2);
    // (20 - 5) / (120 - 100.5) * 100
    assert_eq!(records[1].water_cut_percent, "76.92");
}

#[tokio::test]
async fn import_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = pipeline::import_records(tmp_file(&dir, "nope.xlsx"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Io(_, _)));
}

#[tokio::test]
async fn import_empty_sheet_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = tmp_file(&dir, "empty.xlsx");
    write_text_workbook(&input, &[]);

    let err = pipeline::import_records(&input).await.unwrap_err();
    assert!(matches!(err, ImportError::EmptySheet(_)), "got {err:?}");
}

// ============================================================================
// Full Results Export
// ============================================================================

#[tokio::test]
async fn results_workbook_round_trips_raw_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "calculation_results.xlsx");

    let mut records = parse_rows(&[
        vec!["2018".into(), "80,25".into(), "90".into()],
        vec!["2019".into(), "95".into(), "101.5".into()],
        vec!["2020".into(), "100".into(), "120".into()],
        vec!["2021".into(), "130".into(), "120".into()],
    ]);
    records[1].active = true;

    let mut results = MethodResults::default();
    results.set(Method::Maximov, Some(method_result(Some(1000.0), Some(2000.0))));

    pipeline::export_results(&out, &records, &results)
        .await
        .expect("export ok");

    let reimported = pipeline::import_records(&out).await.expect("re-import ok");
    assert_eq!(reimported.len(), records.len());
    for (before, after) in records.iter().zip(&reimported) {
        assert_eq!(before.index, after.index);
        assert_eq!(before.year, after.year);
        assert_eq!(before.oil_volume, after.oil_volume);
        assert_eq!(before.liquid_volume, after.liquid_volume);
        assert_eq!(before.water_volume, after.water_volume);
        assert_eq!(before.water_cut_percent, after.water_cut_percent);
    }

    // Active flag column is written as 0/1
    let raw = sheet_rows(&out, RAW_DATA_SHEET);
    assert_eq!(raw[0][5], Data::Float(0.0));
    assert_eq!(raw[1][5], Data::Float(1.0));
}

#[tokio::test]
async fn whitespace_year_survives_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "calculation_results.xlsx");

    let records = parse_rows(&[
        vec![" ".into(), "100".into(), "120".into()],
        vec!["2021".into(), "90".into(), "110".into()],
    ]);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].water_cut_percent, "0.00");

    pipeline::export_results(&out, &records, &MethodResults::default())
        .await
        .expect("export ok");

    let reimported = pipeline::import_records(&out).await.expect("re-import ok");
    assert_eq!(reimported, records);
}

#[tokio::test]
async fn results_workbook_omits_null_methods_in_canonical_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "calculation_results.xlsx");
    let records = parse_rows(&[vec!["2020".into(), "100".into(), "120".into()]]);

    let mut results = MethodResults::default();
    results.set(Method::Kambarov, Some(method_result(Some(1.0), None)));
    results.set(Method::Maximov, Some(method_result(Some(2.0), None)));
    // Present but without an estimate: still gets a sheet
    results.set(Method::Sazonov, Some(method_result(None, None)));
    results.set(Method::Pirverdyan, None);

    pipeline::export_results(&out, &records, &results)
        .await
        .expect("export ok");

    assert_eq!(
        sheet_names(&out),
        vec![RAW_DATA_SHEET, "Максимов", "Сазонов", "Камбаров"]
    );
}

#[tokio::test]
async fn method_sheet_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "calculation_results.xlsx");
    let records = parse_rows(&[vec!["2020".into(), "100".into(), "120".into()]]);

    let mut result = method_result(Some(500.0), Some(700.0));
    result.fn_value = Some(0.25);
    result.oil_recovery = Some(0.4);
    let mut results = MethodResults::default();
    results.set(Method::NazarovSipachev, Some(result));

    pipeline::export_results(&out, &records, &results)
        .await
        .expect("export ok");

    let rows = sheet_rows(&out, "Назаров-Сипачев");
    assert_eq!(rows[0][0], Data::String("A".into()));
    assert_eq!(rows[0][1], Data::Float(1.25));
    assert_eq!(rows[1][0], Data::String("B".into()));
    assert_eq!(rows[2][0], Data::String("R²".into()));
    assert_eq!(rows[2][1], Data::Float(0.97));
    assert_eq!(rows[3][0], Data::Empty);
    assert_eq!(rows[4][0], Data::String("Point 1".into()));
    assert_eq!(rows[4][1], Data::String("X: 1, Y: 10.5".into()));
    assert_eq!(rows[5][1], Data::String("X: 2, Y: 12".into()));
    assert_eq!(rows[6][0], Data::String("fn".into()));
    assert_eq!(rows[6][1], Data::Float(0.25));
    assert_eq!(rows[7][0], Data::String("oilRecovery".into()));
    assert_eq!(rows.len(), 8);
}

#[tokio::test]
async fn failed_write_leaves_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("missing_dir").join("calculation_results.xlsx");
    let records = parse_rows(&[vec!["2020".into(), "100".into(), "120".into()]]);

    let result = pipeline::export_results(&out, &records, &MethodResults::default()).await;
    assert!(result.is_err());
    assert!(!out.exists());
}

// ============================================================================
// Summary Export
// ============================================================================

#[tokio::test]
async fn summary_workbook_contains_orc_parameters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "chart_results.xlsx");

    let mut results = MethodResults::default();
    results.set(Method::Maximov, Some(method_result(Some(100.0), Some(300.0))));
    results.set(Method::Sazonov, Some(method_result(Some(900.0), Some(900.0))));
    results.set(Method::Kambarov, Some(method_result(Some(200.0), None)));

    let mut selection = MethodSelection::default();
    selection.set(Method::Sazonov, false);

    let orc = OrcConfig {
        cumulative_oil_production: 50.0,
        remaining_oil_reserves: 50.0,
        ..OrcConfig::default()
    };
    let summary = pipeline::summarize(&results, &selection, Some(100.0), &orc);
    assert_eq!(summary.chart.labels(), vec!["Максимов", "Камбаров"]);

    pipeline::export_summary(&out, &summary.report, false)
        .await
        .expect("export ok");

    assert_eq!(sheet_names(&out), vec![ORC_SHEET]);
    let rows = sheet_rows(&out, ORC_SHEET);
    assert_eq!(rows[0][0], Data::String("Параметр".into()));
    assert_eq!(rows[1][0], Data::String("Q geological reserves".into()));
    assert_eq!(rows[1][1], Data::Float(100.0));
    assert_eq!(rows[2][1], Data::Float(50.0));
    assert_eq!(rows[3][1], Data::Float(150.0));
    assert_eq!(rows[4][1], Data::Float(150.0));
    assert_eq!(rows[5][0], Data::String("ORC (КИН)".into()));
    assert_eq!(rows[5][1], Data::String("1.000".into()));
}

#[tokio::test]
async fn summary_workbook_with_method_results_sheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tmp_file(&dir, "chart_results.xlsx");

    let mut results = MethodResults::default();
    results.set(Method::Pirverdyan, Some(method_result(Some(400.0), Some(800.0))));

    let summary = pipeline::summarize(
        &results,
        &MethodSelection::default(),
        None,
        &OrcConfig::default(),
    );
    pipeline::export_summary(&out, &summary.report, true)
        .await
        .expect("export ok");

    assert_eq!(sheet_names(&out), vec![METHOD_RESULTS_SHEET, ORC_SHEET]);

    let table = sheet_rows(&out, METHOD_RESULTS_SHEET);
    assert_eq!(table[1][0], Data::String("Пирвердян".into()));
    assert_eq!(table[1][1], Data::Float(400.0));
    assert_eq!(
        table[2][0],
        Data::String(spreadsheet::AVERAGE_ROW_LABEL.into())
    );

    // No geological reserves: the ORC cell stays blank
    let orc = sheet_rows(&out, ORC_SHEET);
    assert_eq!(orc[1][1], Data::Empty);
    assert!(orc[5].get(1).map_or(true, |c| *c == Data::Empty));
}
