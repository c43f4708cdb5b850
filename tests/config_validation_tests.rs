//! Config Validation Tests
//!
//! Typo detection, range validation and file loading for `AnalysisConfig`,
//! exercised independently from the rest of the pipeline.

use oil_recovery::config::validation::{
    known_config_keys, suggest_correction, validate_consistency, validate_unknown_keys,
};
use oil_recovery::config::{AnalysisConfig, ConfigError, ReserveSource};
use oil_recovery::Method;
use std::io::Write;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_export_key_warns_with_suggestion() {
    let toml_str = r#"
[export]
sumary_file = "out.xlsx"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "export.sumary_file");
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("export.summary_file"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn misspelled_method_name_suggests_cyrillic_key() {
    let toml_str = r#"
[methods]
"Сазанов" = false
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("methods.Сазонов"));
}

#[test]
fn unknown_section_warns_without_suggestion() {
    let warnings = validate_unknown_keys("[plotting]\nwidth = 800\n");
    assert_eq!(warnings.len(), 2, "section and its key are both unknown");
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn valid_config_produces_no_warnings() {
    let toml_str = r#"
[orc]
cumulative_oil_production = 46564979.63
remaining_oil_reserves = 11166666.667
display_reserve_source = "fixed"
export_reserve_source = "fixed"

[export]
results_file = "calculation_results.xlsx"
summary_file = "chart_results.xlsx"
include_method_results_sheet = true

[methods]
"Назаров-Сипачев" = true
"Сазонов" = false
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
    let config = AnalysisConfig::from_toml_str(toml_str).expect("valid config");
    assert!(validate_consistency(&config).is_empty());
    assert!(!config.methods.is_enabled(Method::Sazonov));
    assert!(config.methods.is_enabled(Method::NazarovSipachev));
}

#[test]
fn every_method_has_a_known_key() {
    let known = known_config_keys();
    for method in Method::ALL {
        let key = format!("methods.{}", method.display_name());
        assert!(known.contains(&key), "missing {key}");
    }
}

#[test]
fn far_off_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert!(suggest_correction("completely.unrelated", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn negative_reserves_are_rejected() {
    let err = AnalysisConfig::from_toml_str("[orc]\nremaining_oil_reserves = -1.0\n")
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("orc.remaining_oil_reserves"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn non_xlsx_output_is_rejected() {
    let err = AnalysisConfig::from_toml_str("[export]\nresults_file = \"results.csv\"\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn mixed_reserve_sources_warn() {
    let config = AnalysisConfig::from_toml_str(
        "[orc]\ndisplay_reserve_source = \"fixed\"\nexport_reserve_source = \"average\"\n",
    )
    .expect("valid config");
    assert_eq!(config.orc.export_reserve_source, ReserveSource::Average);

    let warnings = validate_consistency(&config);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "orc.export_reserve_source");
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_reads_partial_config() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[orc]\ncumulative_oil_production = 1000.0").expect("write");

    let config = AnalysisConfig::load_from_file(file.path()).expect("loads");
    assert_eq!(config.orc.cumulative_oil_production, 1000.0);
    assert_eq!(
        config.orc.remaining_oil_reserves,
        AnalysisConfig::default().orc.remaining_oil_reserves
    );
    assert_eq!(config.export, AnalysisConfig::default().export);
}

#[test]
fn parse_error_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[orc\ncumulative_oil_production = ").expect("write");

    let err = AnalysisConfig::load_from_file(file.path()).unwrap_err();
    match &err {
        ConfigError::Parse(path, _) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn config_round_trips_through_toml() {
    let mut config = AnalysisConfig::default();
    config.methods.set(Method::Kambarov, false);
    config.export.include_method_results_sheet = true;

    let text = config.to_toml().expect("serializes");
    let reloaded = AnalysisConfig::from_toml_str(&text).expect("reloads");
    assert_eq!(reloaded, config);
}
