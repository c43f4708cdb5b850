//! Config validation: unknown-key detection with edit-distance suggestions
//! and consistency warnings.
//!
//! Two-pass parse approach: first parse raw TOML into `toml::Value`, walk the
//! key tree and compare against known keys, emitting "did you mean?"
//! warnings. Then normal serde deserialization runs. Warnings never reject a
//! config.

use std::collections::HashSet;

use crate::types::Method;

use super::{AnalysisConfig, ReserveSource};

/// A non-fatal config warning (typo, suspicious combination).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `AnalysisConfig`.
///
/// Must be kept in step with the structs in `analysis_config.rs`.
pub fn known_config_keys() -> HashSet<String> {
    let keys: &[&str] = &[
        // [orc]
        "orc",
        "orc.cumulative_oil_production",
        "orc.remaining_oil_reserves",
        "orc.display_reserve_source",
        "orc.export_reserve_source",
        // [export]
        "export",
        "export.results_file",
        "export.summary_file",
        "export.include_method_results_sheet",
        // [methods]
        "methods",
    ];

    let mut known: HashSet<String> = keys.iter().map(|k| (*k).to_string()).collect();
    known.extend(
        Method::ALL
            .iter()
            .map(|m| format!("methods.{}", m.display_name())),
    );
    known
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Levenshtein edit distance, counted in characters (method names are Cyrillic).
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        // Ties resolve alphabetically so suggestions are stable
        let better = match best {
            Some((best_key, best_dist)) => dist < best_dist || (dist == best_dist && k.as_str() < best_key),
            None => true,
        };
        if better {
            best = Some((k.as_str(), dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Only warns; syntax errors are left to the serde pass.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

/// Warnings for settings that are valid but likely to surprise.
pub fn validate_consistency(config: &AnalysisConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // The displayed ORC and the exported ORC can disagree
    if config.orc.display_reserve_source != config.orc.export_reserve_source {
        warnings.push(ValidationWarning {
            field: "orc.export_reserve_source".to_string(),
            message: format!(
                "display ORC uses {:?} reserves but export ORC uses {:?}; the two values may differ",
                config.orc.display_reserve_source, config.orc.export_reserve_source
            ),
            suggestion: None,
        });
    }

    let uses_fixed = config.orc.export_reserve_source == ReserveSource::Fixed
        || config.orc.display_reserve_source == ReserveSource::Fixed;
    if uses_fixed && config.orc.remaining_oil_reserves == 0.0 {
        warnings.push(ValidationWarning {
            field: "orc.remaining_oil_reserves".to_string(),
            message: "remaining_oil_reserves is 0 while a call site uses the fixed figure"
                .to_string(),
            suggestion: None,
        });
    }

    if config.methods.enabled_methods().is_empty() {
        warnings.push(ValidationWarning {
            field: "methods".to_string(),
            message: "all methods are disabled; no average or chart rows will be produced"
                .to_string(),
            suggestion: None,
        });
    }

    warnings
}
