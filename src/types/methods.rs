//! Decline-curve method identifiers, regression outputs and selection state
//!
//! The method set is closed: six named empirical techniques, always handled in
//! the same canonical order. Regression outputs are produced elsewhere and are
//! only read and aggregated here.

use serde::{Deserialize, Serialize};

// ============================================================================
// Method Identifiers
// ============================================================================

/// One of the six decline-curve methods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    #[serde(rename = "Максимов")]
    Maximov,
    #[serde(rename = "Назаров-Сипачев")]
    NazarovSipachev,
    #[serde(rename = "Сипачев-Посевич")]
    SipachevPosevich,
    #[serde(rename = "Сазонов")]
    Sazonov,
    #[serde(rename = "Пирвердян")]
    Pirverdyan,
    #[serde(rename = "Камбаров")]
    Kambarov,
}

impl Method {
    /// Canonical order used for chart labels and sheet sequencing.
    pub const ALL: [Method; 6] = [
        Method::Maximov,
        Method::NazarovSipachev,
        Method::SipachevPosevich,
        Method::Sazonov,
        Method::Pirverdyan,
        Method::Kambarov,
    ];

    /// Display name, also used as the spreadsheet sheet name.
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Maximov => "Максимов",
            Method::NazarovSipachev => "Назаров-Сипачев",
            Method::SipachevPosevich => "Сипачев-Посевич",
            Method::Sazonov => "Сазонов",
            Method::Pirverdyan => "Пирвердян",
            Method::Kambarov => "Камбаров",
        }
    }

    /// Look a method up by its display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| m.display_name() == name)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|m| m.display_name()).collect();
            format!("unknown method '{s}', expected one of: {}", known.join(", "))
        })
    }
}

// ============================================================================
// Reserve Figures
// ============================================================================

/// A reserve figure that a method may or may not report.
///
/// Absent and zero stay distinct until aggregation, where absent counts as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum ReserveFigure {
    #[default]
    Absent,
    Reported(f64),
}

impl ReserveFigure {
    pub fn value(self) -> Option<f64> {
        match self {
            ReserveFigure::Absent => None,
            ReserveFigure::Reported(v) => Some(v),
        }
    }

    /// Value for summation; absent collapses to 0.
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl From<Option<f64>> for ReserveFigure {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ReserveFigure::Absent, ReserveFigure::Reported)
    }
}

impl From<ReserveFigure> for Option<f64> {
    fn from(value: ReserveFigure) -> Self {
        value.value()
    }
}

// ============================================================================
// Regression Output
// ============================================================================

/// A single `(x, y)` pair used by a regression. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionPoint {
    pub x: f64,
    pub y: f64,
}

/// Output of one method's regression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResult {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    pub r_squared: f64,
    #[serde(default)]
    pub points: Vec<RegressionPoint>,
    /// `None` means the method produced no usable estimate
    #[serde(default)]
    pub remaining_oil_reserves: Option<f64>,
    #[serde(default)]
    pub extractable_oil_reserves: ReserveFigure,

    // Method-specific extras, present only when the method supplies them
    #[serde(default, rename = "fn", skip_serializing_if = "Option::is_none")]
    pub fn_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_influx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_recovery: Option<f64>,
}

impl MethodResult {
    /// Optional fields that are present, labelled as they appear in exports.
    pub fn extra_fields(&self) -> Vec<(&'static str, f64)> {
        [
            ("fn", self.fn_value),
            ("fe", self.fe),
            ("waterInflux", self.water_influx),
            ("oilRecovery", self.oil_recovery),
        ]
        .into_iter()
        .filter_map(|(label, v)| v.map(|v| (label, v)))
        .collect()
    }
}

/// Results for all six methods; `None` where a method produced nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodResults {
    #[serde(rename = "Максимов", default)]
    pub maximov: Option<MethodResult>,
    #[serde(rename = "Назаров-Сипачев", default)]
    pub nazarov_sipachev: Option<MethodResult>,
    #[serde(rename = "Сипачев-Посевич", default)]
    pub sipachev_posevich: Option<MethodResult>,
    #[serde(rename = "Сазонов", default)]
    pub sazonov: Option<MethodResult>,
    #[serde(rename = "Пирвердян", default)]
    pub pirverdyan: Option<MethodResult>,
    #[serde(rename = "Камбаров", default)]
    pub kambarov: Option<MethodResult>,
}

impl MethodResults {
    pub fn get(&self, method: Method) -> Option<&MethodResult> {
        self.slot(method).as_ref()
    }

    pub fn set(&mut self, method: Method, result: Option<MethodResult>) {
        *self.slot_mut(method) = result;
    }

    /// All slots in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Method, Option<&MethodResult>)> + '_ {
        Method::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Present results in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (Method, &MethodResult)> + '_ {
        self.iter().filter_map(|(m, r)| r.map(|r| (m, r)))
    }

    fn slot(&self, method: Method) -> &Option<MethodResult> {
        match method {
            Method::Maximov => &self.maximov,
            Method::NazarovSipachev => &self.nazarov_sipachev,
            Method::SipachevPosevich => &self.sipachev_posevich,
            Method::Sazonov => &self.sazonov,
            Method::Pirverdyan => &self.pirverdyan,
            Method::Kambarov => &self.kambarov,
        }
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<MethodResult> {
        match method {
            Method::Maximov => &mut self.maximov,
            Method::NazarovSipachev => &mut self.nazarov_sipachev,
            Method::SipachevPosevich => &mut self.sipachev_posevich,
            Method::Sazonov => &mut self.sazonov,
            Method::Pirverdyan => &mut self.pirverdyan,
            Method::Kambarov => &mut self.kambarov,
        }
    }
}

// ============================================================================
// Method Selection
// ============================================================================

fn enabled() -> bool {
    true
}

/// Which methods take part in filtering and averaging. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSelection {
    #[serde(rename = "Максимов", default = "enabled")]
    pub maximov: bool,
    #[serde(rename = "Назаров-Сипачев", default = "enabled")]
    pub nazarov_sipachev: bool,
    #[serde(rename = "Сипачев-Посевич", default = "enabled")]
    pub sipachev_posevich: bool,
    #[serde(rename = "Сазонов", default = "enabled")]
    pub sazonov: bool,
    #[serde(rename = "Пирвердян", default = "enabled")]
    pub pirverdyan: bool,
    #[serde(rename = "Камбаров", default = "enabled")]
    pub kambarov: bool,
}

impl Default for MethodSelection {
    fn default() -> Self {
        Self {
            maximov: true,
            nazarov_sipachev: true,
            sipachev_posevich: true,
            sazonov: true,
            pirverdyan: true,
            kambarov: true,
        }
    }
}

impl MethodSelection {
    pub fn is_enabled(&self, method: Method) -> bool {
        *self.flag(method)
    }

    pub fn set(&mut self, method: Method, enabled: bool) {
        *self.flag_mut(method) = enabled;
    }

    /// Flip one method's flag (checkbox behaviour).
    pub fn toggle(&mut self, method: Method) {
        let flag = self.flag_mut(method);
        *flag = !*flag;
    }

    /// Enabled methods in canonical order.
    pub fn enabled_methods(&self) -> Vec<Method> {
        Method::ALL.into_iter().filter(|m| self.is_enabled(*m)).collect()
    }

    fn flag(&self, method: Method) -> &bool {
        match method {
            Method::Maximov => &self.maximov,
            Method::NazarovSipachev => &self.nazarov_sipachev,
            Method::SipachevPosevich => &self.sipachev_posevich,
            Method::Sazonov => &self.sazonov,
            Method::Pirverdyan => &self.pirverdyan,
            Method::Kambarov => &self.kambarov,
        }
    }

    fn flag_mut(&mut self, method: Method) -> &mut bool {
        match method {
            Method::Maximov => &mut self.maximov,
            Method::NazarovSipachev => &mut self.nazarov_sipachev,
            Method::SipachevPosevich => &mut self.sipachev_posevich,
            Method::Sazonov => &mut self.sazonov,
            Method::Pirverdyan => &mut self.pirverdyan,
            Method::Kambarov => &mut self.kambarov,
        }
    }
}
