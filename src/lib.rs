//! Oil Recovery: production history and decline-method reserve analysis
//!
//! Pipeline for yearly oil-production records and decline-curve reserve
//! estimates.
//!
//! ## Architecture
//!
//! - **Record Parser** (`production`): raw rows -> records with water volume
//!   and year-over-year water cut
//! - **Aggregation** (`aggregation`): valid/enabled method results in
//!   canonical order, reserve averages, chart rows
//! - **ORC** (`orc`): oil recovery coefficient and its display breakdown
//! - **Spreadsheet Codec** (`spreadsheet`): first-sheet import, results and
//!   summary workbook export
//! - **Pipeline** (`pipeline`): async file boundary tying the above together
//!
//! The regression methods themselves are external; their outputs arrive as
//! `MethodResults`.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod orc;
pub mod pipeline;
pub mod production;
pub mod spreadsheet;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError, ExportConfig, OrcConfig, ReserveSource};

// Re-export commonly used types
pub use types::{
    Method, MethodResult, MethodResults, MethodSelection, ProductionRecord, RegressionPoint,
    ReserveFigure,
};

// Re-export pipeline components
pub use aggregation::{average, filter_valid, ChartData, ChartRow, ReserveAverage, ValidResult};
pub use error::{ExportError, ImportError, PipelineError};
pub use orc::{compute_orc, parse_geological_reserves, OrcBreakdown, OrcValue};
pub use pipeline::{summarize, AnalysisSummary};
pub use production::parse_rows;
