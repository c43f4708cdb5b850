//! Production history ingestion
//!
//! Turns imported rows into typed `ProductionRecord`s with derived water
//! volume and year-over-year water cut.

pub mod parser;

pub use parser::{format_fixed2, is_record_row, parse_decimal, parse_rows, water_cut_percent, RawRow};
