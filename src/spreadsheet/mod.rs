//! Spreadsheet codec
//!
//! Import reads the first sheet of a workbook into raw text rows (calamine);
//! export assembles result and summary workbooks in memory (rust_xlsxwriter).

pub mod export;
pub mod import;

pub use export::{
    results_workbook_bytes, summary_workbook_bytes, SummaryReport, AVERAGE_ROW_LABEL,
    METHOD_RESULTS_SHEET, ORC_SHEET, RAW_DATA_SHEET,
};
pub use import::{cell_text, read_first_sheet};
