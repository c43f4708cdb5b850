//! Workbook import: first sheet -> raw text rows
//!
//! Every cell is rendered as text so that the record parser sees the same
//! shape regardless of whether a value was stored as a number or a string.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::{debug, info};

use crate::error::ImportError;
use crate::production::RawRow;

/// Read the first sheet of an in-memory workbook (xlsx, xls, xlsb or ods).
///
/// Rows are returned from the top of the populated range; blank rows inside
/// the range are kept (the record parser drops them). Columns to the left of
/// the populated range are padded with empty cells so column positions
/// always match the sheet.
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoSheets)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    if range.is_empty() {
        return Err(ImportError::EmptySheet(sheet_name));
    }

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (height, width) = range.get_size();
    debug!(sheet = %sheet_name, start_row, start_col, height, width, "Reading sheet range");

    let rows: Vec<RawRow> = range
        .rows()
        .map(|cells| {
            std::iter::repeat(String::new())
                .take(start_col as usize)
                .chain(cells.iter().map(cell_text))
                .collect()
        })
        .collect();

    info!(sheet = %sheet_name, rows = rows.len(), "Imported workbook sheet");
    Ok(rows)
}

/// Text form of a cell as a spreadsheet would display it unformatted.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
