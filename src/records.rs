//! Header-keyed record shaping
//!
//! The first row of a grid supplies field names; every following row becomes
//! one [`Record`]. Values pass through untouched.
//!
//! ```
//! use gsheets::records::shape_records;
//! use gsheets::types::CellValue;
//!
//! # fn main() -> gsheets::Result<()> {
//! let grid = vec![
//!     vec![CellValue::from("name"), CellValue::from("age")],
//!     vec![CellValue::from("Alice"), CellValue::Int(30)],
//! ];
//!
//! let records = shape_records(&grid)?;
//! assert_eq!(records[0]["age"], CellValue::Int(30));
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SheetError};
use crate::types::{CellValue, Grid, Record};
use serde::de::DeserializeOwned;

/// Header keys resolved once per grid. A non-text header cell is kept as its
/// type name and only becomes an error when a data row reaches that column.
fn header_keys(header: &[CellValue]) -> Vec<std::result::Result<&str, &'static str>> {
    header
        .iter()
        .map(|cell| cell.as_str().ok_or(cell.type_name()))
        .collect()
}

fn key_at<'h>(
    keys: &[std::result::Result<&'h str, &'static str>],
    column: usize,
) -> Result<Option<&'h str>> {
    match keys.get(column) {
        None => Ok(None),
        Some(Ok(key)) => Ok(Some(key)),
        Some(Err(found)) => Err(SheetError::MalformedHeader { column, found }),
    }
}

/// Convert a grid into one record per data row
///
/// Cells past the end of the header are dropped. When the header repeats a
/// field name, the rightmost column's value is kept at the position of the
/// first occurrence.
///
/// # Errors
///
/// - [`SheetError::EmptyGrid`] when there is no header row
/// - [`SheetError::MalformedHeader`] when a data cell sits under a non-text
///   header cell
pub fn shape_records(grid: &[Vec<CellValue>]) -> Result<Vec<Record>> {
    let (header, rows) = grid.split_first().ok_or(SheetError::EmptyGrid)?;
    let keys = header_keys(header);

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Record::with_capacity(row.len().min(keys.len()));
        for (column, cell) in row.iter().enumerate() {
            match key_at(&keys, column)? {
                Some(key) => {
                    record.insert(key.to_string(), cell.clone());
                }
                None => break,
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Like [`shape_records`] but moves cell values out of the grid
pub fn shape_records_owned(grid: Grid) -> Result<Vec<Record>> {
    let mut rows = grid.into_iter();
    let header = rows.next().ok_or(SheetError::EmptyGrid)?;
    let keys = header_keys(&header);

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Record::with_capacity(row.len().min(keys.len()));
        for (column, cell) in row.into_iter().enumerate() {
            match key_at(&keys, column)? {
                Some(key) => {
                    record.insert(key.to_string(), cell);
                }
                None => break,
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Render a record as a JSON object, keeping field order
pub fn record_to_json(record: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        record
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

/// Shape a grid and deserialize every record into `T`
///
/// Field types such as [`SerialDate`](crate::serial_date::SerialDate) decode
/// during this step, so a date column can be read straight into a struct.
///
/// ```
/// use gsheets::records::shape_into;
/// use gsheets::serial_date::SerialDate;
/// use gsheets::types::CellValue;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Shipment {
///     sku: String,
///     shipped: SerialDate,
/// }
///
/// # fn main() -> gsheets::Result<()> {
/// let grid = vec![
///     vec![CellValue::from("sku"), CellValue::from("shipped")],
///     vec![CellValue::from("X-1"), CellValue::Int(45000)],
/// ];
/// let shipments: Vec<Shipment> = shape_into(&grid)?;
/// assert_eq!(shipments[0].sku, "X-1");
/// assert_eq!(shipments[0].shipped.serial(), 45000.0);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Shaping errors as in [`shape_records`], and [`SheetError::Decode`] with the
/// 1-based data row number when a record does not fit `T`.
pub fn shape_into<T: DeserializeOwned>(grid: &[Vec<CellValue>]) -> Result<Vec<T>> {
    shape_records(grid)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record_to_json(&record)).map_err(|e| SheetError::Decode {
                row: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}
