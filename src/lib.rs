//! # gsheets
//!
//! Read Google Sheets ranges as header-keyed records.
//!
//! ## Features
//!
//! - **Record Shaping**: First row becomes field names, every other row a record
//! - **Serial Dates**: Decode spreadsheet day-count dates into `chrono` timestamps
//! - **Typed Rows**: Deserialize records straight into your own structs
//! - **Sheets API**: Service account authentication, `values.get` and `values.batchGet`
//!   (feature `sheets-api`, on by default)
//!
//! ## Quick Start
//!
//! ### Shaping Records
//!
//! ```rust
//! use gsheets::records::shape_records;
//! use gsheets::types::CellValue;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = vec![
//!     vec![CellValue::from("Name"), CellValue::from("Age")],
//!     vec![CellValue::from("Alice"), CellValue::Int(30)],
//!     vec![CellValue::from("Bob"), CellValue::Int(25)],
//! ];
//!
//! for record in shape_records(&grid)? {
//!     println!("{} is {}", record["Name"], record["Age"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Decoding Serial Dates
//!
//! ```rust
//! use chrono::FixedOffset;
//! use gsheets::serial_date::decode_serial_date;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let jst = FixedOffset::east_opt(9 * 3600).unwrap();
//! let at = decode_serial_date(45000.75, &jst)?;
//! assert_eq!(at.to_rfc3339(), "2023-03-15T18:00:00+09:00");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod records;
pub mod serial_date;
#[cfg(feature = "sheets-api")]
pub mod sheets;
pub mod source;
pub mod types;

pub use error::{Result, SheetError};
pub use records::{shape_into, shape_records, shape_records_owned};
pub use serial_date::{decode_serial_date, decode_serial_date_from_document, SerialDate};
#[cfg(feature = "sheets-api")]
pub use sheets::{Credentials, SheetService};
pub use source::{StaticSource, ValueSource};
pub use types::{CellValue, Grid, Record, SheetRange};
