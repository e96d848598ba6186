//! Spreadsheet value sources
//!
//! A [`ValueSource`] hands back raw grids for A1 ranges. Record shaping and
//! date decoding never talk to the network themselves; they take whatever a
//! source returns. [`SheetService`](crate::sheets::SheetService) reads from
//! the Google Sheets API, [`StaticSource`] serves fixed grids from memory.
//!
//! ```
//! use gsheets::source::{StaticSource, ValueSource};
//! use gsheets::types::CellValue;
//!
//! # async fn example() -> gsheets::Result<()> {
//! let source = StaticSource::new().with_range(
//!     "People!A1:B2",
//!     vec![
//!         vec![CellValue::from("name"), CellValue::from("age")],
//!         vec![CellValue::from("Alice"), CellValue::Int(30)],
//!     ],
//! );
//!
//! let records = source.get_records("People!A1:B2").await?;
//! assert_eq!(records.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SheetError};
use crate::records::shape_records_owned;
use crate::types::{Grid, Record};
use indexmap::IndexMap;
use std::future::Future;

/// Anything that can resolve A1 ranges to grids of cell values
///
/// A range without any populated cells resolves to an empty grid rather than
/// an error.
pub trait ValueSource: Send + Sync {
    /// Fetch one range
    fn get(&self, range: &str) -> impl Future<Output = Result<Grid>> + Send;

    /// Fetch several ranges in one call; grids come back in request order
    fn batch_get(&self, ranges: &[String]) -> impl Future<Output = Result<Vec<Grid>>> + Send;

    /// Fetch one range and shape it into records
    fn get_records(&self, range: &str) -> impl Future<Output = Result<Vec<Record>>> + Send {
        async move { shape_records_owned(self.get(range).await?) }
    }
}

/// In-memory value source keyed by range string
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    grids: IndexMap<String, Grid>,
}

impl StaticSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid for a range (builder style)
    pub fn with_range(mut self, range: impl Into<String>, grid: Grid) -> Self {
        self.insert(range, grid);
        self
    }

    /// Register or replace the grid for a range
    pub fn insert(&mut self, range: impl Into<String>, grid: Grid) {
        self.grids.insert(range.into(), grid);
    }

    /// Ranges this source can answer
    pub fn ranges(&self) -> Vec<String> {
        self.grids.keys().cloned().collect()
    }

    fn lookup(&self, range: &str) -> Result<Grid> {
        self.grids
            .get(range)
            .cloned()
            .ok_or_else(|| SheetError::RangeNotFound {
                range: range.to_string(),
                available: self.ranges().join(", "),
            })
    }
}

impl ValueSource for StaticSource {
    fn get(&self, range: &str) -> impl Future<Output = Result<Grid>> + Send {
        std::future::ready(self.lookup(range))
    }

    fn batch_get(&self, ranges: &[String]) -> impl Future<Output = Result<Vec<Grid>>> + Send {
        std::future::ready(ranges.iter().map(|range| self.lookup(range)).collect())
    }
}
