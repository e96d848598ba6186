//! Type definitions for spreadsheet data

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Rectangular block of cell values as returned by a value source.
///
/// Row 0 is the header row, every following row is a data row. Rows are not
/// required to have equal lengths: the Sheets API drops trailing empty cells.
pub type Grid = Vec<Vec<CellValue>>;

/// One data row keyed by the header row's field names.
pub type Record = IndexMap<String, CellValue>;

/// Represents a single untyped cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent cell
    #[default]
    Empty,
    /// Explicit null
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (also carries unformatted dates as serial numbers)
    Float(f64),
    /// String value
    String(String),
}

impl CellValue {
    /// Convert cell value to its display string
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty | CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }

    /// Borrow the text of a string cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if cell is absent or null
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty | CellValue::Null)
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => Some(*f as i64),
            CellValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Int(i) => Some(*i != 0),
            CellValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::String(_) => "string",
        }
    }

    /// Convert to a JSON scalar. Absent cells become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty | CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Int(i) => serde_json::Value::from(*i),
            // NaN and infinities have no JSON form
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty | CellValue::Null => serializer.serialize_unit(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::String(s) => serializer.serialize_str(s),
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a spreadsheet cell value (number, string, boolean or null)")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<CellValue, E> {
        Ok(i64::try_from(v)
            .map(CellValue::Int)
            .unwrap_or(CellValue::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CellValue, E> {
        Ok(CellValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<CellValue, E> {
        Ok(CellValue::String(v))
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

/// Convert column index to A1 letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(col: u32) -> String {
    let mut result = String::new();
    let mut col = col + 1;

    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }

    result
}

/// A1-style reference for a 0-based cell position (e.g. "A1", "B2")
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

/// Sheet-qualified A1 range such as `Orders!A1:D200`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    /// Sheet (tab) title
    pub sheet: String,
    /// A1 range within the sheet; `None` addresses the whole sheet
    pub range: Option<String>,
}

impl SheetRange {
    /// Create a range within a sheet
    pub fn new(sheet: impl Into<String>, range: impl Into<String>) -> Self {
        SheetRange {
            sheet: sheet.into(),
            range: Some(range.into()),
        }
    }

    /// Address every populated cell of a sheet
    pub fn whole_sheet(sheet: impl Into<String>) -> Self {
        SheetRange {
            sheet: sheet.into(),
            range: None,
        }
    }

    /// Build a rectangular range from inclusive 0-based corners
    ///
    /// ```
    /// use gsheets::types::SheetRange;
    ///
    /// let range = SheetRange::bounds("Data", 0, 0, 9, 2);
    /// assert_eq!(range.to_string(), "Data!A1:C10");
    /// ```
    pub fn bounds(
        sheet: impl Into<String>,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
    ) -> Self {
        Self::new(
            sheet,
            format!(
                "{}:{}",
                cell_reference(first_row, first_col),
                cell_reference(last_row, last_col)
            ),
        )
    }

    fn quoted_sheet(&self) -> String {
        let plain = !self.sheet.is_empty()
            && self
                .sheet
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            self.sheet.clone()
        } else {
            format!("'{}'", self.sheet.replace('\'', "''"))
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}!{}", self.quoted_sheet(), range),
            None => write!(f, "{}", self.quoted_sheet()),
        }
    }
}
