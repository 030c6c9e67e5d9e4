//! Provider-shaped tabular data.
//!
//! The upstream feed is a loosely structured table: column names and count
//! are chosen by the provider and may change between responses. A
//! [`RawTable`] keeps the observed column order and stores each row as a
//! name → [`CellValue`] mapping so nothing about the schema is assumed here.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single dynamically typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Provider missing-value sentinel (JSON `null`, pandas `NaN`/`NaT`).
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Converts a JSON scalar into a cell.
    ///
    /// ISO date-time strings are recovered as [`CellValue::DateTime`] since
    /// the provider serializes timestamp columns that way. Nested arrays and
    /// objects are kept as their compact JSON text.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(s) => parse_datetime(s).map_or_else(|| Self::Text(s.clone()), Self::DateTime),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }

    /// JSON form used for the traceability payload.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Whole floats keep a trailing ".0".
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !s.contains('T') {
        return None;
    }
    let s = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok()
}

/// One provider row: column name → cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for `column`; a column the row never carried reads as `None`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }
}

/// Errors decoding a provider payload into a table.
#[derive(Debug, Error)]
pub enum TableDecodeError {
    #[error("unsupported table payload: expected array of records or columns/data object, got {0}")]
    UnsupportedShape(&'static str),

    #[error("row {index} is not a JSON object")]
    InvalidRecord { index: usize },

    #[error("row {index} has {found} cells but {expected} columns were declared")]
    RaggedRow {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Ordered rows of named cells with a provider-defined column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(column, value)` records, keeping first-seen column order.
    pub fn from_records<I, R, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut table = Self::new();
        for record in records {
            table.push_row(record);
        }
        table
    }

    /// Appends a row, registering any columns not seen before.
    pub fn push_row<R, K, V>(&mut self, record: R)
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut row = RawRow::new();
        for (column, value) in record {
            let column = column.into();
            if !self.columns.contains(&column) {
                self.columns.push(column.clone());
            }
            row.insert(column, value);
        }
        self.rows.push(row);
    }

    /// Decodes a provider JSON payload.
    ///
    /// Accepts either an array of row objects or an object with `columns`
    /// and `data` arrays. `null` yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if the payload is neither shape or a row is malformed.
    pub fn from_json(value: &Value) -> Result<Option<Self>, TableDecodeError> {
        match value {
            Value::Null => Ok(None),
            Value::Array(records) => Self::from_record_array(records).map(Some),
            Value::Object(obj) if obj.contains_key("columns") || obj.contains_key("data") => {
                Self::from_split(obj).map(Some)
            }
            Value::Object(_) => Err(TableDecodeError::UnsupportedShape("object")),
            Value::Bool(_) => Err(TableDecodeError::UnsupportedShape("boolean")),
            Value::Number(_) => Err(TableDecodeError::UnsupportedShape("number")),
            Value::String(_) => Err(TableDecodeError::UnsupportedShape("string")),
        }
    }

    fn from_record_array(records: &[Value]) -> Result<Self, TableDecodeError> {
        let mut table = Self::new();
        for (index, record) in records.iter().enumerate() {
            let obj = record
                .as_object()
                .ok_or(TableDecodeError::InvalidRecord { index })?;
            table.push_row(obj.iter().map(|(k, v)| (k.clone(), CellValue::from_json(v))));
        }
        Ok(table)
    }

    fn from_split(obj: &Map<String, Value>) -> Result<Self, TableDecodeError> {
        let columns: Vec<String> = obj
            .get("columns")
            .and_then(Value::as_array)
            .map(|cols| {
                cols.iter()
                    .map(|c| c.as_str().map_or_else(|| c.to_string(), str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut table = Self {
            columns: columns.clone(),
            rows: Vec::new(),
        };

        let data = obj.get("data").and_then(Value::as_array);
        for (index, row) in data.into_iter().flatten().enumerate() {
            let cells = row
                .as_array()
                .ok_or(TableDecodeError::InvalidRecord { index })?;
            if cells.len() != columns.len() {
                return Err(TableDecodeError::RaggedRow {
                    index,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }
            table.push_row(
                columns
                    .iter()
                    .zip(cells)
                    .map(|(c, v)| (c.clone(), CellValue::from_json(v))),
            );
        }

        Ok(table)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes one row as a JSON object in column order.
    ///
    /// Every table column appears; cells the row lacks become `null`.
    #[must_use]
    pub fn row_to_json(&self, row: &RawRow) -> Value {
        let map: Map<String, Value> = self
            .columns
            .iter()
            .map(|c| (c.clone(), row.get(c).map_or(Value::Null, CellValue::to_json)))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_records() {
        let payload = json!([
            {"股票代码": "02570", "招股价": 12.5, "上市日期": "2024-01-20T00:00:00.000"},
            {"股票代码": "09999", "招股价": null, "备注": "暂缓"}
        ]);

        let table = RawTable::from_json(&payload).unwrap().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["股票代码", "招股价", "上市日期", "备注"]);

        let first = &table.rows()[0];
        assert_eq!(first.get("招股价"), Some(&CellValue::Float(12.5)));
        assert_eq!(
            first.get("上市日期"),
            Some(&CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 20)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
        assert!(first.get("备注").is_none());
        assert_eq!(table.rows()[1].get("招股价"), Some(&CellValue::Null));
    }

    #[test]
    fn test_from_json_split() {
        let payload = json!({
            "columns": ["代码", "名称"],
            "data": [["01234", "测试公司"], ["05678", null]]
        });

        let table = RawTable::from_json(&payload).unwrap().unwrap();
        assert_eq!(table.columns(), ["代码", "名称"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].get("名称"), Some(&CellValue::Null));
    }

    #[test]
    fn test_from_json_null_and_empty() {
        assert!(RawTable::from_json(&Value::Null).unwrap().is_none());
        assert!(RawTable::from_json(&json!([])).unwrap().unwrap().is_empty());
        assert!(RawTable::from_json(&json!({"columns": [], "data": []}))
            .unwrap()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            RawTable::from_json(&json!("oops")),
            Err(TableDecodeError::UnsupportedShape("string"))
        ));
        assert!(matches!(
            RawTable::from_json(&json!([1, 2])),
            Err(TableDecodeError::InvalidRecord { index: 0 })
        ));
        assert!(matches!(
            RawTable::from_json(&json!({"columns": ["a", "b"], "data": [["x"]]})),
            Err(TableDecodeError::RaggedRow {
                index: 0,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_row_to_json_keeps_column_order_and_fills_nulls() {
        let mut table = RawTable::new();
        table.push_row([("b", CellValue::from("x")), ("a", CellValue::Float(f64::NAN))]);
        table.push_row([("c", CellValue::from(3_i64))]);

        let raw = table.row_to_json(&table.rows()[0]);
        let keys: Vec<&String> = raw.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(raw["a"], Value::Null);
        assert_eq!(raw["c"], Value::Null);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(CellValue::Float(12.0).to_string(), "12.0");
        assert_eq!(CellValue::Float(1.25).to_string(), "1.25");
        assert_eq!(CellValue::Int(20240105).to_string(), "20240105");
        assert_eq!(CellValue::Null.to_string(), "");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "2024-01-05");
    }
}
