use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One data row: an ordered mapping from column header to cell text.
///
/// Serializes as a JSON object whose key order follows the row's column
/// order. Setting an existing column replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(key, _)| *key == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(key, _)| key == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.set(key, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Cell values arriving from JSON clients; numbers and booleans are kept as
/// their textual form and `null` becomes an empty cell.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Null,
}

impl From<CellValue> for String {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Text(text) => text,
            CellValue::Integer(number) => number.to_string(),
            CellValue::Float(number) => number.to_string(),
            CellValue::Flag(flag) => flag.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping column names to cell values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
        let mut row = Row::new();
        while let Some((key, value)) = access.next_entry::<String, CellValue>()? {
            row.set(key, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

/// Attendee data loaded from a CSV file.
///
/// `headers` are unique and ordered; every row carries exactly the headers'
/// columns in the same order once it has passed the backend's load boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl CsvData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A CSV counts as loaded once it has a header line.
    pub fn is_loaded(&self) -> bool {
        !self.headers.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn value(&self, index: usize, column: &str) -> Option<&str> {
        self.rows.get(index).and_then(|row| row.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keeps_column_order_through_json() {
        let row: Row = serde_json::from_str(r#"{"Name": "Ada", "Badge Number": 7, "VIP": true, "Notes": null}"#)
            .unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), ["Name", "Badge Number", "VIP", "Notes"]);
        assert_eq!(row.get("Badge Number"), Some("7"));
        assert_eq!(row.get("VIP"), Some("true"));
        assert_eq!(row.get("Notes"), Some(""));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"Name":"Ada","Badge Number":"7","VIP":"true","Notes":""}"#
        );
    }

    #[test]
    fn setting_existing_column_replaces_in_place() {
        let mut row: Row = [("First", "Ada"), ("Last", "Lovelace")].into_iter().collect();
        row.set("First", "Augusta");
        assert_eq!(row.len(), 2);
        assert_eq!(row.iter().next(), Some(("First", "Augusta")));
    }

    #[test]
    fn value_lookup_is_bounds_checked() {
        let data = CsvData {
            headers: vec!["Name".into()],
            rows: vec![[("Name", "Ada")].into_iter().collect()],
        };
        assert!(data.is_loaded());
        assert_eq!(data.value(0, "Name"), Some("Ada"));
        assert_eq!(data.value(1, "Name"), None);
        assert_eq!(data.value(0, "Company"), None);
    }
}
