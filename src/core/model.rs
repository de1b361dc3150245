//! In-memory form of a loaded shapefile: records, attribute cells, schema

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use shapefile::dbase::{self, FieldValue};
use shapefile::Shape;

// AttributeValue - a single cell of the attribute table

/// A dBase cell reduced to something that can be hashed and ordered, so a
/// tuple of them can key a duplicate group.
///
/// Floating values compare by bit pattern: NaN matches NaN, and a missing
/// value matches another missing value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Logical(bool),
    /// `YYYY-MM-DD`. Datetime fields are kept as their debug text in `Text`.
    Date(String),
    Null,
}

impl AttributeValue {
    fn discriminant(&self) -> u8 {
        match self {
            AttributeValue::Null => 0,
            AttributeValue::Logical(_) => 1,
            AttributeValue::Integer(_) => 2,
            AttributeValue::Number(_) => 3,
            AttributeValue::Text(_) => 4,
            AttributeValue::Date(_) => 5,
        }
    }
}

impl From<&FieldValue> for AttributeValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Character(Some(s)) => AttributeValue::Text(s.clone()),
            FieldValue::Memo(s) => AttributeValue::Text(s.clone()),
            FieldValue::Numeric(Some(n)) => AttributeValue::Number(*n),
            FieldValue::Float(Some(f)) => AttributeValue::Number(f64::from(*f)),
            FieldValue::Double(d) => AttributeValue::Number(*d),
            FieldValue::Currency(c) => AttributeValue::Number(*c),
            FieldValue::Integer(i) => AttributeValue::Integer(i64::from(*i)),
            FieldValue::Logical(Some(b)) => AttributeValue::Logical(*b),
            FieldValue::Date(Some(d)) => {
                AttributeValue::Date(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
            }
            FieldValue::Character(None)
            | FieldValue::Numeric(None)
            | FieldValue::Float(None)
            | FieldValue::Logical(None)
            | FieldValue::Date(None) => AttributeValue::Null,
            other => AttributeValue::Text(format!("{other:?}")),
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for AttributeValue {}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use AttributeValue::*;
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Logical(a), Logical(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => self.discriminant().cmp(&other.discriminant()),
        }
    }
}

impl std::hash::Hash for AttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        match self {
            AttributeValue::Text(s) | AttributeValue::Date(s) => s.hash(state),
            AttributeValue::Integer(i) => i.hash(state),
            AttributeValue::Number(f) => f.to_bits().hash(state),
            AttributeValue::Logical(b) => b.hash(state),
            AttributeValue::Null => {}
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s:?}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Logical(b) => write!(f, "{b}"),
            AttributeValue::Date(d) => write!(f, "{d}"),
            AttributeValue::Null => write!(f, "<null>"),
        }
    }
}

// ColumnInfo - one attribute column of the schema

/// Name and dBase type of an attribute column, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub field_type: String,
}

// GeoRecord / RecordCollection

/// One row: a geometry plus its attribute record.
pub struct GeoRecord {
    pub shape: Shape,
    pub record: dbase::Record,
}

impl fmt::Debug for GeoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoRecord")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl GeoRecord {
    /// Value of `column`, `Null` when the record does not carry it.
    pub fn value(&self, column: &str) -> AttributeValue {
        self.record
            .get(column)
            .map(AttributeValue::from)
            .unwrap_or(AttributeValue::Null)
    }

    /// The grouping key for `columns`, in selection order.
    pub fn key(&self, columns: &[String]) -> Vec<AttributeValue> {
        columns.iter().map(|c| self.value(c)).collect()
    }
}

/// Every record of one shapefile, in file order, with its attribute schema.
pub struct RecordCollection {
    /// The `.shp` this collection was loaded from.
    pub path: PathBuf,
    pub columns: Vec<ColumnInfo>,
    pub records: Vec<GeoRecord>,
    /// dBase header of the source table, reused verbatim for output.
    pub table_info: dbase::TableInfo,
}

impl RecordCollection {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_missing_values_group_together() {
        let a = AttributeValue::from(&FieldValue::Character(None));
        let b = AttributeValue::from(&FieldValue::Numeric(None));
        assert_eq!(a, AttributeValue::Null);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_matches_nan() {
        let a = AttributeValue::Number(f64::NAN);
        let b = AttributeValue::Number(f64::NAN);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_text_and_number_never_equal() {
        let text = AttributeValue::Text("1".to_string());
        let number = AttributeValue::Number(1.0);
        assert_ne!(text, number);
    }

    #[test]
    fn test_field_value_conversion() {
        assert_eq!(
            AttributeValue::from(&FieldValue::Character(Some("x".to_string()))),
            AttributeValue::Text("x".to_string())
        );
        assert_eq!(
            AttributeValue::from(&FieldValue::Integer(7)),
            AttributeValue::Integer(7)
        );
        assert_eq!(
            AttributeValue::from(&FieldValue::Logical(Some(true))),
            AttributeValue::Logical(true)
        );
    }

    #[test]
    fn test_absent_column_reads_as_null() {
        let rec = GeoRecord {
            shape: Shape::Point(shapefile::Point::new(0.0, 0.0)),
            record: dbase::Record::default(),
        };
        assert_eq!(rec.value("RefPM"), AttributeValue::Null);
    }

    #[test]
    fn test_debug_shows_record_only() {
        let rec = GeoRecord {
            shape: Shape::NullShape,
            record: dbase::Record::default(),
        };
        let text = format!("{rec:?}");
        assert!(text.starts_with("GeoRecord { record:"));
        assert!(text.ends_with(".. }"));
    }
}
