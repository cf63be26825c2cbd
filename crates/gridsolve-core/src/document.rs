//! Grid document type definitions
//!
//! A GridDocument is the canonical representation of a solved equation:
//! a rows × columns grid with a sparse cell map. Documents are immutable
//! once persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document validity errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

/// The canonical rows/columns/cells record for a solved-equation step grid.
///
/// `key` is the original input string and doubles as the cache key. Cell
/// labels are 1-indexed `"<row>x<column>"`; an absent label means an empty
/// cell. The all-zero document with no cells is the "invalid input"
/// sentinel and is a valid success value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDocument {
    /// Original input equation/text; unique identifier and cache key
    #[serde(rename = "matrixId", alias = "key")]
    pub key: String,
    /// Number of grid rows
    pub rows: u32,
    /// Number of grid columns
    pub columns: u32,
    /// Sparse cell map, `"1x1"`-style labels to values
    #[serde(default)]
    pub cells: BTreeMap<String, String>,
}

impl GridDocument {
    /// Create a validated document.
    pub fn new(
        key: impl Into<String>,
        rows: u32,
        columns: u32,
        cells: BTreeMap<String, String>,
    ) -> Result<Self, DocumentError> {
        let document = Self {
            key: key.into(),
            rows,
            columns,
            cells,
        };
        document.validate()?;
        Ok(document)
    }

    /// Create the "invalid input" sentinel for a given key.
    pub fn sentinel(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rows: 0,
            columns: 0,
            cells: BTreeMap::new(),
        }
    }

    /// Whether this is the "invalid input" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.rows == 0 && self.columns == 0 && self.cells.is_empty()
    }

    /// Check the document invariants.
    ///
    /// Every cell label must parse as `<r>x<c>` with `1 <= r <= rows` and
    /// `1 <= c <= columns`. With zero rows or columns any cell is out of
    /// bounds, so the sentinel necessarily carries an empty map.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for label in self.cells.keys() {
            let (row, column) = parse_cell_label(label)?;
            if row == 0 || column == 0 || row > self.rows || column > self.columns {
                return Err(DocumentError::MalformedDocument(format!(
                    "cell '{}' outside {}x{} grid",
                    label, self.rows, self.columns
                )));
            }
        }
        Ok(())
    }
}

/// Parse a `"<row>x<column>"` cell label into its coordinates.
fn parse_cell_label(label: &str) -> Result<(u32, u32), DocumentError> {
    let malformed =
        || DocumentError::MalformedDocument(format!("invalid cell label '{}'", label));
    let (row, column) = label.split_once('x').ok_or_else(malformed)?;
    let row: u32 = row.parse().map_err(|_| malformed())?;
    let column: u32 = column.parse().map_err(|_| malformed())?;
    Ok((row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_document() {
        let doc = GridDocument::new(
            "2x + 3 = 7",
            2,
            5,
            cells(&[("1x1", "2x"), ("1x2", "+"), ("2x5", "2")]),
        )
        .unwrap();
        assert_eq!(doc.rows, 2);
        assert!(!doc.is_sentinel());
    }

    #[test]
    fn test_sentinel_is_valid() {
        let doc = GridDocument::sentinel("hello world");
        assert!(doc.validate().is_ok());
        assert!(doc.is_sentinel());
    }

    #[test]
    fn test_sparse_cells_allowed() {
        // Labels need not cover every slot; absence means empty cell.
        let doc = GridDocument::new("x = 1", 3, 3, cells(&[("3x3", "1")]));
        assert!(doc.is_ok());
    }

    #[test]
    fn test_cell_outside_bounds_rejected() {
        let result = GridDocument::new("x = 1", 1, 5, cells(&[("2x1", "x")]));
        assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));

        let result = GridDocument::new("x = 1", 1, 5, cells(&[("1x6", "x")]));
        assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));
    }

    #[test]
    fn test_zero_index_rejected() {
        let result = GridDocument::new("x = 1", 2, 2, cells(&[("0x1", "x")]));
        assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));
    }

    #[test]
    fn test_bad_label_syntax_rejected() {
        for label in ["11", "ax2", "1x", "x1", "1x2x3", "-1x2"] {
            let result = GridDocument::new("x = 1", 3, 3, cells(&[(label, "v")]));
            assert!(
                matches!(result, Err(DocumentError::MalformedDocument(_))),
                "label '{}' should be rejected",
                label
            );
        }
    }

    #[test]
    fn test_cell_on_sentinel_dimensions_rejected() {
        let result = GridDocument::new("x", 0, 0, cells(&[("1x1", "v")]));
        assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));
    }

    #[test]
    fn test_structural_equality() {
        let a = GridDocument::new("k", 1, 2, cells(&[("1x1", "a"), ("1x2", "b")])).unwrap();
        let b = GridDocument::new("k", 1, 2, cells(&[("1x2", "b"), ("1x1", "a")])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wire_shape_uses_matrix_id() {
        let doc = GridDocument::sentinel("invalid_input");
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"matrixId\":\"invalid_input\""));

        let parsed: GridDocument =
            serde_json::from_str(r#"{"matrixId":"k","rows":0,"columns":0,"cells":{}}"#).unwrap();
        assert!(parsed.is_sentinel());

        // `key` accepted as an input alias
        let parsed: GridDocument =
            serde_json::from_str(r#"{"key":"k","rows":0,"columns":0,"cells":{}}"#).unwrap();
        assert_eq!(parsed.key, "k");
    }
}
