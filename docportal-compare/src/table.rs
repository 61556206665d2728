//! The tabular comparison result.

use docportal_error::TracedError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the comparison: a page and what changed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Page identifier ("1", "2-3", "appendix", ...)
    #[serde(alias = "Page")]
    pub page: String,
    /// Description of the differences, or "NO CHANGE"
    #[serde(alias = "Changes")]
    pub changes: String,
}

/// The structured comparison result, one row per reported page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn from_rows(rows: Vec<ComparisonRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the table for machine consumers
    pub fn to_json(&self) -> Result<String, TracedError> {
        serde_json::to_string_pretty(&self.rows)
            .map_err(|e| TracedError::wrap("render_table_json", e))
    }
}

// Two aligned columns; multi-line change descriptions continue under the
// CHANGES column.
impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "(no differences reported)");
        }

        let page_width = self
            .rows
            .iter()
            .map(|row| row.page.len())
            .chain(std::iter::once("PAGE".len()))
            .max()
            .unwrap_or(4);

        writeln!(f, "{:<width$}  CHANGES", "PAGE", width = page_width)?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let mut lines = row.changes.lines();
            let first = lines.next().unwrap_or("");
            write!(f, "{:<width$}  {}", row.page, first, width = page_width)?;
            for line in lines {
                write!(f, "\n{:<width$}  {}", "", line, width = page_width)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ComparisonTable {
        ComparisonTable::from_rows(vec![
            ComparisonRow {
                page: "1".into(),
                changes: "NO CHANGE".into(),
            },
            ComparisonRow {
                page: "2-3".into(),
                changes: "pricing table updated\nfooter reworded".into(),
            },
        ])
    }

    #[test]
    fn test_row_accepts_capitalized_keys() {
        let row: ComparisonRow =
            serde_json::from_str(r#"{"Page": "4", "Changes": "NO CHANGE"}"#).unwrap();
        assert_eq!(row.page, "4");
        assert_eq!(row.changes, "NO CHANGE");
    }

    #[test]
    fn test_display_aligns_page_column() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "PAGE  CHANGES");
        assert_eq!(lines[1], "1     NO CHANGE");
        assert_eq!(lines[2], "2-3   pricing table updated");
        assert_eq!(lines[3], "      footer reworded");
    }

    #[test]
    fn test_empty_table_display() {
        let table = ComparisonTable::default();
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "(no differences reported)");
    }

    #[test]
    fn test_to_json_round_trips_rows() {
        let json = sample().to_json().unwrap();
        let rows: Vec<ComparisonRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, sample().rows());
    }
}
