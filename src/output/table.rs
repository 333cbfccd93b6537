//! Tabular result sink: one CSV row per scored candidate

use crate::error::{Result, ScreenerError};
use crate::screening::candidate::ScoredCandidate;
use log::info;
use std::path::Path;

pub const MATCH_MARKER: &str = "✅";
pub const NO_MATCH_MARKER: &str = "❌";

/// Header of the identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierColumn {
    File,
    Name,
}

impl IdentifierColumn {
    pub fn header(&self) -> &'static str {
        match self {
            IdentifierColumn::File => "file",
            IdentifierColumn::Name => "name",
        }
    }

    fn from_header(header: &str) -> Result<Self> {
        match header.trim() {
            "file" => Ok(IdentifierColumn::File),
            "name" => Ok(IdentifierColumn::Name),
            other => Err(ScreenerError::InvalidInput(format!(
                "Unexpected identifier column '{}', expected 'file' or 'name'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub identifier_column: IdentifierColumn,
    pub rows: Vec<ScoredCandidate>,
}

fn marker(matched: bool) -> &'static str {
    if matched {
        MATCH_MARKER
    } else {
        NO_MATCH_MARKER
    }
}

fn parse_marker(value: &str) -> Result<bool> {
    match value.trim() {
        MATCH_MARKER => Ok(true),
        NO_MATCH_MARKER => Ok(false),
        other => match other.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(ScreenerError::InvalidInput(format!("Unrecognised match marker '{}'", other))),
        },
    }
}

impl ResultTable {
    /// Rows are expected to be ranked already; they are written in order.
    pub fn new(identifier_column: IdentifierColumn, rows: Vec<ScoredCandidate>) -> Self {
        Self {
            identifier_column,
            rows,
        }
    }

    /// Overwrites `path`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([self.identifier_column.header(), "score", "match"])?;
        for row in &self.rows {
            let score = format!("{:.2}", row.score);
            writer.write_record([row.identifier.as_str(), score.as_str(), marker(row.matched)])?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let identifier_column = match reader.headers()?.get(0) {
            Some(header) => IdentifierColumn::from_header(header)?,
            None => {
                return Err(ScreenerError::InvalidInput(format!(
                    "Result file has no header: {}",
                    path.display()
                )))
            }
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |index: usize| {
                record.get(index).ok_or_else(|| {
                    ScreenerError::InvalidInput(format!("Missing column {} in {}", index, path.display()))
                })
            };

            let score = field(1)?.trim().parse::<f64>().map_err(|e| {
                ScreenerError::InvalidInput(format!("Invalid score in {}: {}", path.display(), e))
            })?;

            rows.push(ScoredCandidate {
                identifier: field(0)?.to_string(),
                score,
                matched: parse_marker(field(2)?)?,
            });
        }

        Ok(Self {
            identifier_column,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::similarity::MatchThreshold;
    use crate::screening::candidate::rank;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_keeps_every_row_in_ranked_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("results.csv");
        let threshold = MatchThreshold::default();

        let mut rows = vec![
            ScoredCandidate::new("resume_1.pdf", 12.5, &threshold),
            ScoredCandidate::new("resume_2.pdf", 81.25, &threshold),
            ScoredCandidate::new("resume, with comma.pdf", 30.0, &threshold),
        ];
        rank(&mut rows);

        let table = ResultTable::new(IdentifierColumn::File, rows);
        table.write_csv(&path).unwrap();
        let read = ResultTable::read_csv(&path).unwrap();

        assert_eq!(read, table);
        assert!(read.rows.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_csv_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bias.csv");
        let threshold = MatchThreshold::default();

        ResultTable::new(
            IdentifierColumn::Name,
            vec![ScoredCandidate::new("Wei Zhang", 45.1, &threshold)],
        )
        .write_csv(&path)
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,score,match\nWei Zhang,45.10,✅\n");
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        ResultTable::new(IdentifierColumn::File, Vec::new()).write_csv(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "file,score,match\n");
        assert!(ResultTable::read_csv(&path).unwrap().rows.is_empty());
    }

    #[test]
    fn test_write_overwrites_previous_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.csv");
        let threshold = MatchThreshold::default();

        let first = vec![
            ScoredCandidate::new("a.pdf", 50.0, &threshold),
            ScoredCandidate::new("b.pdf", 40.0, &threshold),
        ];
        ResultTable::new(IdentifierColumn::File, first).write_csv(&path).unwrap();
        ResultTable::new(IdentifierColumn::File, vec![ScoredCandidate::new("c.pdf", 10.0, &threshold)])
            .write_csv(&path)
            .unwrap();

        let read = ResultTable::read_csv(&path).unwrap();
        assert_eq!(read.rows.len(), 1);
        assert_eq!(read.rows[0].identifier, "c.pdf");
    }
}
