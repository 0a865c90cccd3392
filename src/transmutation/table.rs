use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::error::{GradeError, Result};

const REFERENCE_TABLE: &str = include_str!("../../resources/transmutation_table.txt");

/// One closed interval `[min, max]` of initial averages mapping to a grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmutationRow {
    pub min: f64,
    pub max: f64,
    pub transmuted: u32,
}

impl TransmutationRow {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Parse a single `"<min>-<max>,<int>"` row.
    fn parse(s: &str) -> std::result::Result<Self, String> {
        let (range, transmuted) = s
            .split_once(',')
            .ok_or_else(|| format!("expected '<min>-<max>,<grade>', got '{}'", s))?;

        let (min, max) = range
            .split_once('-')
            .ok_or_else(|| format!("invalid range '{}'", range.trim()))?;

        let min: f64 = min
            .trim()
            .parse()
            .map_err(|e| format!("invalid minimum '{}': {}", min.trim(), e))?;
        let max: f64 = max
            .trim()
            .parse()
            .map_err(|e| format!("invalid maximum '{}': {}", max.trim(), e))?;
        if !min.is_finite() || !max.is_finite() {
            return Err(format!("range bounds must be finite, got '{}'", range.trim()));
        }
        let transmuted: u32 = transmuted
            .trim()
            .parse()
            .map_err(|e| format!("invalid grade '{}': {}", transmuted.trim(), e))?;

        Ok(TransmutationRow { min, max, transmuted })
    }
}

/// Ordered transmutation table. Built once by the host and passed by
/// reference to whatever needs a transmuted grade.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmutationTable {
    rows: Vec<TransmutationRow>,
}

impl TransmutationTable {
    pub fn new(rows: Vec<TransmutationRow>) -> Self {
        Self { rows }
    }

    /// The reference table shipped with the crate (initial 0-100 to grade 60-100).
    pub fn reference() -> Result<Self> {
        Self::parse(REFERENCE_TABLE)
    }

    /// Parse a table from text, one row per line. Blank lines are skipped.
    pub fn parse(source: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = TransmutationRow::parse(line).map_err(|reason| GradeError::Parse {
                line: idx + 1,
                reason,
            })?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(GradeError::Parse {
                line: 0,
                reason: "table has no rows".to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Load a table from a text file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transmutation table at {}", path.display()))?;
        let table = Self::parse(&content)
            .with_context(|| format!("Failed to parse transmutation table {}", path.display()))?;
        tracing::debug!(rows = table.rows.len(), path = %path.display(), "loaded transmutation table");
        Ok(table)
    }

    /// First row whose range contains `value` wins.
    pub fn lookup(&self, value: f64) -> Result<u32> {
        self.rows
            .iter()
            .find(|row| row.contains(value))
            .map(|row| row.transmuted)
            .ok_or(GradeError::OutOfRange(value))
    }

    pub fn rows(&self) -> &[TransmutationRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_row() {
        let table = TransmutationTable::parse("85-89,90").unwrap();
        assert_eq!(
            table.rows(),
            &[TransmutationRow { min: 85.0, max: 89.0, transmuted: 90 }]
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_blank_lines() {
        let table = TransmutationTable::parse("\n 0 - 49.99 , 70 \n\n50-100,80\n").unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.lookup(50.0).unwrap(), 80);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = TransmutationTable::parse("0-50,70\n50-100\n").unwrap_err();
        match err {
            GradeError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert!(TransmutationTable::parse("a-10,70").is_err());
        assert!(TransmutationTable::parse("0-10,seventy").is_err());
        assert!(TransmutationTable::parse("0-10,-1").is_err());
        assert!(TransmutationTable::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite_bounds() {
        for source in ["nan-nan,70", "0-inf,70", "-inf-10,70", "0-NaN,70"] {
            assert!(
                matches!(TransmutationTable::parse(source), Err(GradeError::Parse { line: 1, .. })),
                "{} was accepted",
                source
            );
        }
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let table = TransmutationTable::parse("0-50,70\n50-100,80").unwrap();
        assert_eq!(table.lookup(50.0).unwrap(), 70);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = TransmutationTable::parse("0-50,70").unwrap();
        assert_eq!(table.lookup(50.5), Err(GradeError::OutOfRange(50.5)));
        assert_eq!(table.lookup(-1.0), Err(GradeError::OutOfRange(-1.0)));
    }

    #[test]
    fn test_reference_table_known_values() {
        let table = TransmutationTable::reference().unwrap();
        assert_eq!(table.lookup(0.0).unwrap(), 60);
        assert_eq!(table.lookup(59.99).unwrap(), 74);
        assert_eq!(table.lookup(60.0).unwrap(), 75);
        assert_eq!(table.lookup(85.0).unwrap(), 90);
        assert_eq!(table.lookup(99.99).unwrap(), 99);
        assert_eq!(table.lookup(100.0).unwrap(), 100);
        assert!(table.lookup(100.01).is_err());
    }

    #[test]
    fn test_reference_table_is_total_over_hundredths() {
        let table = TransmutationTable::reference().unwrap();
        for hundredths in 0..=10_000u32 {
            let value = hundredths as f64 / 100.0;
            let matches = table.rows().iter().filter(|r| r.contains(value)).count();
            assert_eq!(matches, 1, "value {} matched {} rows", value, matches);
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("class_genie_test_table.txt");
        std::fs::write(&path, "0-100,75\n").unwrap();
        let table = TransmutationTable::load(&path).unwrap();
        assert_eq!(table.lookup(42.0).unwrap(), 75);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("class_genie_test_table_missing.txt");
        let _ = std::fs::remove_file(&path);
        assert!(TransmutationTable::load(&path).is_err());
    }
}
