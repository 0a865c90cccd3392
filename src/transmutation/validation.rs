use super::table::TransmutationTable;

/// Validate a transmutation table's structure.
/// Returns all validation errors at once (not just the first).
pub fn validate_table(table: &TransmutationTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let rows = table.rows();

    for (i, row) in rows.iter().enumerate() {
        if row.min > row.max {
            errors.push(format!(
                "transmutation[{}]: min {} is greater than max {}",
                i, row.min, row.max
            ));
        }
    }

    for (i, a) in rows.iter().enumerate() {
        for (j, b) in rows.iter().enumerate().skip(i + 1) {
            if a.min <= b.max && b.min <= a.max {
                errors.push(format!(
                    "transmutation[{}] ({}-{}) overlaps transmutation[{}] ({}-{})",
                    i, a.min, a.max, j, b.min, b.max
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmutation::TransmutationRow;

    #[test]
    fn test_reference_table_is_valid() {
        let table = TransmutationTable::reference().unwrap();
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_detects_overlap() {
        let table = TransmutationTable::parse("0-50,70\n50-100,80").unwrap();
        let errors = validate_table(&table).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("overlaps"));
    }

    #[test]
    fn test_detects_inverted_range() {
        let table = TransmutationTable::parse("10-5,70").unwrap();
        let errors = validate_table(&table).unwrap_err();
        assert!(errors[0].contains("greater than max"));
    }

    #[test]
    fn test_table_built_from_rows() {
        let table = TransmutationTable::new(vec![
            TransmutationRow { min: 0.0, max: 49.99, transmuted: 70 },
            TransmutationRow { min: 50.0, max: 100.0, transmuted: 80 },
        ]);
        assert!(validate_table(&table).is_ok());
        assert_eq!(table.lookup(49.99).unwrap(), 70);
        assert_eq!(table.lookup(50.0).unwrap(), 80);
    }

    #[test]
    fn test_collects_all_errors() {
        let table = TransmutationTable::parse("10-5,70\n0-50,71\n40-60,72").unwrap();
        let errors = validate_table(&table).unwrap_err();
        // inverted row, plus rows 0/1 and 1/2 overlapping
        assert_eq!(errors.len(), 3);
    }
}
