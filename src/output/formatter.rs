use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::error::Result;
use crate::grading::StudentRecord;
use crate::randomizer::Outcome;
use crate::transmutation::TransmutationTable;

const UNNAMED: &str = "(unnamed)";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Transmuted grade, or "n/a" when the average has no table row
pub fn format_grade(grade: &Result<u32>) -> String {
    match grade {
        Ok(g) => g.to_string(),
        Err(_) => "n/a".to_string(),
    }
}

/// Format students as a table with columns: Index, Name, Initial, Transmuted
/// Initial column is right-aligned, 6 chars wide (fits "100.00")
pub fn format_grade_table(
    records: &[StudentRecord],
    table: &TransmutationTable,
    use_colors: bool,
) -> String {
    format_grade_table_with_width(records, table, use_colors, get_terminal_width())
}

fn format_grade_table_with_width(
    records: &[StudentRecord],
    table: &TransmutationTable,
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if records.is_empty() {
        return "No students found.".to_string();
    }

    // Index "99." + space, two separators, initial 6, transmuted 3
    let separator = "  ";
    let fixed_width = 4 + separator.len() * 2 + 6 + 3;

    let longest = records
        .iter()
        .map(|r| r.name().unwrap_or(UNNAMED).chars().count())
        .max()
        .unwrap_or(0);
    let name_width = match term_width {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = truncate_name(record.name().unwrap_or(UNNAMED), name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let initial = format!("{:>6.2}", record.initial_average());
            let grade = record.transmuted_average(table);
            let grade_str = format!("{:>3}", format_grade(&grade));

            if use_colors {
                let grade_str = if grade.is_ok() {
                    grade_str.bold().to_string()
                } else {
                    grade_str.red().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    name_padded,
                    separator,
                    initial.cyan(),
                    separator,
                    grade_str
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, name_padded, separator, initial, separator, grade_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the result of one randomize call as a single line
/// "{name}: {before} -> {target} ({N} iterations)" on success
pub fn format_outcome(
    name: Option<&str>,
    before: &Result<u32>,
    target: u32,
    result: &Result<Outcome>,
    use_colors: bool,
) -> String {
    let name = name.unwrap_or(UNNAMED);
    let before = format_grade(before);

    match result {
        Ok(Outcome::Converged { iterations }) => {
            let detail = if *iterations == 0 {
                "already at target".to_string()
            } else {
                format!("{} iterations", iterations)
            };
            if use_colors {
                format!("{}: {} -> {} ({})", name.bold(), before, target.green(), detail.dimmed())
            } else {
                format!("{}: {} -> {} ({})", name, before, target, detail)
            }
        }
        Ok(Outcome::Skipped { transmuted }) => {
            let detail = format!("skipped, {} is above the average ceiling", transmuted);
            if use_colors {
                format!("{}: {}", name.bold(), detail.yellow())
            } else {
                format!("{}: {}", name, detail)
            }
        }
        Err(e) => {
            if use_colors {
                format!("{}: {} -> {} {}", name.bold(), before, target, format!("failed: {}", e).red())
            } else {
                format!("{}: {} -> {} failed: {}", name, before, target, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeError;
    use crate::grading::{Component, Score};

    fn record(name: &str, ww: u32, pt: u32) -> StudentRecord {
        let ww = Component::new(vec![Score::Present(ww)], 0.5, Some(40), None).unwrap();
        let pt = Component::new(vec![Score::Present(pt)], 0.5, Some(40), None).unwrap();
        StudentRecord::new(Some(name.to_string()), vec![ww, pt]).unwrap()
    }

    #[test]
    fn test_format_grade_table_empty() {
        let table = TransmutationTable::reference().unwrap();
        assert_eq!(format_grade_table(&[], &table, false), "No students found.");
    }

    #[test]
    fn test_format_grade_table_rows() {
        let table = TransmutationTable::reference().unwrap();
        let records = vec![record("DELA CRUZ, JUAN", 36, 32), record("REYES, ANA", 40, 40)];
        let output = format_grade_table_with_width(&records, &table, false, None);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], " 1. DELA CRUZ, JUAN   85.00   90");
        assert_eq!(lines[1], " 2. REYES, ANA       100.00  100");
    }

    #[test]
    fn test_format_grade_table_out_of_range() {
        let table = TransmutationTable::parse("0-50,70").unwrap();
        let records = vec![record("A", 40, 40)];
        let output = format_grade_table_with_width(&records, &table, false, None);
        assert!(output.ends_with("n/a"));
    }

    #[test]
    fn test_names_truncated_on_narrow_terminal() {
        let table = TransmutationTable::reference().unwrap();
        let records = vec![record("ABCDEFGHIJKLMNOPQRSTUVWXYZ ABCDEFGHIJ", 36, 32)];
        let output = format_grade_table_with_width(&records, &table, false, Some(40));
        assert!(output.contains("..."));
        assert!(output.chars().count() <= 40);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a longer name", 8), "a lon...");
        assert_eq!(truncate_name("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_outcome_converged() {
        let line = format_outcome(
            Some("ANA"),
            &Ok(85),
            90,
            &Ok(Outcome::Converged { iterations: 12 }),
            false,
        );
        assert_eq!(line, "ANA: 85 -> 90 (12 iterations)");
    }

    #[test]
    fn test_format_outcome_skipped_and_failed() {
        let skipped = format_outcome(None, &Ok(99), 95, &Ok(Outcome::Skipped { transmuted: 99 }), false);
        assert_eq!(skipped, "(unnamed): skipped, 99 is above the average ceiling");

        let failed = format_outcome(
            Some("ANA"),
            &Ok(85),
            59,
            &Err(GradeError::MaxIterationsExceeded(10)),
            false,
        );
        assert!(failed.starts_with("ANA: 85 -> 59 failed: Maximum iterations reached (10)"));
    }
}
