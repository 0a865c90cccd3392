pub mod formatter;

pub use formatter::{format_grade, format_grade_table, format_outcome, should_use_colors};
