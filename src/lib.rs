pub mod config;
pub mod error;
pub mod grading;
pub mod output;
pub mod randomizer;
pub mod sheet;
pub mod transmutation;

pub use error::{GradeError, Result};
