pub mod storage;
pub mod types;

pub use storage::{load_sheet, save_sheet};
pub use types::{ClassSheet, HeadComponent, StudentRow};
