pub mod table;
pub mod validation;

pub use table::{TransmutationRow, TransmutationTable};
pub use validation::validate_table;
