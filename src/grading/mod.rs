pub mod component;
pub mod record;
pub mod score;

pub use component::Component;
pub use record::StudentRecord;
pub use score::{round2, sum_scores, Score};
