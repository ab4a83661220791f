pub mod top_set;

pub use top_set::{ScoredCombination, TopSet};
