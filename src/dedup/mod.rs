//! Removal stages. Each takes ownership of the surviving records and returns
//! the next survivors plus the decisions it made, in discovery order.

pub mod exact;
pub mod lexical;
pub mod semantic;

use crate::record::Record;
use crate::types::removal::RemovalDecision;

pub use exact::remove_exact_duplicates;
pub use lexical::{ngram_similarity, remove_lexical_duplicates};
pub use semantic::{cosine_similarity, remove_semantic_duplicates};

/// Output of one removal stage.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    /// Survivors, in the order they were received.
    pub kept: Vec<Record>,
    pub removals: Vec<RemovalDecision>,
}
