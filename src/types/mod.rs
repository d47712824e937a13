pub mod corpus;
pub mod identifiers;
pub mod removal;

pub use corpus::Corpus;
pub use identifiers::{ContentHash, RecordId};
pub use removal::{audit_trail, AuditEntry, DedupMethod, RemovalDecision, SimilarityEdge};
