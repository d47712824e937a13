pub mod metadata;
pub mod parser;
pub mod record;

pub use metadata::Metadata;
pub use parser::{parse_records, ParseOptions, ParsedRecords, DEFAULT_CATEGORY};
pub use record::{ingest, RawRecord, Record, RecordError};
