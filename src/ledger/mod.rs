mod collect;
mod error;
mod normalize;
mod parse;

pub use collect::{SourceFormat, load_sources, read_source};
pub use error::{RecordError, RecordResult};
pub use normalize::{
    LoadFilter, LoadReport, ParsedRecord, build_nodes, normalize_records, parse_record,
};
pub use parse::{RawRecord, TIMESTAMP_FORMAT, parse_csv, parse_json};
