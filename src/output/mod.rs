//! 运行结果的持久化与 markdown 合并

pub mod combine;
pub mod record;
pub mod writer;

pub use combine::{combine_markdown_files, CombineReport, SECTION_SEPARATOR};
pub use record::{RecordValue, ToRecord};
pub use writer::{run_record, to_pretty_json, write_record};
