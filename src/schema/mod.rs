mod error;
mod extracted;
mod registry;
mod schema;
mod validation;

pub use error::SchemaError;
pub use extracted::{ExtractedInfo, EXTRACTED_INFO_SCHEMA};
pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaKind};
pub use validation::validate_value;
