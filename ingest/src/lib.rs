//! Catalog loading: file discovery, schema resolution, numeric cleanup and
//! engine construction for the search core.

pub mod error;
pub mod loader;
pub mod numeric;
pub mod schema;

pub use error::{LoadError, SchemaError};
pub use loader::{load_records, load_tokenizer, open_engine};
pub use schema::{parse_column_map, resolve_schema, ColumnMap, Field};
