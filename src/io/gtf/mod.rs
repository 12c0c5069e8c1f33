//! GTF reading: the fixed nine-column body is delegated to Polars'
//! batched CSV reader; the attribute column is routed through the
//! [`attributes`](crate::attributes) engine and merged back as one
//! column per key.

mod coerce;
mod read;
mod schema;

pub use coerce::ColumnConverter;
pub use read::{read_gtf, GtfReaderBuilder};
pub use schema::{read_options, read_schema, ATTRIBUTE_COLUMN, GTF_COLUMNS};
