//! # gtfparse
//!
//! `gtfparse` reads Gene Transfer Format (GTF) annotation files into a
//! strictly columnar [Polars](https://pola.rs) `DataFrame`. The nine
//! fixed tab-separated columns are parsed by Polars' batched CSV
//! reader; the free-form ninth `attribute` column, which packs an
//! arbitrary set of semicolon-separated `key "value"` pairs, is
//! expanded into one aligned column per distinct key, with nulls where
//! a key is absent from a record.
//!
//! ## Key features
//!
//! * **Attribute expansion**: one output column per attribute key, in
//!   first-seen order, aligned to the original record order. A
//!   restriction set limits which keys are materialized.
//! * **Quote fixups**: known malformed Ensembl exports (stray
//!   semicolons inside quoted values) are repaired before tokenization.
//! * **Typed fixed columns**: start/end as Int64, score as Float32
//!   with `.` as null, frame as Int32 with `.` mapped to 0.
//! * **Chunked single-pass reading** with a configurable chunk size,
//!   and transparent gzip/zstd input (feature `compression`, on by
//!   default).
//! * **Explicit failures**: every malformed line, attribute fragment or
//!   converter error aborts the load with an inspectable
//!   [`GtfError`], never a partial table.
//!
//! ## Usage
//!
//! ```no_run
//! use gtfparse::read_gtf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let df = read_gtf("annotation.gtf.gz")?;
//!     println!(
//!         "{} records, columns: {:?}",
//!         df.height(),
//!         df.get_column_names()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Loads are configured through [`GtfReaderBuilder`]:
//!
//! ```no_run
//! use gtfparse::{DuplicatePolicy, GtfReaderBuilder};
//!
//! fn main() -> anyhow::Result<()> {
//!     let df = GtfReaderBuilder::default()
//!         .with_chunk_size(100_000)
//!         .with_duplicate_policy(DuplicatePolicy::LastWins)
//!         .with_usecols(Some(vec!["seqname".into(), "gene_id".into()]))
//!         .finish("annotation.gtf")?;
//!     println!("{:?}", df);
//!     Ok(())
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod attributes;
pub mod error;
pub mod io;
mod utils;

pub use attributes::{
    expand_attribute_strings,
    AttributeExpander,
    DuplicatePolicy,
    InternPool,
};
pub use error::{GtfError, Result};
pub use io::gtf::{read_gtf, GtfReaderBuilder};
