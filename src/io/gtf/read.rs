use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::debug;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

use super::coerce::{
    apply_converter,
    coerce_fixed_columns,
    infer_biotype_columns,
    ColumnConverter,
};
use super::schema::{read_options, read_schema, ATTRIBUTE_COLUMN};
use crate::attributes::{AttributeExpander, DuplicatePolicy};
use crate::error::{GtfError, Result};
#[cfg(feature = "compression")]
use crate::io::compression::Compression;

/// A batched CSV reader that owns its underlying reader.
struct OwnedBatchedReader {
    batched: BatchedCsvReader<'static>,
    // keeps the borrowed reader alive for as long as `batched` is
    _reader: CsvReader<Box<dyn MmapBytesReader>>,
}

impl OwnedBatchedReader {
    fn new(mut reader: CsvReader<Box<dyn MmapBytesReader>>) -> Result<Self> {
        let batched = reader
            .batched_borrowed()
            .map_err(|source| GtfError::Row { source })?;
        // SAFETY: `_reader` is stored next to `batched` and dropped
        // with it, so the borrow never outlives its source.
        let batched: BatchedCsvReader<'static> =
            unsafe { std::mem::transmute(batched) };
        Ok(Self {
            batched,
            _reader: reader,
        })
    }

    fn next_batch(&mut self) -> Result<Option<DataFrame>> {
        let mut batches = self
            .batched
            .next_batches(1)
            .map_err(|source| GtfError::Row { source })?;
        Ok(batches.as_mut().and_then(|b| b.pop()))
    }
}

/// Configures one GTF load.
///
/// ```no_run
/// use gtfparse::GtfReaderBuilder;
///
/// fn main() -> anyhow::Result<()> {
///     let df = GtfReaderBuilder::default()
///         .with_usecols(Some(vec![
///             "seqname".into(),
///             "feature".into(),
///             "gene_id".into(),
///         ]))
///         .finish("annotation.gtf")?;
///     println!("{} records", df.height());
///     Ok(())
/// }
/// ```
pub struct GtfReaderBuilder {
    chunk_size: usize,
    expand_attributes: bool,
    usecols: Option<Vec<String>>,
    column_converters: HashMap<String, ColumnConverter>,
    infer_biotype: bool,
    duplicate_policy: DuplicatePolicy,
    n_threads: Option<usize>,
    low_memory: bool,
    #[cfg(feature = "compression")]
    compression: Option<Compression>,
}

impl Default for GtfReaderBuilder {
    fn default() -> Self {
        Self {
            chunk_size: 1 << 20,
            expand_attributes: true,
            usecols: None,
            column_converters: HashMap::new(),
            infer_biotype: false,
            duplicate_policy: DuplicatePolicy::default(),
            n_threads: None,
            low_memory: false,
            #[cfg(feature = "compression")]
            compression: None,
        }
    }
}

impl GtfReaderBuilder {
    /// Number of records read per chunk.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_chunk_size(
        mut self,
        chunk_size: usize,
    ) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Whether to expand the packed attribute column into one column
    /// per distinct key. When disabled the raw attribute strings are
    /// passed through unchanged.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_expand_attributes(
        mut self,
        expand_attributes: bool,
    ) -> Self {
        self.expand_attributes = expand_attributes;
        self
    }

    /// Restricts the output to the given columns, fixed and attribute
    /// alike. Attribute keys outside the set are parsed but never
    /// materialized.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_usecols(
        mut self,
        usecols: Option<Vec<String>>,
    ) -> Self {
        self.usecols = usecols;
        self
    }

    /// Registers a converter applied to `column` after assembly. Empty
    /// cells become null without a call; see [`ColumnConverter`].
    pub fn with_column_converter<F>(
        mut self,
        column: &str,
        converter: F,
    ) -> Self
    where
        F: Fn(&str) -> anyhow::Result<AnyValue<'static>> + Send + Sync + 'static,
    {
        self.column_converters
            .insert(column.to_string(), Arc::new(converter));
        self
    }

    /// Whether to mirror an old-style biotype-bearing `source` column
    /// into `gene_biotype`/`transcript_biotype`.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_infer_biotype(
        mut self,
        infer_biotype: bool,
    ) -> Self {
        self.infer_biotype = infer_biotype;
        self
    }

    /// Policy for repeated attribute keys within one record.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_duplicate_policy(
        mut self,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_n_threads(
        mut self,
        n_threads: usize,
    ) -> Self {
        self.n_threads = Some(n_threads);
        self
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_low_memory(
        mut self,
        low_memory: bool,
    ) -> Self {
        self.low_memory = low_memory;
        self
    }

    /// Overrides the compression detected from the file extension.
    #[cfg(feature = "compression")]
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn with_compression(
        mut self,
        compression: Compression,
    ) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Loads the GTF file at `path` into a DataFrame.
    ///
    /// Fails fast with [`GtfError::SourceNotFound`] before any parsing
    /// when the path does not exist.
    pub fn finish<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GtfError::SourceNotFound(path.to_path_buf()));
        }
        let handle = self.open_handle(path)?;
        self.finish_from_handle(handle)
    }

    #[cfg(feature = "compression")]
    fn open_handle(
        &self,
        path: &Path,
    ) -> Result<Box<dyn MmapBytesReader>> {
        let compression = self
            .compression
            .unwrap_or_else(|| Compression::from_path(path));
        debug!("opening {} (compression: {})", path.display(), compression.name());
        Ok(compression.get_decoder(File::open(path)?)?)
    }

    #[cfg(not(feature = "compression"))]
    fn open_handle(
        &self,
        path: &Path,
    ) -> Result<Box<dyn MmapBytesReader>> {
        debug!("opening {}", path.display());
        Ok(Box::new(File::open(path)?))
    }

    /// Loads GTF records from an already-open byte stream.
    pub fn finish_from_handle(
        self,
        handle: Box<dyn MmapBytesReader>,
    ) -> Result<DataFrame> {
        let reader = read_options()
            .with_n_threads(self.n_threads)
            .with_low_memory(self.low_memory)
            .with_chunk_size(self.chunk_size)
            .into_reader_with_file_handle(handle);
        let mut batched = OwnedBatchedReader::new(reader)?;

        let restrict = self
            .usecols
            .as_ref()
            .map(|cols| cols.iter().cloned().collect::<HashSet<_>>());
        let mut expander = self
            .expand_attributes
            .then(|| AttributeExpander::new(restrict, self.duplicate_policy));

        // Chunks are consumed strictly in order: key discovery and row
        // alignment both depend on total record order.
        let mut body: Option<DataFrame> = None;
        let mut n_chunks = 0usize;
        while let Some(chunk) = batched.next_batch()? {
            n_chunks += 1;
            let chunk = if let Some(expander) = expander.as_mut() {
                let attrs = chunk.column(ATTRIBUTE_COLUMN)?.str()?;
                for raw in attrs.into_iter() {
                    expander.push_row(raw)?;
                }
                chunk.drop(ATTRIBUTE_COLUMN)?
            }
            else {
                chunk
            };
            match body.as_mut() {
                Some(body) => body.extend(&chunk)?,
                None => body = Some(chunk),
            }
        }

        let df = match body {
            Some(df) => df,
            None => {
                let empty = DataFrame::empty_with_schema(&read_schema());
                if self.expand_attributes {
                    empty.drop(ATTRIBUTE_COLUMN)?
                }
                else {
                    empty
                }
            },
        };
        debug!("parsed {} records in {} chunks", df.height(), n_chunks);

        let mut df = coerce_fixed_columns(df)?;

        if let Some(expander) = expander {
            for series in expander.finish() {
                df.with_column(series)?;
            }
        }

        if let Some(usecols) = self.usecols.as_ref() {
            let keep = {
                let schema = df.schema();
                usecols
                    .iter()
                    .filter(|c| schema.get(c.as_str()).is_some())
                    .cloned()
                    .collect_vec()
            };
            df = df.select(keep)?;
        }

        // Sorted so a failure among several converters is deterministic
        for (column, converter) in self
            .column_converters
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
        {
            let converted = apply_converter(df.column(column.as_str())?, converter)?;
            df.with_column(converted)?;
        }

        if self.infer_biotype {
            infer_biotype_columns(&mut df)?;
        }

        Ok(df)
    }
}

/// Reads a GTF file with default settings: attributes expanded, all
/// columns retained, compression detected from the extension.
pub fn read_gtf<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    GtfReaderBuilder::default().finish(path)
}
