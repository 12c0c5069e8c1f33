use polars::prelude::*;

use crate::utils::schema_from_arrays;

/// The nine fixed GTF columns, in file order.
///
/// The second column doubles as gene biotype, transcript biotype or the
/// annotation source depending on the GTF vintage; see
/// [`GtfReaderBuilder::with_infer_biotype`](super::GtfReaderBuilder::with_infer_biotype).
pub const GTF_COLUMNS: [&str; 9] = [
    "seqname",
    "source",
    "feature",
    "start",
    "end",
    "score",
    "strand",
    "frame",
    "attribute",
];

/// Name of the packed attribute column.
pub const ATTRIBUTE_COLUMN: &str = "attribute";

/// Read-time data types for each column.
///
/// Everything is read as String on purpose: `.` means a null score but
/// a zero frame and a real strand, so per-column coercion has to happen
/// after the nine-way split (see the `coerce` module).
pub const fn read_dtypes() -> &'static [DataType] {
    &[
        DataType::String, // seqname
        DataType::String, // source
        DataType::String, // feature
        DataType::String, // start
        DataType::String, // end
        DataType::String, // score
        DataType::String, // strand
        DataType::String, // frame
        DataType::String, // attribute
    ]
}

/// Creates the Polars schema the raw body is read with.
pub fn read_schema() -> Schema {
    schema_from_arrays(&GTF_COLUMNS, read_dtypes())
}

/// Creates CSV read options for the fixed nine-column body.
///
/// Tab separated, no header, `#`-prefixed lines skipped. Quoting is
/// disabled entirely: the attribute column is full of double quotes
/// that must reach the tokenizer untouched.
pub fn read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(SchemaRef::from(read_schema())))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b'\t')
                .with_comment_prefix(Some("#"))
                .with_quote_char(None)
                .with_try_parse_dates(false),
        )
}
