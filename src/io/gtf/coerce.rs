use std::sync::Arc;

use polars::prelude::*;

use crate::error::{GtfError, Result};

/// Per-column converter applied after the table is fully assembled.
///
/// The converter receives the non-empty string content of each cell;
/// empty and missing cells become null without a call. A failure aborts
/// the load as [`GtfError::Conversion`], identifying column and row.
pub type ColumnConverter =
    Arc<dyn Fn(&str) -> anyhow::Result<AnyValue<'static>> + Send + Sync>;

fn row_error(message: String) -> GtfError {
    GtfError::Row {
        source: PolarsError::ComputeError(message.into()),
    }
}

/// Coerces the frame column to Int32.
///
/// `.` maps to the literal integer 0, not to null: GTF's own convention
/// conflates "no frame data" with frame zero, and that mapping is
/// preserved exactly. Any other integer parses to its value as-is
/// without a range check, although 0, 1 and 2 are the only frames a
/// well-formed GTF carries; non-numeric input aborts the load.
pub(crate) fn coerce_frame(column: &Column) -> Result<Column> {
    let ca = column.str()?;
    let mut builder =
        PrimitiveChunkedBuilder::<Int32Type>::new(column.name().clone(), ca.len());
    for opt in ca.into_iter() {
        match opt {
            None => builder.append_null(),
            Some(".") => builder.append_value(0),
            Some(raw) => {
                match raw.trim().parse::<i32>() {
                    Ok(frame) => builder.append_value(frame),
                    Err(_) => {
                        return Err(row_error(format!(
                            "invalid frame value {:?}",
                            raw
                        )))
                    },
                }
            },
        }
    }
    Ok(builder.finish().into_series().into_column())
}

/// Coerces the score column to Float32, with `.` as the missing marker.
pub(crate) fn coerce_score(column: &Column) -> Result<Column> {
    let ca = column.str()?;
    let mut builder =
        PrimitiveChunkedBuilder::<Float32Type>::new(column.name().clone(), ca.len());
    for opt in ca.into_iter() {
        match opt {
            None | Some(".") => builder.append_null(),
            Some(raw) => {
                match raw.trim().parse::<f32>() {
                    Ok(score) => builder.append_value(score),
                    Err(_) => {
                        return Err(row_error(format!(
                            "invalid score value {:?}",
                            raw
                        )))
                    },
                }
            },
        }
    }
    Ok(builder.finish().into_series().into_column())
}

/// Coerces a start/end column to Int64. Coordinates are required, so
/// there is no `.` escape hatch here.
pub(crate) fn coerce_coordinate(column: &Column) -> Result<Column> {
    let ca = column.str()?;
    let mut builder =
        PrimitiveChunkedBuilder::<Int64Type>::new(column.name().clone(), ca.len());
    for opt in ca.into_iter() {
        match opt {
            None => builder.append_null(),
            Some(raw) => {
                match raw.trim().parse::<i64>() {
                    Ok(coord) => builder.append_value(coord),
                    Err(_) => {
                        return Err(row_error(format!(
                            "invalid {} value {:?}",
                            column.name(),
                            raw
                        )))
                    },
                }
            },
        }
    }
    Ok(builder.finish().into_series().into_column())
}

/// Applies the fixed-column coercions in place: start/end to Int64,
/// score to Float32, frame to Int32.
pub(crate) fn coerce_fixed_columns(mut df: DataFrame) -> Result<DataFrame> {
    let start = coerce_coordinate(df.column("start")?)?;
    let end = coerce_coordinate(df.column("end")?)?;
    let score = coerce_score(df.column("score")?)?;
    let frame = coerce_frame(df.column("frame")?)?;
    df.with_column(start)?;
    df.with_column(end)?;
    df.with_column(score)?;
    df.with_column(frame)?;
    Ok(df)
}

/// Runs a user converter over one string column.
pub(crate) fn apply_converter(
    column: &Column,
    converter: &ColumnConverter,
) -> Result<Column> {
    let ca = column.str()?;
    let mut values: Vec<AnyValue<'static>> = Vec::with_capacity(ca.len());
    for (row, opt) in ca.into_iter().enumerate() {
        match opt {
            None | Some("") => values.push(AnyValue::Null),
            Some(cell) => {
                let converted =
                    converter(cell).map_err(|source| {
                        GtfError::Conversion {
                            column: column.name().to_string(),
                            row,
                            source,
                        }
                    })?;
                values.push(converted);
            },
        }
    }
    let series = Series::from_any_values(column.name().clone(), &values, true)?;
    Ok(series.into_column())
}

/// Heuristically reinterprets the ambiguous `source` column as biotype.
///
/// Old Ensembl GTFs stored the gene or transcript biotype in the second
/// column. When the column contains `protein_coding`, mirror it into
/// `gene_biotype` and `transcript_biotype` wherever those keys never
/// occurred as attributes; if `gene_biotype` already exists, the source
/// column is taken to be the transcript biotype, matching the original
/// disambiguation rule.
pub(crate) fn infer_biotype_columns(df: &mut DataFrame) -> Result<()> {
    let source = match df.column("source") {
        Ok(column) => column.as_materialized_series().clone(),
        Err(_) => {
            log::warn!("no source column present, skipping biotype inference");
            return Ok(());
        },
    };
    let has_protein_coding = source
        .str()?
        .into_iter()
        .any(|v| v == Some("protein_coding"));
    if !has_protein_coding {
        return Ok(());
    }
    for name in ["gene_biotype", "transcript_biotype"] {
        if df.schema().get(name).is_none() {
            let mut mirrored = source.clone();
            mirrored.rename(name.into());
            df.with_column(mirrored)?;
        }
    }
    Ok(())
}
