use arcstr::ArcStr;
use hashbrown::HashSet;
use indexmap::IndexSet;
use log::debug;
use polars::prelude::*;

use super::intern::InternPool;
use super::normalize::fix_attribute_quotes;
use super::tokenize::tokenize;
use crate::error::Result;

/// What to do when one record repeats an attribute key.
///
/// Some GTF emitters write repeated keys within a single record, e.g.
/// `tag "basic"; tag "CCDS";`. The expanded cell can hold only one
/// value, so a policy picks the survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Later occurrences overwrite earlier ones.
    #[default]
    LastWins,
    /// The first occurrence is kept, later ones are ignored.
    FirstWins,
}

/// Streaming attribute-column builder.
///
/// Feed one raw attribute string per record with [`push_row`], in
/// record order, then call [`finish`] to densify into one String series
/// per discovered key. Keys enter the registry in first-seen order,
/// which is also the output column order; the registry only grows
/// during the pass. Cells of rows where a key never occurred are null,
/// never the empty string, so a legitimately empty value (`tag ""`)
/// stays distinguishable from an absent key.
///
/// Accumulation is sparse, `(column, value)` entries per row, so cost
/// is O(total pairs); the dense O(rows x keys) layout is only
/// materialized by [`finish`].
///
/// [`push_row`]: AttributeExpander::push_row
/// [`finish`]: AttributeExpander::finish
pub struct AttributeExpander {
    pool:     InternPool,
    registry: IndexSet<ArcStr>,
    restrict: Option<HashSet<String>>,
    policy:   DuplicatePolicy,
    rows:     Vec<Vec<(usize, ArcStr)>>,
}

impl AttributeExpander {
    /// Creates an expander.
    ///
    /// When `restrict` is given, keys outside the set are still parsed,
    /// to keep the tokenizer correctly positioned, but never
    /// materialized as output columns.
    pub fn new(
        restrict: Option<HashSet<String>>,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            pool: InternPool::new(),
            registry: IndexSet::new(),
            restrict,
            policy,
            rows: Vec::new(),
        }
    }

    /// Parses one record's attribute field and records its pairs.
    ///
    /// `None` stands for a record whose attribute field was absent; it
    /// still occupies a row so alignment with the fixed columns holds.
    pub fn push_row(
        &mut self,
        raw: Option<&str>,
    ) -> Result<()> {
        let row_idx = self.rows.len();
        let mut entries: Vec<(usize, ArcStr)> = Vec::new();

        if let Some(raw) = raw {
            let normalized = fix_attribute_quotes(raw);
            for pair in tokenize(&normalized) {
                let (key, value) = pair.map_err(|e| e.with_row(row_idx))?;
                if let Some(restrict) = self.restrict.as_ref() {
                    if !restrict.contains(key) {
                        continue;
                    }
                }
                let (column, _) = self.registry.insert_full(self.pool.intern(key));
                let value = self.pool.intern(value);
                match self.policy {
                    DuplicatePolicy::LastWins => {
                        if let Some(slot) =
                            entries.iter_mut().find(|(c, _)| *c == column)
                        {
                            slot.1 = value;
                        }
                        else {
                            entries.push((column, value));
                        }
                    },
                    DuplicatePolicy::FirstWins => {
                        if !entries.iter().any(|(c, _)| *c == column) {
                            entries.push((column, value));
                        }
                    },
                }
            }
        }

        self.rows.push(entries);
        Ok(())
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Discovered keys, in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(|k| k.as_str())
    }

    /// Densifies into one String series per tracked key.
    ///
    /// Every series has exactly one entry per pushed row.
    pub fn finish(self) -> Vec<Series> {
        let n_rows = self.rows.len();
        debug!(
            "densifying {} attribute columns over {} records ({} interned strings)",
            self.registry.len(),
            n_rows,
            self.pool.len()
        );

        let mut builders: Vec<StringChunkedBuilder> = self
            .registry
            .iter()
            .map(|key| StringChunkedBuilder::new(PlSmallStr::from_str(key), n_rows))
            .collect();

        let mut scratch: Vec<Option<&ArcStr>> = vec![None; builders.len()];
        for entries in self.rows.iter() {
            for (column, value) in entries {
                scratch[*column] = Some(value);
            }
            for (builder, slot) in builders.iter_mut().zip(scratch.iter_mut()) {
                builder.append_option(slot.take().map(ArcStr::as_str));
            }
        }

        builders
            .into_iter()
            .map(|b| b.finish().into_series())
            .collect()
    }
}

/// Expands a sequence of raw attribute strings into one aligned String
/// series per distinct key.
///
/// This is the one-shot form of [`AttributeExpander`] for callers that
/// already hold the whole attribute column in memory.
pub fn expand_attribute_strings<'a, I>(
    attributes: I,
    restrict: Option<HashSet<String>>,
    policy: DuplicatePolicy,
) -> Result<Vec<Series>>
where
    I: IntoIterator<Item = Option<&'a str>>, {
    let mut expander = AttributeExpander::new(restrict, policy);
    for attr in attributes {
        expander.push_row(attr)?;
    }
    Ok(expander.finish())
}
