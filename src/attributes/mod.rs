//! The attribute-column expansion engine.
//!
//! A GTF record's ninth column packs an arbitrary set of
//! semicolon-separated `key "value"` pairs. This module turns a
//! sequence of such strings into a fixed set of aligned columns: the
//! [`fix_attribute_quotes`] pass repairs known malformed quoting, the
//! [`tokenize`] iterator splits one string into pairs, and the
//! [`AttributeExpander`] discovers keys in first-seen order and builds
//! one null-padded String series per key. An [`InternPool`] deduplicates
//! the recurring keys and values during accumulation.

mod expand;
mod intern;
mod normalize;
mod tokenize;

pub use expand::{expand_attribute_strings, AttributeExpander, DuplicatePolicy};
pub use intern::InternPool;
pub use normalize::fix_attribute_quotes;
pub use tokenize::{tokenize, Tokenize};

#[cfg(test)]
mod tests;
