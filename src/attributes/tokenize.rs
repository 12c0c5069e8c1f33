use std::str::Split;

use crate::error::{GtfError, Result};

/// Tokenizes one normalized attribute string into `(key, value)` pairs.
///
/// The field is a sequence of `key value;` entries separated by `;`.
/// The key is the bare token before the first whitespace; the value is
/// the remainder with surrounding double quotes stripped (no escape
/// processing happens here, see
/// [`fix_attribute_quotes`](super::fix_attribute_quotes)). Empty
/// fragments, such as the one after a trailing `;`, are skipped.
///
/// A fragment that cannot be split into key and value yields
/// [`GtfError::Attribute`] naming the fragment; the caller is expected
/// to abort the whole load rather than skip the record.
pub fn tokenize(attributes: &str) -> Tokenize<'_> {
    Tokenize {
        fragments: attributes.split(';'),
    }
}

/// Iterator over the `(key, value)` pairs of one attribute string.
pub struct Tokenize<'a> {
    fragments: Split<'a, char>,
}

impl<'a> Iterator for Tokenize<'a> {
    type Item = Result<(&'a str, &'a str)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fragment = self.fragments.next()?;
            let trimmed = fragment.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(split_fragment(trimmed));
        }
    }
}

fn split_fragment(fragment: &str) -> Result<(&str, &str)> {
    let (key, rest) = fragment
        .split_once(|c: char| c.is_ascii_whitespace())
        .ok_or_else(|| {
            GtfError::Attribute {
                fragment: fragment.to_string(),
                row: None,
            }
        })?;
    let value = rest.trim().trim_matches('"');
    Ok((key, value))
}
