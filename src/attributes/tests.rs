use hashbrown::HashSet;

use super::*;
use crate::error::GtfError;

fn pairs(attributes: &str) -> Vec<(String, String)> {
    tokenize(attributes)
        .map(|pair| {
            let (k, v) = pair.unwrap();
            (k.to_string(), v.to_string())
        })
        .collect()
}

#[test]
fn test_fix_attribute_quotes() {
    let raw = r#"gene_id "G1"; gene_name "PRAMEF6;"; exon_number 3;"#;
    let fixed = fix_attribute_quotes(raw);
    assert_eq!(
        fixed,
        r#"gene_id "G1"; gene_name "PRAMEF6"; exon_number 3;"#
    );

    let hyphenated = r#"transcript_name "PRAMEF6;-201";"#;
    assert_eq!(
        fix_attribute_quotes(hyphenated),
        r#"transcript_name "PRAMEF6-201";"#
    );
}

#[test]
fn test_fix_attribute_quotes_idempotent() {
    for raw in [
        r#"gene_id "G1"; gene_name "PRAMEF6;"; exon_number 3;"#,
        r#"transcript_name "PRAMEF6;-201";"#,
        r#"gene_id "G1";"#,
        "",
    ] {
        let once = fix_attribute_quotes(raw).into_owned();
        let twice = fix_attribute_quotes(&once).into_owned();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_fix_attribute_quotes_single_pass_on_stacked_semicolons() {
    // A semicolon run shrinks by one per call; no real export stacks
    // the patterns, so one pass before tokenization is the contract.
    let raw = r#"gene_name "X;;";"#;
    let once = fix_attribute_quotes(raw).into_owned();
    assert_eq!(once, r#"gene_name "X;";"#);
    let twice = fix_attribute_quotes(&once).into_owned();
    assert_eq!(twice, r#"gene_name "X";"#);
}

#[test]
fn test_fix_attribute_quotes_borrows_when_clean() {
    let raw = r#"gene_id "G1";"#;
    assert!(matches!(
        fix_attribute_quotes(raw),
        std::borrow::Cow::Borrowed(_)
    ));
}

#[test]
fn test_tokenize_quoted_and_bare_values() {
    let parsed = pairs(r#"gene_id "G1"; gene_name "PRAMEF6"; exon_number 3;"#);
    assert_eq!(
        parsed,
        vec![
            ("gene_id".to_string(), "G1".to_string()),
            ("gene_name".to_string(), "PRAMEF6".to_string()),
            ("exon_number".to_string(), "3".to_string()),
        ]
    );
}

#[test]
fn test_tokenize_skips_blank_fragments() {
    // Trailing semicolon and doubled separators produce empty fragments
    let parsed = pairs(r#"gene_id "G1";; transcript_id "T1";"#);
    assert_eq!(
        parsed,
        vec![
            ("gene_id".to_string(), "G1".to_string()),
            ("transcript_id".to_string(), "T1".to_string()),
        ]
    );
    assert!(pairs("").is_empty());
    assert!(pairs("  ;  ; ").is_empty());
}

#[test]
fn test_tokenize_keeps_empty_quoted_value() {
    let parsed = pairs(r#"tag "";"#);
    assert_eq!(parsed, vec![("tag".to_string(), String::new())]);
}

#[test]
fn test_tokenize_malformed_fragment() {
    let result: crate::Result<Vec<_>> =
        tokenize(r#"gene_id "G1"; oops;"#).collect();
    let err = result.unwrap_err();
    match err {
        GtfError::Attribute { fragment, row } => {
            assert_eq!(fragment, "oops");
            assert_eq!(row, None);
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_intern_pool_shares_allocations() {
    let mut pool = InternPool::new();
    let first = pool.intern("gene_id");
    let second = pool.intern("gene_id");
    assert!(arcstr::ArcStr::ptr_eq(&first, &second));
    assert_eq!(pool.len(), 1);

    let other = pool.intern("transcript_id");
    assert!(!arcstr::ArcStr::ptr_eq(&first, &other));
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_expander_key_discovery_order() {
    let columns = expand_attribute_strings(
        [
            Some(r#"gene_id "A";"#),
            Some(r#"gene_id "B"; transcript_id "T1";"#),
            Some(r#"exon_number 1; gene_id "B";"#),
        ],
        None,
        DuplicatePolicy::default(),
    )
    .unwrap();

    let names: Vec<&str> = columns.iter().map(|s| s.name().as_str()).collect();
    assert_eq!(names, vec!["gene_id", "transcript_id", "exon_number"]);
    assert!(columns.iter().all(|s| s.len() == 3));
}

#[test]
fn test_expander_row_alignment_with_missing_marker() {
    let columns = expand_attribute_strings(
        [
            Some(r#"gene_id "A";"#),
            Some(r#"gene_id "B"; transcript_id "T1";"#),
        ],
        None,
        DuplicatePolicy::default(),
    )
    .unwrap();

    let gene_id = columns[0].str().unwrap();
    assert_eq!(gene_id.get(0), Some("A"));
    assert_eq!(gene_id.get(1), Some("B"));

    let transcript_id = columns[1].str().unwrap();
    assert_eq!(transcript_id.get(0), None);
    assert_eq!(transcript_id.get(1), Some("T1"));
    assert_eq!(transcript_id.null_count(), 1);
}

#[test]
fn test_expander_restriction_set() {
    let restrict: HashSet<String> = ["gene_id".to_string()].into_iter().collect();
    let columns = expand_attribute_strings(
        [
            Some(r#"gene_id "A";"#),
            Some(r#"gene_id "B"; transcript_id "T1";"#),
        ],
        Some(restrict),
        DuplicatePolicy::default(),
    )
    .unwrap();

    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name().as_str(), "gene_id");
}

#[test]
fn test_expander_duplicate_key_last_wins() {
    let columns = expand_attribute_strings(
        [Some(r#"tag "basic"; tag "CCDS";"#)],
        None,
        DuplicatePolicy::LastWins,
    )
    .unwrap();
    assert_eq!(columns[0].str().unwrap().get(0), Some("CCDS"));
}

#[test]
fn test_expander_duplicate_key_first_wins() {
    let columns = expand_attribute_strings(
        [Some(r#"tag "basic"; tag "CCDS";"#)],
        None,
        DuplicatePolicy::FirstWins,
    )
    .unwrap();
    assert_eq!(columns[0].str().unwrap().get(0), Some("basic"));
}

#[test]
fn test_expander_null_attribute_field() {
    let columns = expand_attribute_strings(
        [Some(r#"gene_id "A";"#), None],
        None,
        DuplicatePolicy::default(),
    )
    .unwrap();
    let gene_id = columns[0].str().unwrap();
    assert_eq!(gene_id.len(), 2);
    assert_eq!(gene_id.get(1), None);
}

#[test]
fn test_expander_malformed_fragment_reports_record() {
    let mut expander = AttributeExpander::new(None, DuplicatePolicy::default());
    expander.push_row(Some(r#"gene_id "A";"#)).unwrap();
    let err = expander.push_row(Some("broken")).unwrap_err();
    match err {
        GtfError::Attribute { fragment, row } => {
            assert_eq!(fragment, "broken");
            assert_eq!(row, Some(1));
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_expander_normalizes_before_tokenizing() {
    let columns = expand_attribute_strings(
        [Some(r#"gene_name "PRAMEF6;";"#)],
        None,
        DuplicatePolicy::default(),
    )
    .unwrap();
    assert_eq!(columns[0].str().unwrap().get(0), Some("PRAMEF6"));
}

#[test]
fn test_expander_empty_input() {
    let columns = expand_attribute_strings(
        std::iter::empty::<Option<&str>>(),
        None,
        DuplicatePolicy::default(),
    )
    .unwrap();
    assert!(columns.is_empty());
}
