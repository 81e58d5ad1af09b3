//! Integration tests for the SEARCH/REPLACE protocol
//!
//! These exercise the public parse/apply surface end to end, the way a
//! session consumes it: reply text in, rewritten document out.

use resumeloop::{ApplyError, EditRecord, ParseError, apply_all, parse_blocks};

const RESUME: &str = "\
<ul>
  <li>
    Built a feature-rich map editor using React and TypeScript.
  </li>
  <li>
    Maintained CI pipelines for a team of six engineers.
  </li>
</ul>
";

// =============================================================================
// Reply-to-document scenarios
// =============================================================================

#[test]
fn test_two_block_reply_rewrites_both_bullets() {
    let reply = "\
Here are the improvements:

<<<<<<< SEARCH
    Built a feature-rich map editor using React and TypeScript.
=======
    Developed a collaborative map editor using React and TypeScript,
    improving user engagement.
>>>>>>> REPLACE

Emphasizes collaboration and impact.

<<<<<<< SEARCH
    Maintained CI pipelines for a team of six engineers.
=======
    Streamlined CI pipelines for six engineers, cutting build times by 40%.
>>>>>>> REPLACE

Adds a quantified impact.
";

    let records = parse_blocks(reply).expect("reply should parse");
    assert_eq!(records.len(), 2);

    let outcome = apply_all(records, RESUME);
    assert!(outcome.failures.is_empty());
    assert!(outcome.document.contains("collaborative map editor"));
    assert!(outcome.document.contains("cutting build times by 40%"));
    // untouched markup survives byte for byte
    assert!(outcome.document.starts_with("<ul>\n"));
    assert!(outcome.document.ends_with("</ul>\n"));
}

#[test]
fn test_partial_failure_reports_only_the_bad_block() {
    let records = vec![
        EditRecord::new(
            "    Built a feature-rich map editor using React and TypeScript.",
            "    Built a collaborative map editor using React and TypeScript.",
            "collaboration",
        ),
        EditRecord::new("this text is not in the resume", "anything", "stale suggestion"),
    ];

    let outcome = apply_all(records, RESUME);
    assert!(outcome.document.contains("collaborative map editor"));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].error, ApplyError::NoReplacement);

    // the failure carries the record, so a corrective message can echo it
    let echoed = outcome.failures[0].record.to_block();
    let reparsed = parse_blocks(&echoed).unwrap();
    assert_eq!(reparsed, vec![outcome.failures[0].record.clone()]);
}

#[test]
fn test_ambiguous_edit_is_rejected_with_count() {
    let records = vec![EditRecord::new("  <li>", "  <li class=\"x\">", "styling")];
    let outcome = apply_all(records, RESUME);
    assert_eq!(
        outcome.failures[0].error,
        ApplyError::MultipleReplacements { count: 2 }
    );
    // nothing changed
    assert_eq!(outcome.document, RESUME);
}

// =============================================================================
// Malformed replies
// =============================================================================

#[test]
fn test_truncated_reply_names_the_missing_fence() {
    let reply = "<<<<<<< SEARCH\nsome text\n=======\nother text\n";
    assert_eq!(
        parse_blocks(reply),
        Err(ParseError::UnexpectedEndOfInput {
            expected: ">>>>>>> REPLACE",
        })
    );
}

#[test]
fn test_reply_with_no_blocks_at_all() {
    let reply = "I think your resume looks great as it is!\n";
    assert_eq!(
        parse_blocks(reply),
        Err(ParseError::UnexpectedEndOfInput {
            expected: "<<<<<<< SEARCH",
        })
    );
}
