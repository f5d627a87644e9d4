/*!
 * Tests for splitting pad Markdown into sections
 */

use padcast::section_parser::{parse, PRE_SECTION};

/// Test that lines land in the section opened by the preceding heading
#[test]
fn test_parse_withSeveralSections_shouldGroupLinesByHeading() {
    let sections = parse("intro\n## Summary\nHello\nWorld\n## Tags\nshownotes_complete\n");

    assert_eq!(sections[PRE_SECTION], vec!["intro"]);
    assert_eq!(sections["summary"], vec!["Hello", "World"]);
    assert_eq!(sections["tags"], vec!["shownotes_complete"]);
}

/// Test that heading names are matched case-insensitively
#[test]
fn test_parse_withMixedCaseHeading_shouldLowercaseName() {
    let sections = parse("## SuMmArY  \nHello\n");

    assert_eq!(sections["summary"], vec!["Hello"]);
}

/// Test that the space after the heading marker is optional
#[test]
fn test_parse_withoutSpaceAfterMarker_shouldStillStartSection() {
    let sections = parse("##tags \nno_music\n");

    assert_eq!(sections["tags"], vec!["no_music"]);
}

/// Test that headings of other levels are dropped
#[test]
fn test_parse_withOtherHeadingLevels_shouldDropThem() {
    let sections = parse("# Title\n## Shownotes\n### Details\nline\n#### Deeper\n");

    assert_eq!(sections["shownotes"], vec!["line"]);
    assert!(!sections.contains_key("details"));
    assert!(sections[PRE_SECTION].is_empty());
}

/// Test that lines are trimmed of spaces and blank lines are kept
#[test]
fn test_parse_withPaddedAndBlankLines_shouldTrimAndKeep() {
    let sections = parse("## Shownotes\n  first  \n\n   \nsecond\n");

    assert_eq!(sections["shownotes"], vec!["first", "", "", "second"]);
}

/// Test that a repeated section name keeps its last occurrence
#[test]
fn test_parse_withRepeatedSection_shouldKeepLastOccurrence() {
    let sections = parse("## Summary\nfirst\n## Other\nx\n## summary\nsecond\n");

    assert_eq!(sections["summary"], vec!["second"]);
}

/// Test that a heading directly followed by another yields an empty section
#[test]
fn test_parse_withEmptySection_shouldRecordEmptyLines() {
    let sections = parse("## Mukke\n## Tags\nno_music");

    assert!(sections.contains_key("mukke"));
    assert!(sections["mukke"].is_empty());
}

/// Test that joining the non-heading lines rebuilds the trimmed input
#[test]
fn test_parse_reconstruction_shouldMatchNonHeadingLines() {
    let text = "pre\n## A\n one\ntwo \n## B\n\nthree\n";
    let sections = parse(text);

    let mut rebuilt = Vec::new();
    rebuilt.extend(sections[PRE_SECTION].iter().cloned());
    rebuilt.extend(sections["a"].iter().cloned());
    rebuilt.extend(sections["b"].iter().cloned());

    let expected: Vec<String> = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.trim_matches(' ').to_string())
        .collect();
    assert_eq!(rebuilt, expected);
}

/// Test that Windows line endings do not leak into lines or names
#[test]
fn test_parse_withCrlfLineEndings_shouldStripCarriageReturns() {
    let sections = parse("## Summary\r\nHello\r\n");

    assert_eq!(sections["summary"], vec!["Hello"]);
}

/// Test that empty input yields only an empty pre-section
#[test]
fn test_parse_withEmptyInput_shouldYieldEmptyPreSection() {
    let sections = parse("");

    assert_eq!(sections.len(), 1);
    assert!(sections[PRE_SECTION].is_empty());
}
