use std::collections::HashMap;

// @module: Markdown pad splitting into named sections

/// Bucket for lines appearing before the first second-level heading
pub const PRE_SECTION: &str = "pre-section";

/// Lowercase section name mapped to its trimmed lines.
///
/// A name occurring twice keeps the content of its last occurrence.
pub type SectionMap = HashMap<String, Vec<String>>;

/// Split raw pad text into sections.
///
/// `## Name` starts a new section (name lowercased and trimmed; the space after
/// the marker is optional), any other heading line is dropped, every other
/// line is trimmed of surrounding spaces and appended to the current section.
pub fn parse(raw_text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current_name = PRE_SECTION.to_string();
    let mut current_lines: Vec<String> = Vec::new();

    for line in raw_text.lines() {
        if let Some(heading) = second_level_heading(line) {
            sections.insert(current_name, std::mem::take(&mut current_lines));
            current_name = section_name(heading);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        current_lines.push(line.trim_matches(' ').to_string());
    }

    sections.insert(current_name, current_lines);
    sections
}

// @returns: Heading text when the line is a second-level heading
fn second_level_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest)
}

// @normalizes: Heading text into a lookup key
fn section_name(heading: &str) -> String {
    heading.to_lowercase().trim_matches(' ').to_string()
}
