/*!
 * YAML rendering of episode records.
 *
 * serde_yaml picks scalar styles on its own, but the content file is read and
 * reviewed by humans and diffed in pull requests, so every field is written in
 * a fixed style chosen by its key:
 *
 * - `summary`: folded block
 * - `long_summary_md`: literal block
 * - `publicationDate`: double quoted
 * - `uuid`, `subtitle`, `url`, `mimeType`: plain
 * - everything else: single quoted
 *
 * A style that cannot represent a value losslessly falls back to a quoted one.
 * Structure (key order, nesting) comes from serializing the record into a
 * `serde_yaml::Value`, so unknown preserved keys render like known ones.
 */

use serde_yaml::{Mapping, Value};

use crate::episode::Episode;
use crate::errors::StoreError;

/// Spaces per nesting level
pub const INDENT: usize = 2;

/// Separator between the documents of the content file
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// How a scalar is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    /// Preferred style of the value stored under `key`
    pub fn for_key(key: &str) -> Self {
        match key {
            "summary" => Self::Folded,
            "long_summary_md" => Self::Literal,
            "publicationDate" => Self::DoubleQuoted,
            "uuid" | "subtitle" | "url" | "mimeType" => Self::Plain,
            _ => Self::SingleQuoted,
        }
    }
}

/// Render episodes as a multi-document YAML stream
pub fn render_episodes(episodes: &[Episode]) -> Result<String, StoreError> {
    let mut out = String::new();
    for (index, episode) in episodes.iter().enumerate() {
        if index > 0 {
            out.push_str(DOCUMENT_SEPARATOR);
        }
        let value = serde_yaml::to_value(episode).map_err(|e| StoreError::Encode(e.to_string()))?;
        render_document(&mut out, &value)?;
    }
    Ok(out)
}

/// Render one document
pub fn render_document(out: &mut String, value: &Value) -> Result<(), StoreError> {
    match value {
        Value::Mapping(map) if !map.is_empty() => write_mapping(out, map, 0, false),
        other => write_fallback(out, other, 0),
    }
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize, first_line_started: bool) -> Result<(), StoreError> {
    for (index, (key, value)) in map.iter().enumerate() {
        if index > 0 || !first_line_started {
            push_indent(out, indent);
        }
        let key_text = key_text(key)?;
        out.push_str(&key_text);
        out.push(':');
        write_mapping_value(out, key.as_str().unwrap_or_default(), value, indent)?;
    }
    Ok(())
}

fn write_mapping_value(out: &mut String, key: &str, value: &Value, indent: usize) -> Result<(), StoreError> {
    match value {
        Value::Mapping(map) if map.is_empty() => out.push_str(" {}\n"),
        Value::Mapping(map) => {
            out.push('\n');
            write_mapping(out, map, indent + INDENT, false)?;
        }
        Value::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
        Value::Sequence(items) => {
            out.push('\n');
            write_sequence(out, items, indent + INDENT)?;
        }
        Value::Tagged(_) => {
            out.push('\n');
            write_fallback(out, value, indent + INDENT)?;
        }
        scalar => {
            out.push(' ');
            write_scalar(out, scalar, ScalarStyle::for_key(key), indent + INDENT);
        }
    }
    Ok(())
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize) -> Result<(), StoreError> {
    for item in items {
        push_indent(out, indent);
        out.push_str("- ");
        match item {
            Value::Mapping(map) if !map.is_empty() => write_mapping(out, map, indent + INDENT, true)?,
            Value::Mapping(_) => out.push_str("{}\n"),
            Value::Sequence(nested) if nested.is_empty() => out.push_str("[]\n"),
            Value::Sequence(_) | Value::Tagged(_) => {
                out.push('\n');
                write_fallback(out, item, indent + INDENT)?;
            }
            scalar => write_scalar(out, scalar, ScalarStyle::SingleQuoted, indent + INDENT),
        }
    }
    Ok(())
}

// Nodes without a fixed style are left to serde_yaml, re-indented to fit
fn write_fallback(out: &mut String, value: &Value, indent: usize) -> Result<(), StoreError> {
    let rendered = serde_yaml::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))?;
    for line in rendered.lines() {
        if !line.is_empty() {
            push_indent(out, indent);
        }
        out.push_str(line);
        out.push('\n');
    }
    Ok(())
}

fn key_text(key: &Value) -> Result<String, StoreError> {
    match key {
        Value::String(s) if is_plain_safe(s) => Ok(s.clone()),
        Value::String(s) => Ok(single_quoted(s)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(StoreError::Encode(format!("unsupported mapping key {:?}", other))),
    }
}

/// Write a scalar followed by a line break.
///
/// `block_indent` is the indentation of block scalar content.
fn write_scalar(out: &mut String, value: &Value, style: ScalarStyle, block_indent: usize) {
    match value {
        Value::Null => out.push_str("null\n"),
        Value::Bool(b) => {
            out.push_str(&b.to_string());
            out.push('\n');
        }
        Value::Number(n) => {
            out.push_str(&n.to_string());
            out.push('\n');
        }
        Value::String(s) => write_string(out, s, style, block_indent),
        // Collections never reach here
        _ => out.push_str("null\n"),
    }
}

/// Write a string in `requested` style, or the closest style able to hold it
pub fn write_string(out: &mut String, s: &str, requested: ScalarStyle, block_indent: usize) {
    match effective_style(s, requested) {
        ScalarStyle::Plain => out.push_str(s),
        ScalarStyle::SingleQuoted => out.push_str(&single_quoted(s)),
        ScalarStyle::DoubleQuoted => out.push_str(&double_quoted(s)),
        ScalarStyle::Literal => {
            write_block(out, s, '|', block_indent);
            return;
        }
        ScalarStyle::Folded => {
            write_block(out, s, '>', block_indent);
            return;
        }
    }
    out.push('\n');
}

/// Style actually used for `s` when `requested` is preferred
pub fn effective_style(s: &str, requested: ScalarStyle) -> ScalarStyle {
    if s.chars().any(needs_escape) {
        return ScalarStyle::DoubleQuoted;
    }
    match requested {
        ScalarStyle::Plain if is_plain_safe(s) => ScalarStyle::Plain,
        ScalarStyle::Plain | ScalarStyle::SingleQuoted => {
            if s.contains('\n') {
                ScalarStyle::DoubleQuoted
            } else {
                ScalarStyle::SingleQuoted
            }
        }
        ScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        ScalarStyle::Literal | ScalarStyle::Folded if block_body(s).is_empty() => {
            if s.is_empty() {
                ScalarStyle::SingleQuoted
            } else {
                ScalarStyle::DoubleQuoted
            }
        }
        ScalarStyle::Folded if is_foldable(s) => ScalarStyle::Folded,
        ScalarStyle::Literal | ScalarStyle::Folded => ScalarStyle::Literal,
    }
}

// Control characters other than tab and newline cannot appear in block or single quoted scalars
fn needs_escape(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t')
        || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}')
}

fn block_body(s: &str) -> &str {
    s.trim_end_matches('\n')
}

// Folding turns a single line break into a space, so only content whose lines
// are all non-empty and free of edge whitespace survives it
fn is_foldable(s: &str) -> bool {
    block_body(s).split('\n').all(|line| {
        !line.is_empty()
            && !line.starts_with([' ', '\t'])
            && !line.ends_with([' ', '\t'])
    })
}

/// Whether `s` reads back as the same string when written unquoted
pub fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s.contains(['\n', '\t']) || s.trim() != s {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) || first.is_ascii_digit() || first == '+' || first == '.' {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    !matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null" | "~"
    )
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn double_quoted(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\0' => quoted.push_str("\\0"),
            c if (c as u32) < 0x80 && c.is_control() => quoted.push_str(&format!("\\x{:02X}", c as u32)),
            c if needs_escape(c) => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn write_block(out: &mut String, s: &str, indicator: char, indent: usize) {
    let body = block_body(s);
    let trailing_breaks = s.len() - body.len();

    out.push(indicator);
    // Content indentation cannot be detected when the first content line starts with a space
    if body
        .split('\n')
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with(' '))
    {
        out.push_str(&INDENT.to_string());
    }
    match trailing_breaks {
        0 => out.push('-'),
        1 => {}
        _ => out.push('+'),
    }
    out.push('\n');

    for (index, line) in body.split('\n').enumerate() {
        if indicator == '>' && index > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            push_indent(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing_breaks {
        out.push('\n');
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}
