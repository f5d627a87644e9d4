use anyhow::Result;
use log::info;
use std::path::Path;

use crate::app_config::ProbeMode;
use crate::entry_builder::BuildOutcome;
use crate::file_utils::FileManager;
use crate::reconciler::Mapping;

// @module: Mapping report and reviewer comments

const ERRORS_HEADER: &str = "\n\n## Errors";

/// Totals over a reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingSummary {
    /// Pads with a broadcast date
    pub total: usize,
    /// Pads that already have a record
    pub with_entry: usize,
    /// Pads whose audio was found
    pub with_audio: usize,
    /// Pads with both a record and audio
    pub complete: usize,
    /// Pads without a record
    pub missing_entry: usize,
}

impl MappingSummary {
    pub fn from_mappings(mappings: &[Mapping]) -> Self {
        mappings.iter().fold(Self::default(), |mut summary, mapping| {
            summary.total += 1;
            if mapping.has_existing_entry {
                summary.with_entry += 1;
            } else {
                summary.missing_entry += 1;
            }
            if mapping.has_audio {
                summary.with_audio += 1;
            }
            if mapping.has_existing_entry && mapping.has_audio {
                summary.complete += 1;
            }
            summary
        })
    }
}

/// One line describing a pad that needs attention
pub fn status_line(mapping: &Mapping) -> String {
    let entry = if mapping.has_existing_entry {
        "entry present"
    } else {
        "no entry"
    };
    let audio = if mapping.has_audio {
        format!("{} audio present", mapping.probe_mode)
    } else {
        format!("{} audio missing ({})", mapping.probe_mode, mapping.expected_audio_file_name)
    };
    format!("{}: {}, {} - {}", mapping.date, entry, audio, mapping.pad_url)
}

/// Whether a pad lacks a record, or lacks its published audio
pub fn needs_attention(mapping: &Mapping) -> bool {
    !mapping.has_existing_entry || (mapping.probe_mode == ProbeMode::Remote && !mapping.has_audio)
}

/// Log a status line per pad needing attention, then the totals
pub fn log_mapping_report(mappings: &[Mapping]) -> MappingSummary {
    for mapping in mappings.iter().filter(|mapping| needs_attention(mapping)) {
        info!("{}", status_line(mapping));
    }

    let summary = MappingSummary::from_mappings(mappings);
    info!(
        "Pads: {} total, {} with entry, {} with audio, {} complete, {} missing an entry",
        summary.total, summary.with_entry, summary.with_audio, summary.complete, summary.missing_entry
    );
    summary
}

/// Reviewer text for newly created entries.
///
/// Summaries come first; warnings follow under an `## Errors` heading only
/// when there are any. With several entries each warning names its entry.
pub fn render_comments(outcomes: &[BuildOutcome]) -> String {
    let mut comments = outcomes
        .iter()
        .map(|outcome| outcome.episode.summary.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let tag_warnings = outcomes.len() > 1;
    let mut has_errors = false;
    for outcome in outcomes {
        for warning in &outcome.warnings {
            if !has_errors {
                comments.push_str(ERRORS_HEADER);
                has_errors = true;
            }
            if tag_warnings {
                comments.push_str(&format!("\n* {}: {}", outcome.episode.id, warning));
            } else {
                comments.push_str(&format!("\n* {}", warning));
            }
        }
    }
    comments
}

/// Write the reviewer comments file
pub fn write_comments_file<P: AsRef<Path>>(path: P, outcomes: &[BuildOutcome]) -> Result<()> {
    FileManager::write_to_file(path, &render_comments(outcomes))
}
