/*!
 * Turns the sections of one pad into an episode record.
 *
 * Missing optional content produces warnings, never errors. The only hard
 * validation failure is a pad without a music section that did not opt out
 * through the `no_music` tag. Warnings are collected in order of discovery so
 * that callers can report them or, in strict mode, refuse the entry.
 */

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;

use crate::app_config::EpisodeConfig;
use crate::episode::{audio_file_name, parse_broadcast_date, Audio, Chapter, Episode, DATE_FORMAT};
use crate::errors::EntryError;
use crate::providers::TitleResolver;
use crate::section_parser::SectionMap;

pub const TAGS_SECTION: &str = "tags";
pub const SUMMARY_SECTION: &str = "summary";
pub const SHOWNOTES_SECTION: &str = "shownotes";
pub const LONG_SUMMARY_SECTION: &str = "long summary";
pub const MUSIC_SECTION: &str = "mukke";
pub const CHAPTERS_SECTION: &str = "chapters";
pub const CHAPTERS_SECTION_ALIAS: &str = "kapitel";

pub const TAG_SHOWNOTES_COMPLETE: &str = "shownotes_complete";
pub const TAG_NO_MUSIC: &str = "no_music";

const SHOWNOTES_HEADER: &str = "**Shownotes:**\n\n";
const MUSIC_HEADER: &str = "\n\n**Musik:**\n";
const MUSIC_ITEM_PREFIX: &str = "\n&#x1f3b6;&nbsp;";

/// Category of a non-fatal processing problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingTags,
    ShownotesIncomplete,
    MissingSummary,
    MissingLongSummary,
    TitleLookupFailed,
    NoMusicLinks,
    SingleChapter,
}

/// Non-fatal problem found while building an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl ProcessingWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProcessingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A built episode together with the warnings raised while building it
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub episode: Episode,
    pub warnings: Vec<ProcessingWarning>,
}

impl BuildOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Fail with `EntryError::StrictMode` when strict and any warning was raised
    pub fn enforce_strict(self, strict: bool) -> Result<Self, EntryError> {
        if strict && self.has_warnings() {
            let pad = self
                .episode
                .source_url
                .clone()
                .unwrap_or_else(|| self.episode.id.clone());
            return Err(EntryError::StrictMode {
                pad,
                count: self.warnings.len(),
            });
        }
        Ok(self)
    }
}

/// Link found in a music line, with the text written in front of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicLink {
    /// Title supplied by the pad author, if any
    pub title: Option<String>,
    pub url: String,
}

/// Builds episodes from parsed pads
pub struct EntryBuilder<'a> {
    config: &'a EpisodeConfig,
    resolver: &'a dyn TitleResolver,
    publication_time: NaiveTime,
    utc_offset: FixedOffset,
}

impl<'a> EntryBuilder<'a> {
    /// Create a builder; fails when the configured publication time or offset is invalid
    pub fn new(config: &'a EpisodeConfig, resolver: &'a dyn TitleResolver) -> Result<Self> {
        let publication_time = config
            .publication_time()
            .context("Invalid publication time in episode configuration")?;
        let utc_offset = config
            .utc_offset()
            .context("Invalid UTC offset in episode configuration")?;

        Ok(Self {
            config,
            resolver,
            publication_time,
            utc_offset,
        })
    }

    /// Build the episode of the broadcast on `date` (`YYYY-MM-DD`)
    pub async fn build(&self, sections: &SectionMap, date: &str) -> Result<BuildOutcome, EntryError> {
        let date = parse_broadcast_date(date).ok_or_else(|| EntryError::InvalidDate(date.to_string()))?;
        let mut warnings = Vec::new();

        let tags = self.collect_tags(sections, &mut warnings);
        let no_music = tags.contains(TAG_NO_MUSIC);

        let music_lines = sections.get(MUSIC_SECTION);
        if music_lines.is_none() && !no_music {
            return Err(EntryError::MissingMusicSection);
        }

        let german_date = date.format("%d.%m.%Y").to_string();

        let summary = match non_blank_section(sections, SUMMARY_SECTION) {
            Some(lines) => lines.join("\n"),
            None => {
                warnings.push(ProcessingWarning::new(
                    WarningKind::MissingSummary,
                    "no summary section in pad",
                ));
                format!("{} {}", self.config.default_summary_prefix, german_date)
            }
        };

        let shownotes = non_blank_section(sections, SHOWNOTES_SECTION)
            .or_else(|| non_blank_section(sections, LONG_SUMMARY_SECTION));
        let mut long_summary = match shownotes {
            Some(lines) => {
                let body = lines
                    .iter()
                    .map(|line| markdownify_links(line))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}{}", SHOWNOTES_HEADER, body)
            }
            None => {
                warnings.push(ProcessingWarning::new(
                    WarningKind::MissingLongSummary,
                    "no long summary section in pad, using short summary",
                ));
                format!("{}{}", SHOWNOTES_HEADER, summary)
            }
        };

        if !no_music {
            if let Some(lines) = music_lines {
                long_summary.push_str(&self.music_listing(lines, &mut warnings).await);
            }
        }

        let chapters = self.collect_chapters(sections, &mut warnings).await;

        let episode = Episode {
            id: format!("{}{}", self.config.id_prefix, date.format(DATE_FORMAT)),
            title: format!("{} {}", self.config.title_prefix, german_date),
            subtitle: self.config.subtitle.clone(),
            summary,
            publication_timestamp: self.publication_timestamp(date)?,
            audio: vec![Audio {
                url: format!(
                    "{}/{}",
                    self.config.media_base_placeholder,
                    audio_file_name(date, &self.config.audio_file_suffix)
                ),
                mime_type: self.config.mime_type.clone(),
            }],
            chapters,
            long_summary_markdown: long_summary,
            ..Episode::default()
        };

        Ok(BuildOutcome { episode, warnings })
    }

    fn collect_tags<'s>(
        &self,
        sections: &'s SectionMap,
        warnings: &mut Vec<ProcessingWarning>,
    ) -> HashSet<&'s str> {
        let Some(lines) = sections.get(TAGS_SECTION) else {
            warnings.push(ProcessingWarning::new(
                WarningKind::MissingTags,
                "no tags found in pad entry",
            ));
            return HashSet::new();
        };

        let tags: HashSet<&str> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|tag| !tag.is_empty())
            .collect();

        if !tags.contains(TAG_SHOWNOTES_COMPLETE) {
            warnings.push(ProcessingWarning::new(
                WarningKind::ShownotesIncomplete,
                format!("tag '{}' not found in tags section", TAG_SHOWNOTES_COMPLETE),
            ));
        }
        tags
    }

    async fn music_listing(&self, lines: &[String], warnings: &mut Vec<ProcessingWarning>) -> String {
        let mut listing = String::new();
        let mut items = 0;

        for link in lines.iter().filter_map(|line| find_first_link(line)) {
            let title = match link.title {
                Some(title) => title,
                None => match self.resolver.resolve_title(&link.url).await {
                    Ok(title) if !title.trim().is_empty() => title.trim().to_string(),
                    Ok(_) => link.url.clone(),
                    Err(e) => {
                        warnings.push(ProcessingWarning::new(
                            WarningKind::TitleLookupFailed,
                            format!("error getting title for {}: {}", link.url, e),
                        ));
                        link.url.clone()
                    }
                },
            };

            if items == 0 {
                listing.push_str(MUSIC_HEADER);
            }
            listing.push_str(&format!("{}[{}]({})", MUSIC_ITEM_PREFIX, title, link.url));
            items += 1;
        }

        if items == 0 {
            warnings.push(ProcessingWarning::new(
                WarningKind::NoMusicLinks,
                "no music found in mukke section",
            ));
        }
        listing
    }

    async fn collect_chapters(
        &self,
        sections: &SectionMap,
        warnings: &mut Vec<ProcessingWarning>,
    ) -> Option<Vec<Chapter>> {
        let Some(lines) = sections
            .get(CHAPTERS_SECTION)
            .or_else(|| sections.get(CHAPTERS_SECTION_ALIAS))
        else {
            info!("No chapters section in pad");
            return None;
        };

        let mut chapters = Vec::new();
        for line in lines {
            let Some((start, title)) = line.trim().split_once(char::is_whitespace) else {
                continue;
            };
            let title = title.trim();
            if title.is_empty() {
                continue;
            }

            let start = normalize_timestamp(start);
            if is_bare_url(title) {
                match self.resolver.resolve_title(title).await {
                    Ok(resolved) if !resolved.trim().is_empty() => {
                        chapters.push(Chapter::new(start, resolved.trim(), Some(title.to_string())));
                    }
                    Ok(_) => chapters.push(Chapter::new(start, title, Some(title.to_string()))),
                    Err(e) => {
                        debug!("Keeping chapter url {} as title: {}", title, e);
                        chapters.push(Chapter::new(start, title, None));
                    }
                }
            } else {
                chapters.push(Chapter::new(start, title, None));
            }
        }

        if chapters.len() == 1 {
            warnings.push(ProcessingWarning::new(
                WarningKind::SingleChapter,
                "only one chapter found in chapters section, ignoring",
            ));
            return None;
        }
        Some(chapters)
    }

    fn publication_timestamp(&self, date: NaiveDate) -> Result<String, EntryError> {
        date.and_time(self.publication_time)
            .and_local_timezone(self.utc_offset)
            .single()
            .map(|timestamp| timestamp.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
            .ok_or_else(|| EntryError::InvalidDate(date.format(DATE_FORMAT).to_string()))
    }
}

/// Section lines with leading and trailing blank lines removed; `None` when absent or blank
fn non_blank_section<'s>(sections: &'s SectionMap, name: &str) -> Option<&'s [String]> {
    let lines = sections.get(name)?;
    let first = lines.iter().position(|line| !line.trim().is_empty())?;
    let last = lines.iter().rposition(|line| !line.trim().is_empty())?;
    Some(&lines[first..=last])
}

fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

fn is_bare_url(text: &str) -> bool {
    is_url(text) && !text.contains(char::is_whitespace)
}

/// Wrap every URL token of a line as a Markdown link `[url](url)`
pub fn markdownify_links(line: &str) -> String {
    line.split(' ')
        .map(|word| {
            if is_url(word) {
                format!("[{}]({})", word, word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First URL of a line and the text written before it.
///
/// Separators trailing the title (`:`, `-`) are dropped, so
/// `Artist - Song: https://...` yields the title `Artist - Song`.
pub fn find_first_link(line: &str) -> Option<MusicLink> {
    let mut title_words = Vec::new();
    for word in line.split_whitespace() {
        if is_url(word) {
            let title = title_words
                .join(" ")
                .trim_end_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
                .to_string();
            return Some(MusicLink {
                title: if title.is_empty() { None } else { Some(title) },
                url: word.to_string(),
            });
        }
        title_words.push(word);
    }
    None
}

/// Pad a `hh:mm` timestamp to `hh:mm:00`; anything else is kept as written
pub fn normalize_timestamp(start: &str) -> String {
    if start.split(':').count() == 2 {
        format!("{}:00", start)
    } else {
        start.to_string()
    }
}
