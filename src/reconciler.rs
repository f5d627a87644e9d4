/*!
 * Matches discovered pads against existing records and available audio.
 *
 * Each pad is keyed by the `_YYYY-MM-DD` token in its URL. Pads without such
 * a token are not episodes and are skipped silently.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::ProbeMode;
use crate::episode::{audio_file_name, parse_broadcast_date, Episode};
use crate::providers::SoundProber;

static PAD_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(\d{4}-\d{2}-\d{2})").unwrap());

/// Broadcast date (`YYYY-MM-DD`) encoded in a pad URL.
///
/// Only the first `_YYYY-MM-DD` token counts and it must be a real calendar date.
pub fn extract_date_from_pad_url(url: &str) -> Option<String> {
    let date = PAD_DATE_REGEX.captures(url)?.get(1)?.as_str();
    parse_broadcast_date(date).map(|_| date.to_string())
}

/// Status of one discovered pad
#[derive(Debug, Clone)]
pub struct Mapping {
    pub pad_url: String,

    /// Broadcast date, `YYYY-MM-DD`
    pub date: String,

    pub has_existing_entry: bool,

    pub existing_entry: Option<Episode>,

    /// Where the audio was looked for
    pub probe_mode: ProbeMode,

    /// Whether the audio file was found in `probe_mode`
    pub has_audio: bool,

    pub expected_audio_file_name: String,
}

impl Mapping {
    pub fn has_audio_locally(&self) -> bool {
        self.probe_mode == ProbeMode::Local && self.has_audio
    }

    pub fn has_audio_remotely(&self) -> bool {
        self.probe_mode == ProbeMode::Remote && self.has_audio
    }

    /// Pad with audio but no record yet
    pub fn is_candidate(&self) -> bool {
        !self.has_existing_entry && self.has_audio
    }
}

/// Builds mappings for a set of pad URLs
#[derive(Debug, Clone)]
pub struct PadReconciler {
    prober: Arc<dyn SoundProber>,
    audio_file_suffix: String,
}

impl PadReconciler {
    pub fn new(prober: Arc<dyn SoundProber>, audio_file_suffix: impl Into<String>) -> Self {
        Self {
            prober,
            audio_file_suffix: audio_file_suffix.into(),
        }
    }

    /// One mapping per dated pad URL, in input order.
    ///
    /// `existing` maps broadcast dates to the records already in the store.
    pub async fn reconcile(&self, pad_urls: &[String], existing: &HashMap<String, Episode>) -> Vec<Mapping> {
        let mut mappings = Vec::with_capacity(pad_urls.len());

        for pad_url in pad_urls {
            let Some(date) = extract_date_from_pad_url(pad_url) else {
                debug!("Skipping pad without broadcast date: {}", pad_url);
                continue;
            };
            let Some(broadcast_date) = parse_broadcast_date(&date) else {
                continue;
            };

            let expected_audio_file_name = audio_file_name(broadcast_date, &self.audio_file_suffix);
            let has_audio = self.prober.exists(&expected_audio_file_name).await;
            let existing_entry = existing.get(&date).cloned();

            mappings.push(Mapping {
                pad_url: pad_url.clone(),
                date,
                has_existing_entry: existing_entry.is_some(),
                existing_entry,
                probe_mode: self.prober.mode(),
                has_audio,
                expected_audio_file_name,
            });
        }

        mappings
    }
}
