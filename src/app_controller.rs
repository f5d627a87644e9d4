use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::entry_builder::{BuildOutcome, EntryBuilder};
use crate::errors::EntryError;
use crate::providers::pad::HedgeDocClient;
use crate::providers::sound::prober_for;
use crate::providers::title::HtmlTitleResolver;
use crate::providers::{build_http_client, DocumentFetcher, SoundProber, TitleResolver};
use crate::pad_index::PadIndex;
use crate::reconciler::{extract_date_from_pad_url, PadReconciler};
use crate::report::{self, MappingSummary};
use crate::section_parser;
use crate::store::{format, EpisodeStore};

// @module: Application controller for pad ingestion

/// Result of creating a single entry
#[derive(Debug)]
pub struct SingleRunSummary {
    /// Broadcast date of the entry, `YYYY-MM-DD`
    pub entry_date: String,
    pub outcome: BuildOutcome,
    /// YAML of the entry when no content file is configured
    pub rendered: Option<String>,
}

/// Result of a bulk run
#[derive(Debug, Default)]
pub struct BulkRunSummary {
    pub pads_found: usize,
    pub mappings: MappingSummary,
    pub created: usize,
    pub failed: usize,
    /// Broadcast date of the last entry created
    pub last_entry_date: Option<String>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    fetcher: Arc<dyn DocumentFetcher>,
    resolver: Arc<dyn TitleResolver>,
    prober: Arc<dyn SoundProber>,
    pad_index: PadIndex,
}

impl Controller {
    // @method: Create a controller talking to the real pad server and media host
    pub fn with_config(config: Config) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        let fetcher = Arc::new(HedgeDocClient::new(client.clone()));
        let resolver = Arc::new(HtmlTitleResolver::new(client.clone()));
        let prober = prober_for(&config.audio, client);
        Self::with_collaborators(config, fetcher, resolver, prober)
    }

    /// Create a controller with injected collaborators
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn DocumentFetcher>,
        resolver: Arc<dyn TitleResolver>,
        prober: Arc<dyn SoundProber>,
    ) -> Result<Self> {
        let pad_index = PadIndex::new(config.pads.base_prefix())?;
        Ok(Self {
            config,
            fetcher,
            resolver,
            prober,
            pad_index,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the entry of one pad.
    ///
    /// Without `pad_url` the first pad linked on the listing page is used.
    pub async fn run_single(&self, pad_url: Option<String>) -> Result<SingleRunSummary> {
        let pad_url = match pad_url {
            Some(url) => {
                if !self.pad_index.is_pad_url(&url) {
                    return Err(EntryError::ForeignPadUrl {
                        url,
                        expected_prefix: self.pad_index.base_prefix().to_string(),
                    }
                    .into());
                }
                url
            }
            None => self.first_listed_pad().await?,
        };

        let entry_date = extract_date_from_pad_url(&pad_url)
            .ok_or_else(|| EntryError::MissingDate(pad_url.clone()))?;
        let outcome = self.create_entry(&pad_url).await?;

        let rendered = match self.config.output.content_file.as_deref() {
            Some(path) => {
                let store = EpisodeStore::new(path, self.config.episode.id_prefix.clone());
                let total = store
                    .merge_and_persist(vec![outcome.episode.clone()])
                    .with_context(|| format!("Failed to add entry to {}", path))?;
                info!("Added entry {} to {} ({} entries)", outcome.episode.id, path, total);
                None
            }
            None => Some(format::render_episodes(std::slice::from_ref(&outcome.episode))?),
        };

        self.write_comments(std::slice::from_ref(&outcome))?;

        Ok(SingleRunSummary {
            entry_date,
            outcome,
            rendered,
        })
    }

    /// Create entries for every listed pad that has audio but no entry yet
    pub async fn run_bulk(&self) -> Result<BulkRunSummary> {
        let start_time = Instant::now();
        let content_file = self
            .config
            .output
            .content_file
            .as_deref()
            .ok_or_else(|| anyhow!("Bulk mode needs a content file"))?;
        let store = EpisodeStore::new(content_file, self.config.episode.id_prefix.clone());

        let listing_url = self.config.pads.listing_url();
        let listing = self
            .fetcher
            .fetch(&listing_url)
            .await
            .with_context(|| format!("Failed to fetch pad listing {}", listing_url))?;
        let pad_urls = self.pad_index.discover(&listing);
        info!("Found {} pads on {}", pad_urls.len(), listing_url);

        let existing = store
            .read_by_date()
            .with_context(|| format!("Failed to read {}", content_file))?;
        debug!("{} existing entries", existing.len());

        let reconciler = PadReconciler::new(self.prober.clone(), self.config.episode.audio_file_suffix.clone());
        let mappings = reconciler.reconcile(&pad_urls, &existing).await;
        let mut summary = BulkRunSummary {
            pads_found: pad_urls.len(),
            mappings: report::log_mapping_report(&mappings),
            ..BulkRunSummary::default()
        };

        if self.config.processing.map_only {
            return Ok(summary);
        }

        let candidates: Vec<_> = mappings.iter().filter(|mapping| mapping.is_candidate()).collect();
        let limit = self.config.processing.max_new_entries;

        let progress_bar = ProgressBar::new(candidates.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pads ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let mut outcomes = Vec::new();
        for mapping in candidates {
            progress_bar.set_message(format!("Processing {}", mapping.date));

            match self.create_entry(&mapping.pad_url).await {
                Ok(outcome) => {
                    summary.last_entry_date = Some(mapping.date.clone());
                    outcomes.push(outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    if !self.config.processing.continue_on_error {
                        progress_bar.abandon();
                        return Err(e.context(format!("Failed to create entry for {}", mapping.pad_url)));
                    }
                    progress_bar.suspend(|| error!("Skipping {}: {:#}", mapping.pad_url, e));
                }
            }
            progress_bar.inc(1);

            if limit > 0 && outcomes.len() >= limit {
                progress_bar.suspend(|| info!("Reached the limit of {} new entries", limit));
                break;
            }
        }
        progress_bar.finish_and_clear();

        summary.created = outcomes.len();
        if !outcomes.is_empty() {
            let episodes = outcomes.iter().map(|outcome| outcome.episode.clone()).collect();
            let total = store
                .merge_and_persist(episodes)
                .with_context(|| format!("Failed to write {}", content_file))?;
            info!("Wrote {} entries to {}", total, content_file);
            self.write_comments(&outcomes)?;
        }

        info!(
            "Created {} new entries, {} failed, in {}",
            summary.created,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    /// Fetch, parse and build the entry of one pad
    pub async fn create_entry(&self, pad_url: &str) -> Result<BuildOutcome> {
        let date = extract_date_from_pad_url(pad_url).ok_or_else(|| EntryError::MissingDate(pad_url.to_string()))?;

        let text = self.fetcher.fetch(pad_url).await.map_err(EntryError::from)?;
        let sections = section_parser::parse(&text);

        let builder = EntryBuilder::new(&self.config.episode, self.resolver.as_ref())?;
        let mut outcome = builder.build(&sections, &date).await?;
        outcome.episode.source_url = Some(pad_url.to_string());

        for warning in &outcome.warnings {
            warn!("{}: {}", date, warning);
        }

        Ok(outcome.enforce_strict(self.config.processing.strict)?)
    }

    async fn first_listed_pad(&self) -> Result<String> {
        let listing_url = self.config.pads.listing_url();
        let listing = self
            .fetcher
            .fetch(&listing_url)
            .await
            .with_context(|| format!("Failed to fetch pad listing {}", listing_url))?;
        self.pad_index
            .first_link(&listing)
            .ok_or_else(|| anyhow!("No pad link found on {}", listing_url))
    }

    fn write_comments(&self, outcomes: &[BuildOutcome]) -> Result<()> {
        if let Some(path) = self.config.output.comments_file.as_deref() {
            report::write_comments_file(path, outcomes)
                .with_context(|| format!("Failed to write comments to {}", path))?;
        }
        Ok(())
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3.4s`
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
