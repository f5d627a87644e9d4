/*!
 * Ordered multi-document YAML store of episode records.
 *
 * The whole file is read, merged with new records, sorted by broadcast date and
 * written back in one atomic replace. The store assumes a single writer; two
 * concurrent runs against the same file race and the last one wins.
 */

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::episode::Episode;
use crate::errors::StoreError;
use crate::file_utils::FileManager;

pub mod format;

/// Content file holding one YAML document per episode
#[derive(Debug, Clone)]
pub struct EpisodeStore {
    path: PathBuf,
    /// Id prefix stripped to recover the broadcast date
    id_prefix: String,
}

impl EpisodeStore {
    pub fn new(path: impl Into<PathBuf>, id_prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id_prefix: id_prefix.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in file order; a missing or blank file holds none
    pub fn read_all(&self) -> Result<Vec<Episode>, StoreError> {
        let content = FileManager::read_optional(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        match content {
            Some(content) => decode_documents(&content, &self.path),
            None => {
                debug!("Content file {:?} does not exist yet", self.path);
                Ok(Vec::new())
            }
        }
    }

    /// Records keyed by broadcast date (`YYYY-MM-DD`).
    ///
    /// Records without a recoverable date cannot be matched to a pad and are
    /// left out; for duplicate dates the later record wins.
    pub fn read_by_date(&self) -> Result<HashMap<String, Episode>, StoreError> {
        let mut by_date = HashMap::new();
        for episode in self.read_all()? {
            match episode.date_key(&self.id_prefix) {
                Some(date) => {
                    by_date.insert(date, episode);
                }
                None => warn!("Ignoring entry without a parsable date: '{}'", episode.id),
            }
        }
        Ok(by_date)
    }

    /// Merge `new_episodes` into the store and rewrite it sorted by date.
    ///
    /// Returns the number of records written. Existing records without a
    /// parsable date sort first; a new record without one is an error, as is a
    /// new record whose id is already taken. Records sharing a date keep their
    /// relative order. Merging nothing leaves the file untouched.
    pub fn merge_and_persist(&self, new_episodes: Vec<Episode>) -> Result<usize, StoreError> {
        let existing = self.read_all()?;
        if new_episodes.is_empty() {
            return Ok(existing.len());
        }

        let mut known_ids: HashSet<String> = existing
            .iter()
            .filter(|episode| !episode.id.is_empty())
            .map(|episode| episode.id.clone())
            .collect();

        let mut keyed: Vec<(Option<NaiveDate>, Episode)> = Vec::with_capacity(existing.len() + new_episodes.len());
        for episode in existing {
            let key = episode.broadcast_date(&self.id_prefix);
            if key.is_none() {
                warn!("Failed to parse date of existing entry '{}', sorting it first", episode.id);
            }
            keyed.push((key, episode));
        }

        for episode in new_episodes {
            let key = episode
                .broadcast_date(&self.id_prefix)
                .ok_or_else(|| StoreError::UnparsableDate { id: episode.id.clone() })?;
            if !known_ids.insert(episode.id.clone()) {
                return Err(StoreError::DuplicateEntry { id: episode.id });
            }
            keyed.push((Some(key), episode));
        }

        keyed.sort_by_key(|(key, _)| *key);

        let episodes: Vec<Episode> = keyed.into_iter().map(|(_, episode)| episode).collect();
        self.write_all(&episodes)?;
        Ok(episodes.len())
    }

    /// Replace the store content with `episodes`, in the given order
    pub fn write_all(&self, episodes: &[Episode]) -> Result<(), StoreError> {
        let rendered = format::render_episodes(episodes)?;
        FileManager::write_atomically(&self.path, &rendered).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} entries to {:?}", episodes.len(), self.path);
        Ok(())
    }
}

/// Decode a multi-document YAML stream; empty documents are skipped
pub fn decode_documents(content: &str, path: &Path) -> Result<Vec<Episode>, StoreError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let decode_error = |source: serde_yaml::Error| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut episodes = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document).map_err(decode_error)?;
        if value.is_null() {
            continue;
        }
        episodes.push(serde_yaml::from_value(value).map_err(decode_error)?);
    }
    Ok(episodes)
}
