/*!
 * Episode records as persisted in the content store.
 *
 * Field names on disk follow the existing `content.yaml` layout consumed by
 * the feed generator (`uuid`, `publicationDate`, `long_summary_md`, ...).
 * Keys this crate does not know about are carried along untouched so that a
 * rewrite of the store never drops data.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format of broadcast dates in ids, pad URLs and timestamps
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One audio resource of an episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    /// Templated URL, contains the media base placeholder
    #[serde(default)]
    pub url: String,

    /// MIME type of the file
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

/// Chapter mark inside an episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Start timestamp (HH:MM:SS)
    #[serde(default)]
    pub start: String,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Optional hyperlink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Chapter {
    pub fn new(start: impl Into<String>, title: impl Into<String>, href: Option<String>) -> Self {
        Self {
            start: start.into(),
            title: title.into(),
            href,
        }
    }
}

/// One broadcast record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Stable identifier, `<prefix>YYYY-MM-DD`
    #[serde(rename = "uuid", default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    /// Short plain text description
    #[serde(default)]
    pub summary: String,

    /// RFC 3339 timestamp of the broadcast
    #[serde(rename = "publicationDate", default)]
    pub publication_timestamp: String,

    #[serde(default)]
    pub audio: Vec<Audio>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<Chapter>>,

    /// Shownotes and music listing in Markdown
    #[serde(rename = "long_summary_md", default, skip_serializing_if = "String::is_empty")]
    pub long_summary_markdown: String,

    /// Keys not modelled above, preserved across rewrites
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,

    /// Pad the record was built from; never persisted
    #[serde(skip)]
    pub source_url: Option<String>,
}

impl Episode {
    /// Broadcast date derived from the id, falling back to the publication timestamp
    pub fn broadcast_date(&self, id_prefix: &str) -> Option<NaiveDate> {
        self.id
            .strip_prefix(id_prefix)
            .and_then(parse_broadcast_date)
            .or_else(|| {
                self.publication_timestamp
                    .get(..10)
                    .and_then(parse_broadcast_date)
            })
    }

    /// Broadcast date as `YYYY-MM-DD`, the key used to match pads against records
    pub fn date_key(&self, id_prefix: &str) -> Option<String> {
        self.broadcast_date(id_prefix)
            .map(|date| date.format(DATE_FORMAT).to_string())
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_broadcast_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Expected audio file name of a broadcast, `YYYY_MM_DD<suffix>`
pub fn audio_file_name(date: NaiveDate, suffix: &str) -> String {
    format!("{}{}", date.format("%Y_%m_%d"), suffix)
}
