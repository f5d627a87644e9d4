use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Pad server settings
    #[serde(default)]
    pub pads: PadConfig,

    /// Settings for generated episode records
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Audio availability probing
    #[serde(default)]
    pub audio: AudioConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Batch and validation switches
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Output artifacts
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Pad server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PadConfig {
    /// Base URL of the HedgeDoc instance hosting the pads
    #[serde(default = "default_pad_base_url")]
    pub base_url: String,

    /// Name of the pad listing all broadcast pads
    #[serde(default = "default_listing_page")]
    pub listing_page: String,
}

impl PadConfig {
    /// Base URL with exactly one trailing slash
    pub fn base_prefix(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Full URL of the listing pad
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_prefix(), self.listing_page)
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            base_url: default_pad_base_url(),
            listing_page: default_listing_page(),
        }
    }
}

/// Fixed values stamped into every generated episode
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EpisodeConfig {
    /// Prefix of episode ids, followed by the broadcast date
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Title prefix, followed by the date as DD.MM.YYYY
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// Subtitle shared by all episodes
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Summary used when a pad has none, followed by the date
    #[serde(default = "default_summary_prefix")]
    pub default_summary_prefix: String,

    /// Placeholder substituted with the deployment's media base URL at publish time
    #[serde(default = "default_media_base_placeholder")]
    pub media_base_placeholder: String,

    /// Audio file name suffix after YYYY_MM_DD
    #[serde(default = "default_audio_file_suffix")]
    pub audio_file_suffix: String,

    /// MIME type of the audio file
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Time of day of the publication timestamp (HH:MM:SS)
    #[serde(default = "default_publication_time")]
    pub publication_time: String,

    /// UTC offset of the publication timestamp (+HH:MM)
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

impl EpisodeConfig {
    /// Parsed time of day
    pub fn publication_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.publication_time, "%H:%M:%S")
            .map_err(|e| anyhow!("Invalid publication time '{}': {}", self.publication_time, e))
    }

    /// Parsed UTC offset
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            title_prefix: default_title_prefix(),
            subtitle: default_subtitle(),
            default_summary_prefix: default_summary_prefix(),
            media_base_placeholder: default_media_base_placeholder(),
            audio_file_suffix: default_audio_file_suffix(),
            mime_type: default_mime_type(),
            publication_time: default_publication_time(),
            utc_offset: default_utc_offset(),
        }
    }
}

/// Where audio availability is checked
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Look for the file in a local directory
    #[default]
    Local,
    /// Issue a HEAD request against the published media location
    Remote,
}

impl ProbeMode {
    // @returns: Human readable mode name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Remote => "online",
        }
    }
}

impl std::fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ProbeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "online" => Ok(Self::Remote),
            _ => Err(anyhow!("Invalid probe mode: {}", s)),
        }
    }
}

/// Audio probing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// Active probe mode
    #[serde(default)]
    pub probe: ProbeMode,

    /// Directory holding the recorded shows (local mode)
    #[serde(default)]
    pub sound_dir: Option<String>,

    /// Public media location (remote mode)
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            probe: ProbeMode::default(),
            sound_dir: None,
            media_base_url: default_media_base_url(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Operator switches for entry creation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Escalate every warning into a failure for that episode
    #[serde(default)]
    pub strict: bool,

    /// Keep going in bulk mode when a single pad fails
    #[serde(default = "default_true")]
    pub continue_on_error: bool,

    /// Upper bound of new episodes per bulk run (0 means unlimited)
    #[serde(default)]
    pub max_new_entries: usize,

    /// Only print the mapping report in bulk mode
    #[serde(default)]
    pub map_only: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            strict: false,
            continue_on_error: true,
            max_new_entries: 0,
            map_only: false,
        }
    }
}

/// Output artifact locations
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Episode store; when unset, new records are printed to stdout
    #[serde(default = "default_content_file")]
    pub content_file: Option<String>,

    /// Comments artifact for the change request
    #[serde(default = "default_comments_file")]
    pub comments_file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_file: default_content_file(),
            comments_file: default_comments_file(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Parse a `+HH:MM` / `-HH:MM` offset
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let invalid = || anyhow!("Invalid UTC offset '{}', expected +HH:MM", value);

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn default_pad_base_url() -> String {
    "https://pad.ccc-p.org".to_string()
}

fn default_listing_page() -> String {
    "Radio".to_string()
}

fn default_id_prefix() -> String {
    "nt-".to_string()
}

fn default_title_prefix() -> String {
    "CiR am".to_string()
}

fn default_subtitle() -> String {
    "Der Chaostreff im Freien Radio Potsdam".to_string()
}

fn default_summary_prefix() -> String {
    "Chaos im Radio am".to_string()
}

fn default_media_base_placeholder() -> String {
    "$media_base_url".to_string()
}

fn default_audio_file_suffix() -> String {
    "-chaos-im-radio.mp3".to_string()
}

fn default_mime_type() -> String {
    "audio/mp3".to_string()
}

fn default_publication_time() -> String {
    "00:00:00".to_string()
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_media_base_url() -> String {
    "https://radio.ccc-p.org/files".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("padcast/{}", env!("CARGO_PKG_VERSION"))
}

fn default_content_file() -> Option<String> {
    Some("../content.yaml".to_string())
}

fn default_comments_file() -> Option<String> {
    Some("../comments.md".to_string())
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.pads.base_url)
            .map_err(|e| anyhow!("Invalid pad base URL '{}': {}", self.pads.base_url, e))?;

        if self.pads.listing_page.trim().is_empty() {
            return Err(anyhow!("Pad listing page must not be empty"));
        }

        if self.episode.id_prefix.is_empty() {
            return Err(anyhow!("Episode id prefix must not be empty"));
        }

        self.episode.publication_time()?;
        self.episode.utc_offset()?;

        match self.audio.probe {
            ProbeMode::Local => {}
            ProbeMode::Remote => {
                url::Url::parse(&self.audio.media_base_url).map_err(|e| {
                    anyhow!("Invalid media base URL '{}': {}", self.audio.media_base_url, e)
                })?;
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("HTTP timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            pads: PadConfig::default(),
            episode: EpisodeConfig::default(),
            audio: AudioConfig::default(),
            http: HttpConfig::default(),
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
