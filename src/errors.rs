/*!
 * Error types for the padcast application.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 * Processing warnings are not errors and live in `entry_builder`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by external collaborators (pad server, title lookups, sound probes)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an HTTP request fails before a response arrives
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The remote side answered with a non-success status
    #[error("{url} returned status code {status_code}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A local resource could not be read
    #[error("I/O error: {0}")]
    Io(String),
}

/// Validation failures that abort the creation of a single episode
#[derive(Error, Debug)]
pub enum EntryError {
    /// The pad has no `mukke` section and did not opt out via `no_music`
    #[error("no mukke section in pad - skipping entry to not risk licensing issues")]
    MissingMusicSection,

    /// The pad URL does not point at the configured pad server
    #[error("pad url must start with {expected_prefix}: {url}")]
    ForeignPadUrl {
        /// Offending URL
        url: String,
        /// Configured pad server prefix
        expected_prefix: String,
    },

    /// The pad URL carries no `_YYYY-MM-DD` token
    #[error("pad url must contain a date in the format _YYYY-MM-DD: {0}")]
    MissingDate(String),

    /// The date token is not a real calendar date
    #[error("invalid broadcast date '{0}'")]
    InvalidDate(String),

    /// Strict mode escalated warnings into a failure
    #[error("aborting due to {count} warning(s) in strict mode for {pad}")]
    StrictMode {
        /// Pad URL or date the warnings belong to
        pad: String,
        /// Number of warnings collected
        count: usize,
    },

    /// The pad could not be fetched
    #[error("failed to fetch pad: {0}")]
    Fetch(#[from] ProviderError),
}

/// Errors of the ordered episode store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Store or temporary file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An existing document could not be decoded
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Store file path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// An episode could not be encoded
    #[error("failed to encode episode: {0}")]
    Encode(String),

    /// A new episode carries no parsable broadcast date
    #[error("failed to parse date of new entry '{id}'")]
    UnparsableDate {
        /// Episode id as supplied
        id: String,
    },

    /// A new episode collides with an existing one
    #[error("an entry with id '{id}' already exists")]
    DuplicateEntry {
        /// Colliding id
        id: String,
    },

    /// The temporary file could not replace the store
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// Store file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a collaborator
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error while building an entry
    #[error("Entry error: {0}")]
    Entry(#[from] EntryError),

    /// Error from the episode store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
