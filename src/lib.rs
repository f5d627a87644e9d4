/*!
 * # padcast - broadcast pads to podcast feed entries
 *
 * The show notes of every broadcast are written collaboratively in a HedgeDoc
 * pad. This crate turns such a pad into an episode record of the podcast feed
 * and keeps the content file of all records ordered by broadcast date.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `section_parser`: Splits pad Markdown into named sections
 * - `entry_builder`: Builds an episode from the sections, collecting warnings
 * - `pad_index`: Discovers dated pad links on the listing page
 * - `reconciler`: Matches pads against existing records and recorded audio
 * - `store`: Ordered multi-document YAML content file:
 *   - `store::format`: Field-specific YAML scalar styles
 * - `report`: Mapping report and reviewer comments
 * - `providers`: Pad server, title lookup and audio probes:
 *   - `providers::pad`: HedgeDoc download client
 *   - `providers::title`: HTML title resolver
 *   - `providers::sound`: Local and online audio probes
 *   - `providers::mock`: In-memory collaborators for tests
 * - `app_config`: Configuration management
 * - `app_controller`: Single and bulk entry workflows
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod entry_builder;
pub mod episode;
pub mod errors;
pub mod file_utils;
pub mod pad_index;
pub mod providers;
pub mod reconciler;
pub mod report;
pub mod section_parser;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use entry_builder::{BuildOutcome, EntryBuilder, ProcessingWarning, WarningKind};
pub use episode::{Audio, Chapter, Episode};
pub use errors::{AppError, EntryError, ProviderError, StoreError};
pub use reconciler::{Mapping, PadReconciler};
pub use section_parser::SectionMap;
pub use store::EpisodeStore;
