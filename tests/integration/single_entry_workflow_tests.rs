/*!
 * Integration tests for creating a single entry
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use padcast::app_config::{Config, ProbeMode};
use padcast::app_controller::Controller;
use padcast::errors::EntryError;
use padcast::providers::mock::{MockDocumentFetcher, MockSoundProber, MockTitleResolver};
use padcast::store::EpisodeStore;

use crate::common;

const DATE: &str = "2024-01-15";

fn controller(config: Config, fetcher: MockDocumentFetcher) -> Result<Controller> {
    Controller::with_collaborators(
        config,
        Arc::new(fetcher),
        Arc::new(MockTitleResolver::working()),
        Arc::new(MockSoundProber::new(ProbeMode::Local)),
    )
}

fn content_path(config: &Config) -> &Path {
    Path::new(config.output.content_file.as_deref().unwrap())
}

/// Test the full path from pad text to content and comments file
#[tokio::test]
async fn test_run_single_withCompletePad_shouldWriteEntryAndComments() -> Result<()> {
    common::init_logger();
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());
    let fetcher = MockDocumentFetcher::new().with_document(common::pad_url(DATE), common::complete_pad());
    let controller = controller(config.clone(), fetcher)?;

    let summary = controller.run_single(Some(common::pad_url(DATE))).await?;

    assert_eq!(summary.entry_date, DATE);
    assert!(summary.rendered.is_none());
    assert!(summary.outcome.warnings.is_empty());

    let episodes = EpisodeStore::new(content_path(&config), "nt-").read_all()?;
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].id, "nt-2024-01-15");
    assert!(episodes[0].title.contains("15.01.2024"));
    assert!(episodes[0].audio[0].url.contains("2024_01_15-chaos-im-radio.mp3"));

    let comments = fs::read_to_string(config.output.comments_file.as_deref().unwrap())?;
    assert_eq!(comments, "Hello");
    Ok(())
}

/// Test that a new entry lands between existing ones
#[tokio::test]
async fn test_run_single_withExistingEntries_shouldKeepDateOrder() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());
    let store = EpisodeStore::new(content_path(&config), "nt-");
    store.merge_and_persist(vec![
        common::sample_episode("2024-01-08"),
        common::sample_episode("2024-01-22"),
    ])?;
    let fetcher = MockDocumentFetcher::new().with_document(common::pad_url(DATE), common::complete_pad());

    controller(config.clone(), fetcher)?.run_single(Some(common::pad_url(DATE))).await?;

    let ids: Vec<String> = store.read_all()?.into_iter().map(|episode| episode.id).collect();
    assert_eq!(ids, vec!["nt-2024-01-08", "nt-2024-01-15", "nt-2024-01-22"]);
    Ok(())
}

/// Test that without a content file the entry is rendered instead
#[tokio::test]
async fn test_run_single_withoutContentFile_shouldRenderYaml() -> Result<()> {
    let mut config = Config::default();
    config.output.content_file = None;
    config.output.comments_file = None;
    let fetcher = MockDocumentFetcher::new().with_document(common::pad_url(DATE), common::complete_pad());

    let summary = controller(config, fetcher)?.run_single(Some(common::pad_url(DATE))).await?;

    let rendered = summary.rendered.expect("rendered entry");
    assert!(rendered.starts_with("uuid: nt-2024-01-15\n"));
    assert!(rendered.contains("publicationDate: \"2024-01-15T00:00:00+00:00\"\n"));
    Ok(())
}

/// Test that the first pad on the listing is used when no URL is given
#[tokio::test]
async fn test_run_single_withoutUrl_shouldUseFirstListedPad() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());
    let fetcher = MockDocumentFetcher::new()
        .with_document(
            config.pads.listing_url(),
            format!("# Radio\n\n* [Nächste]({})\n* [Vorige]({})\n", common::pad_url(DATE), common::pad_url("2024-01-08")),
        )
        .with_document(common::pad_url(DATE), common::complete_pad());

    let summary = controller(config, fetcher)?.run_single(None).await?;

    assert_eq!(summary.entry_date, DATE);
    Ok(())
}

/// Test that pads on other hosts are refused before fetching
#[tokio::test]
async fn test_run_single_withForeignUrl_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let fetcher = MockDocumentFetcher::new();
    let probe = fetcher.clone();
    let controller = controller(common::test_config(dir.path()), fetcher)?;

    let error = controller
        .run_single(Some("https://evil.example/Radio_2024-01-15".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<EntryError>(), Some(EntryError::ForeignPadUrl { .. })));
    assert_eq!(probe.request_count(), 0);
    Ok(())
}

/// Test that pads without a date token are refused
#[tokio::test]
async fn test_run_single_withUndatedUrl_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = controller(common::test_config(dir.path()), MockDocumentFetcher::new())?;

    let error = controller
        .run_single(Some("https://pad.ccc-p.org/Radio_Vorlage".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<EntryError>(), Some(EntryError::MissingDate(_))));
    Ok(())
}

/// Test that a pad without music leaves the store untouched
#[tokio::test]
async fn test_run_single_withoutMusicSection_shouldNotWriteStore() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());
    let fetcher = MockDocumentFetcher::new()
        .with_document(common::pad_url(DATE), "## Tags\nshownotes_complete\n## Summary\nHello\n");

    let error = controller(config.clone(), fetcher)?
        .run_single(Some(common::pad_url(DATE)))
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<EntryError>(), Some(EntryError::MissingMusicSection)));
    assert!(!content_path(&config).exists());
    Ok(())
}

/// Test that strict mode refuses entries with warnings
#[tokio::test]
async fn test_run_single_withStrictModeAndWarnings_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = common::test_config(dir.path());
    config.processing.strict = true;
    let fetcher = MockDocumentFetcher::new()
        .with_document(common::pad_url(DATE), "## Tags\nno_music\n## Summary\nHello\n");

    let error = controller(config.clone(), fetcher)?
        .run_single(Some(common::pad_url(DATE)))
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<EntryError>(), Some(EntryError::StrictMode { .. })));
    assert!(!content_path(&config).exists());
    Ok(())
}

/// Test that warnings end up in the comments file
#[tokio::test]
async fn test_run_single_withWarnings_shouldListThemInComments() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());
    let fetcher = MockDocumentFetcher::new()
        .with_document(common::pad_url(DATE), "## Tags\nno_music\n## Summary\nHello\n## Shownotes\nx\n");

    controller(config.clone(), fetcher)?.run_single(Some(common::pad_url(DATE))).await?;

    let comments = fs::read_to_string(config.output.comments_file.as_deref().unwrap())?;
    assert_eq!(comments, "Hello\n\n## Errors\n* tag 'shownotes_complete' not found in tags section");
    Ok(())
}

/// Test that an unreachable pad is reported
#[tokio::test]
async fn test_run_single_withMissingPad_shouldFailWithFetchError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = controller(common::test_config(dir.path()), MockDocumentFetcher::new())?;

    let error = controller.run_single(Some(common::pad_url(DATE))).await.unwrap_err();

    assert!(matches!(error.downcast_ref::<EntryError>(), Some(EntryError::Fetch(_))));
    Ok(())
}
