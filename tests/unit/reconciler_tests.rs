/*!
 * Tests for matching pads against records and audio
 */

use std::collections::HashMap;
use std::sync::Arc;

use padcast::app_config::ProbeMode;
use padcast::providers::mock::MockSoundProber;
use padcast::reconciler::{extract_date_from_pad_url, PadReconciler};

use crate::common;

const SUFFIX: &str = "-chaos-im-radio.mp3";

/// Test date extraction from pad URLs
#[test]
fn test_extract_date_from_pad_url_withVariousUrls_shouldFindFirstValidToken() {
    assert_eq!(
        extract_date_from_pad_url("https://pad.ccc-p.org/Radio_2024-01-15").as_deref(),
        Some("2024-01-15")
    );
    assert_eq!(
        extract_date_from_pad_url("https://pad.ccc-p.org/Radio_2024-01-15_2024-01-22").as_deref(),
        Some("2024-01-15")
    );
    assert_eq!(extract_date_from_pad_url("https://pad.ccc-p.org/Radio_Vorlage"), None);
    assert_eq!(extract_date_from_pad_url("https://pad.ccc-p.org/Radio-2024-01-15"), None);
    assert_eq!(extract_date_from_pad_url("https://pad.ccc-p.org/Radio_2024-13-45"), None);
}

/// Test that exactly the pad without a record is reported as missing
#[tokio::test]
async fn test_reconcile_withOneMissingEntry_shouldFlagOnlyThatPad() {
    common::init_logger();
    let urls = vec![
        common::pad_url("2024-01-08"),
        common::pad_url("2024-01-15"),
        common::pad_url("2024-01-22"),
    ];
    let existing: HashMap<_, _> = ["2024-01-08", "2024-01-22"]
        .into_iter()
        .map(|date| (date.to_string(), common::sample_episode(date)))
        .collect();
    let prober = MockSoundProber::new(ProbeMode::Local).with_file("2024_01_15-chaos-im-radio.mp3");
    let reconciler = PadReconciler::new(Arc::new(prober), SUFFIX);

    let mappings = reconciler.reconcile(&urls, &existing).await;

    assert_eq!(mappings.len(), 3);
    let missing: Vec<_> = mappings.iter().filter(|mapping| !mapping.has_existing_entry).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].date, "2024-01-15");
    assert!(missing[0].existing_entry.is_none());
    assert!(missing[0].is_candidate());
    assert!(missing[0].has_audio_locally());
    assert!(!missing[0].has_audio_remotely());
    assert_eq!(
        mappings[0].existing_entry.as_ref().map(|episode| episode.id.as_str()),
        Some("nt-2024-01-08")
    );
}

/// Test the expected audio file name and remote probing
#[tokio::test]
async fn test_reconcile_withRemoteProber_shouldReportRemoteAudio() {
    let urls = vec![common::pad_url("2024-01-15"), common::pad_url("2024-01-22")];
    let prober = MockSoundProber::new(ProbeMode::Remote).with_file("2024_01_22-chaos-im-radio.mp3");
    let reconciler = PadReconciler::new(Arc::new(prober), SUFFIX);

    let mappings = reconciler.reconcile(&urls, &HashMap::new()).await;

    assert_eq!(mappings[0].expected_audio_file_name, "2024_01_15-chaos-im-radio.mp3");
    assert!(!mappings[0].has_audio);
    assert!(!mappings[0].is_candidate());
    assert!(mappings[1].has_audio_remotely());
    assert!(!mappings[1].has_audio_locally());
}

/// Test that URLs without a date are skipped
#[tokio::test]
async fn test_reconcile_withUndatedUrl_shouldSkipIt() {
    let urls = vec![
        "https://pad.ccc-p.org/Radio_Vorlage".to_string(),
        common::pad_url("2024-01-15"),
    ];
    let reconciler = PadReconciler::new(Arc::new(MockSoundProber::new(ProbeMode::Local)), SUFFIX);

    let mappings = reconciler.reconcile(&urls, &HashMap::new()).await;

    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].pad_url, common::pad_url("2024-01-15"));
}
