/*!
 * Tests for error types
 */

use std::path::PathBuf;

use padcast::errors::{AppError, EntryError, ProviderError, StoreError};

/// Test the status error message of collaborators
#[test]
fn test_provider_error_withHttpStatus_shouldNameUrlAndStatus() {
    let error = ProviderError::HttpStatus {
        url: "https://pad.ccc-p.org/Radio/download".to_string(),
        status_code: 404,
    };

    assert_eq!(
        error.to_string(),
        "https://pad.ccc-p.org/Radio/download returned status code 404"
    );
}

/// Test the music gate message
#[test]
fn test_entry_error_withMissingMusic_shouldExplainLicensing() {
    assert_eq!(
        EntryError::MissingMusicSection.to_string(),
        "no mukke section in pad - skipping entry to not risk licensing issues"
    );
}

/// Test conversions into the application error
#[test]
fn test_app_error_fromInnerErrors_shouldWrapThem() {
    let from_entry: AppError = EntryError::InvalidDate("2024-02-30".to_string()).into();
    assert!(matches!(from_entry, AppError::Entry(_)));

    let from_store: AppError = StoreError::DuplicateEntry { id: "nt-2024-01-15".to_string() }.into();
    assert_eq!(from_store.to_string(), "Store error: an entry with id 'nt-2024-01-15' already exists");

    let from_provider: EntryError = ProviderError::ConnectionError("timeout".to_string()).into();
    assert!(matches!(from_provider, EntryError::Fetch(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));
}

/// Test that store errors keep their source
#[test]
fn test_store_error_withIoSource_shouldExposeSource() {
    use std::error::Error;

    let error = StoreError::Persist {
        path: PathBuf::from("content.yaml"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };

    assert!(error.source().is_some());
    assert!(error.to_string().contains("content.yaml"));
}
