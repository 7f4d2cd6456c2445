use std::time::Duration;

use citysuggest::{CitySuggestError, Result, ValidationError};

#[test]
fn test_error_display() {
    let err = CitySuggestError::ModelNotFound("gpt-5".to_string());
    assert!(err.to_string().contains("gpt-5"));
}

#[test]
fn test_validation_error_is_transparent() {
    let err: CitySuggestError = ValidationError::Missing.into();
    assert_eq!(err.to_string(), "query is required");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(CitySuggestError::NoProvider)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Upstream error classification
// ============================================================================

#[test]
fn upstream_errors() {
    assert!(CitySuggestError::Http("connection reset".into()).is_upstream());
    assert!(
        CitySuggestError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_upstream()
    );
    assert!(
        CitySuggestError::RateLimited {
            retry_after: Some(Duration::from_secs(1))
        }
        .is_upstream()
    );
    assert!(CitySuggestError::AuthenticationFailed.is_upstream());
    assert!(CitySuggestError::Store("unavailable".into()).is_upstream());
    assert!(CitySuggestError::EmptyResponse.is_upstream());
    assert!(CitySuggestError::MalformedSuggestions("[]".into()).is_upstream());
}

#[test]
fn local_errors() {
    assert!(!CitySuggestError::Validation(ValidationError::Missing).is_upstream());
    assert!(!CitySuggestError::NoStore.is_upstream());
    assert!(!CitySuggestError::NoProvider.is_upstream());
    assert!(!CitySuggestError::Configuration("bad".into()).is_upstream());
}
