//! Tests for error types

use reparto::Error;

#[test]
fn test_unknown_experiment_error() {
    let error = Error::UnknownExperiment("wave2".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("unknown experiment: wave2"));
    assert!(error_str.contains("Register the experiment"));
}

#[test]
fn test_invalid_config_error() {
    let error = Error::InvalidConfig("experiment 'x' has no variants".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("invalid experiment config"));
    assert!(error_str.contains("no variants"));
}

#[test]
fn test_invalid_weight_error() {
    let error = Error::InvalidWeight {
        variant: "b".to_string(),
        weight: -0.5,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("invalid weight -0.5 for variant 'b'"));
    assert!(error_str.contains("finite and non-negative"));
}

#[test]
fn test_storage_error() {
    let error = Error::Storage("cookies disabled".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("storage error"));
    assert!(error_str.contains("cookies disabled"));
}

#[test]
fn test_serde_error_conversion() {
    let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let error: Error = serde_err.into();
    assert!(format!("{error}").contains("serialization error"));
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let error: Error = io_err.into();
    assert!(format!("{error}").contains("IO error"));
}
