use std::io;
use std::path::PathBuf;

use chart_golden::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::MissingName { index: 3, content: "kind: Deployment\n".to_string() };
    assert_eq!(
        err.to_string(),
        "Resource with missing name in document 3:\nkind: Deployment\n"
    );

    let err = Error::WriteError {
        path: PathBuf::from("/results/Service/web.yaml"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(err.to_string(), "Failed to write '/results/Service/web.yaml': denied.");
}
