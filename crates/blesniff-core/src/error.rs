//! Error types for blesniff-core.
//!
//! Every failure is terminal to the process: this is a short-lived
//! observational tool, so no retries are performed anywhere. Each variant
//! identifies which phase failed and preserves the underlying driver error.

use thiserror::Error;

/// Errors that can occur while scanning for advertisements.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No Bluetooth adapter is available on this system.
    #[error("no Bluetooth adapter available")]
    NoAdapter,

    /// Acquiring or enabling the Bluetooth adapter failed.
    #[error("failed to enable bluetooth: {0}")]
    Adapter(#[source] btleplug::Error),

    /// Starting the scan failed.
    #[error("scanning failed: {0}")]
    Scan(#[source] btleplug::Error),

    /// The driver's scan terminated on its own while a scan was expected
    /// to be running.
    #[error("scanning terminated unexpectedly")]
    ScanTerminated,

    /// The driver failed to honor a stop request during cancellation.
    #[error("failed to stop scanning: {0}")]
    Stop(#[source] btleplug::Error),

    /// Writing a report to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using blesniff-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoAdapter;
        assert_eq!(err.to_string(), "no Bluetooth adapter available");

        let err = Error::Adapter(btleplug::Error::PermissionDenied);
        assert!(err.to_string().contains("failed to enable bluetooth"));

        let err = Error::Scan(btleplug::Error::DeviceNotFound);
        assert!(err.to_string().contains("scanning failed"));

        let err = Error::Stop(btleplug::Error::RuntimeError("radio gone".to_string()));
        assert!(err.to_string().contains("failed to stop scanning"));
        assert!(err.to_string().contains("radio gone"));
    }

    #[test]
    fn test_error_source_preserved() {
        use std::error::Error as _;

        let err = Error::Scan(btleplug::Error::DeviceNotFound);
        assert!(err.source().is_some());

        let err = Error::ScanTerminated;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
