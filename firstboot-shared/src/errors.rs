//! Error type shared by every firstboot crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the configuration acquisition pipeline.
///
/// Absence of configuration is never represented here; readers report it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum FirstbootError {
    /// The block device enumeration mechanism itself failed.
    #[error("device enumeration failed: {0}")]
    Enumeration(String),

    /// Reading configuration from a candidate device failed.
    #[error("device error: {0}")]
    Device(String),

    /// A locally staged fragment exists but could not be read.
    #[error("failed to read config fragment {}: {source}", path.display())]
    Fragment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid options or options file.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type FirstbootResult<T> = Result<T, FirstbootError>;

impl FirstbootError {
    /// Create a fragment read error for `path`.
    pub fn fragment(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Fragment {
            path: path.into(),
            source,
        }
    }
}

impl From<String> for FirstbootError {
    fn from(msg: String) -> Self {
        FirstbootError::Internal(msg)
    }
}

impl From<&str> for FirstbootError {
    fn from(msg: &str) -> Self {
        FirstbootError::Internal(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_error_names_path() {
        let err = FirstbootError::fragment(
            "/usr/lib/firstboot/user.ign",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/usr/lib/firstboot/user.ign"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_string_conversion_is_internal() {
        let err: FirstbootError = "boom".into();
        assert!(matches!(err, FirstbootError::Internal(_)));
        assert_eq!(err.to_string(), "internal error: boom");
    }
}
