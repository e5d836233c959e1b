// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for the solunar crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the solunar crate.
///
/// The lunar generator itself is total; these errors come from the
/// provider layer (requests, cursors), the tide feed and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SolunarError {
    /// A paged provider was asked for a page without a non-zero limit.
    #[error("limit is required")]
    MissingLimit,

    /// The request used a limit form the provider does not page by.
    #[error("unsupported limit: {0}")]
    UnsupportedLimit(String),

    /// A cursor that does not decode to a timestamp.
    #[error("invalid cursor: {cursor:?}")]
    InvalidCursor {
        /// The cursor text as received.
        cursor: String,
    },

    /// The NOAA service answered with an error body.
    #[error("NOAA error: {0}")]
    Noaa(String),

    /// A prediction record that cannot be interpreted.
    #[error("invalid tide prediction {field} = {value:?}")]
    InvalidPrediction {
        /// Name of the offending field (`t`, `v` or `type`).
        field: &'static str,
        /// Raw field value.
        value: String,
    },

    /// Malformed JSON body.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = SolunarError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_missing_limit() {
        assert_eq!(SolunarError::MissingLimit.to_string(), "limit is required");
    }

    #[test]
    fn error_invalid_cursor() {
        let err = SolunarError::InvalidCursor {
            cursor: "abc".into(),
        };
        assert_eq!(err.to_string(), "invalid cursor: \"abc\"");
    }

    #[test]
    fn error_invalid_prediction() {
        let err = SolunarError::InvalidPrediction {
            field: "type",
            value: "X".into(),
        };
        assert_eq!(err.to_string(), "invalid tide prediction type = \"X\"");
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SolunarError = json_err.into();
        assert!(matches!(err, SolunarError::Json(_)));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<SolunarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SolunarError>();
    }
}
