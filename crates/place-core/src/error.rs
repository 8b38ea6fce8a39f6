// crates/place-core/src/error.rs
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure taxonomy for one invocation. None of these are retried here;
/// the invoking infrastructure owns retry and alerting policy.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Required input or environment values are missing. Raised before any
    /// network call is made.
    #[error("missing required configuration: {0}")]
    Configuration(String),

    /// The parameter store could not supply the API key.
    #[error("failed to fetch API key from parameter store: {0}")]
    Credential(#[source] BoxError),

    /// Object storage read or write failed, including owner-mismatch
    /// rejections.
    #[error("object storage {op} failed for '{key}': {source}")]
    Storage {
        op: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },

    /// The model call failed at the transport level.
    #[error("model request failed: {0}")]
    Model(#[from] reqwest::Error),

    /// The model endpoint answered with a non-success status.
    #[error("model API returned status {status}: {body}")]
    ModelApi { status: u16, body: String },
}

impl ExtractorError {
    pub fn storage(op: &'static str, key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ExtractorError::Storage {
            op,
            key: key.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_missing_fields() {
        let err = ExtractorError::Configuration("video_id, S3_BUCKET_NAME".to_string());
        assert_eq!(
            err.to_string(),
            "missing required configuration: video_id, S3_BUCKET_NAME"
        );
    }

    #[test]
    fn storage_error_names_operation_and_key() {
        let err = ExtractorError::storage("get", "abc123/source.json", "access denied");
        let text = err.to_string();
        assert!(text.contains("get"));
        assert!(text.contains("abc123/source.json"));
    }
}
