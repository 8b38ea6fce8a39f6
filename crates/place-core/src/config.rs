// crates/place-core/src/config.rs
use std::env;

pub const ENV_BUCKET_NAME: &str = "S3_BUCKET_NAME";
pub const ENV_MODEL_NAME: &str = "MODEL_NAME";

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash-lite";

/// Environment-provided configuration, read once at process start.
///
/// The bucket name stays optional here: the handler validates it together
/// with the per-invocation input so a single error can name every missing
/// field. An empty value counts as missing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bucket_name: Option<String>,
    pub model_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = lookup(ENV_BUCKET_NAME).filter(|v| !v.is_empty());
        let model_name = lookup(ENV_MODEL_NAME)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        AppConfig {
            bucket_name,
            model_name,
        }
    }
}
