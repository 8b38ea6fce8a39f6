// crates/place-lambda/src/credentials.rs
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use place_core::error::ExtractorError;

/// Parameter store path holding the decrypted model API key.
pub const API_KEY_PARAMETER: &str = "/place-extractor-lambda/gemini-api-key";

#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<String, ExtractorError>;
}

pub struct SsmKeySource {
    ssm: aws_sdk_ssm::Client,
    parameter_name: String,
}

impl SsmKeySource {
    pub fn new(ssm: aws_sdk_ssm::Client) -> Self {
        Self {
            ssm,
            parameter_name: API_KEY_PARAMETER.to_string(),
        }
    }
}

#[async_trait]
impl KeySource for SsmKeySource {
    async fn fetch(&self) -> Result<String, ExtractorError> {
        info!("fetching API key from parameter store");
        let output = self
            .ssm
            .get_parameter()
            .name(&self.parameter_name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| ExtractorError::Credential(Box::new(err)))?;
        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_owned)
            .ok_or_else(|| ExtractorError::Credential("parameter store returned no value".into()))
    }
}

/// One secret, fetched on first use and held for the lifetime of the
/// execution environment. A failed fetch leaves the cell empty so the
/// next invocation retries.
pub struct CachedKey<S> {
    source: S,
    cell: OnceCell<String>,
}

impl<S: KeySource> CachedKey<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&str, ExtractorError> {
        self.cell
            .get_or_try_init(|| self.source.fetch())
            .await
            .map(String::as_str)
    }
}
