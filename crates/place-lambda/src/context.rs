// crates/place-lambda/src/context.rs
use anyhow::{anyhow, Result};
use aws_config::BehaviorVersion;
use tracing::info;

use place_core::config::AppConfig;
use place_core::error::ExtractorError;

use crate::credentials::{CachedKey, SsmKeySource};

/// Everything an invocation needs, composed once at process start and
/// passed into the handler explicitly. Shared across invocations within
/// one execution environment; individual invocations share nothing else.
pub struct AppContext {
    s3: aws_sdk_s3::Client,
    account_id: String,
    config: AppConfig,
    api_key: CachedKey<SsmKeySource>,
}

impl AppContext {
    /// Loads the shared AWS config, resolves the expected bucket-owner
    /// account via STS, and reads the environment configuration. A failure
    /// here fails the cold start.
    pub async fn from_env() -> Result<Self> {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let sts = aws_sdk_sts::Client::new(&aws_config);
        let identity = sts.get_caller_identity().send().await?;
        let account_id = identity
            .account()
            .ok_or_else(|| anyhow!("caller identity did not include an account id"))?
            .to_string();
        info!("resolved bucket-owner account: {account_id}");

        Ok(Self::new(
            aws_sdk_s3::Client::new(&aws_config),
            aws_sdk_ssm::Client::new(&aws_config),
            account_id,
            AppConfig::from_env(),
        ))
    }

    pub fn new(
        s3: aws_sdk_s3::Client,
        ssm: aws_sdk_ssm::Client,
        account_id: String,
        config: AppConfig,
    ) -> Self {
        Self {
            s3,
            account_id,
            config,
            api_key: CachedKey::new(SsmKeySource::new(ssm)),
        }
    }

    pub fn s3(&self) -> &aws_sdk_s3::Client {
        &self.s3
    }

    /// Account id asserted as bucket owner on every storage call.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The model API key; fetched from the parameter store on first use
    /// and cached for the process lifetime.
    pub async fn api_key(&self) -> Result<&str, ExtractorError> {
        self.api_key.get().await
    }
}
