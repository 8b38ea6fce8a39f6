// crates/place-lambda/src/handler.rs
use std::time::Instant;

use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use place_core::config::{AppConfig, ENV_BUCKET_NAME};
use place_core::error::ExtractorError;
use place_engines::GeminiExtractor;

use crate::context::AppContext;
use crate::metrics::LlmMetrics;
use crate::storage;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub video_id: String,
    pub s3_key: String,
}

/// Invocation entrypoint. Failures are logged with their cause and
/// re-raised to the runtime, which owns retry and alerting policy.
#[tracing::instrument(skip(ctx, event), fields(req_id = %event.context.request_id))]
pub async fn handle(
    ctx: &AppContext,
    event: LambdaEvent<ExtractRequest>,
) -> Result<ExtractResponse, Error> {
    match run(ctx, event.payload).await {
        Ok(response) => Ok(response),
        Err(err) => {
            error!("invocation failed: {err}");
            if let Some(source) = std::error::Error::source(&err) {
                error!("caused by: {source}");
            }
            Err(Box::new(err))
        }
    }
}

async fn run(ctx: &AppContext, request: ExtractRequest) -> Result<ExtractResponse, ExtractorError> {
    let (video_id, bucket) = validate(request, ctx.config())?;
    info!("processing video {video_id} (bucket: {bucket})");

    let api_key = ctx.api_key().await?;

    let source = storage::download_source(ctx.s3(), &bucket, ctx.account_id(), &video_id).await?;

    let extractor = GeminiExtractor::new(api_key, ctx.config().model_name.clone());
    info!("starting extraction (model: {})", extractor.model_name());
    let started = Instant::now();
    let output = extractor.extract(&source).await?;
    LlmMetrics::new(&video_id, started.elapsed(), &output).emit();

    let s3_key =
        storage::upload_output(ctx.s3(), &bucket, ctx.account_id(), &video_id, &output).await?;
    info!("processing complete (key: {s3_key})");

    Ok(ExtractResponse {
        status_code: 200,
        video_id,
        s3_key,
    })
}

/// Checks the per-invocation input together with the environment-provided
/// bucket so a single error names every missing field. Runs before any
/// network call. Empty strings count as missing.
fn validate(request: ExtractRequest, config: &AppConfig) -> Result<(String, String), ExtractorError> {
    let video_id = request.video_id.filter(|v| !v.is_empty());
    let bucket = config.bucket_name.clone();
    match (video_id, bucket) {
        (Some(video_id), Some(bucket)) => Ok((video_id, bucket)),
        (video_id, bucket) => {
            let mut missing = Vec::new();
            if video_id.is_none() {
                missing.push("video_id");
            }
            if bucket.is_none() {
                missing.push(ENV_BUCKET_NAME);
            }
            Err(ExtractorError::Configuration(missing.join(", ")))
        }
    }
}
