// crates/place-lambda/src/storage.rs
use aws_sdk_s3::primitives::ByteStream;

use place_core::error::ExtractorError;
use place_core::types::{ExtractionOutput, SourceRecord};

pub fn source_key(video_id: &str) -> String {
    format!("{video_id}/source.json")
}

pub fn output_key(video_id: &str) -> String {
    format!("{video_id}/extracted.json")
}

/// Reads and decodes `{video_id}/source.json`, asserting the expected
/// bucket owner to prevent cross-account reads.
pub async fn download_source(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    expected_owner: &str,
    video_id: &str,
) -> Result<SourceRecord, ExtractorError> {
    let key = source_key(video_id);
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(&key)
        .expected_bucket_owner(expected_owner)
        .send()
        .await
        .map_err(|err| ExtractorError::storage("get", key.clone(), err))?;
    let body = object
        .body
        .collect()
        .await
        .map_err(|err| ExtractorError::storage("read", key.clone(), err))?;
    serde_json::from_slice(&body.into_bytes())
        .map_err(|err| ExtractorError::storage("decode", key, err))
}

/// Writes the artifact to `{video_id}/extracted.json` as pretty-printed
/// JSON (non-ASCII preserved), same owner assertion. Returns the key.
pub async fn upload_output(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    expected_owner: &str,
    video_id: &str,
    output: &ExtractionOutput,
) -> Result<String, ExtractorError> {
    let key = output_key(video_id);
    let body = serde_json::to_string_pretty(output)
        .map_err(|err| ExtractorError::storage("encode", key.clone(), err))?;
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(body.into_bytes()))
        .content_type("application/json")
        .expected_bucket_owner(expected_owner)
        .send()
        .await
        .map_err(|err| ExtractorError::storage("put", key.clone(), err))?;
    Ok(key)
}
