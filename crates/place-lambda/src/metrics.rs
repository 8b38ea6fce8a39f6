// crates/place-lambda/src/metrics.rs
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use place_core::types::ExtractionOutput;

pub const METRICS_EVENT: &str = "LLM_METRICS";

/// The one structured metrics line per successful invocation. Total over
/// both output shapes: a degraded output logs zero tokens and zero places.
#[derive(Debug, Serialize)]
pub struct LlmMetrics<'a> {
    pub event: &'static str,
    pub video_id: &'a str,
    /// Wall-clock seconds around the extraction call only, 2 decimals.
    pub latency: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub places_count: usize,
}

impl<'a> LlmMetrics<'a> {
    pub fn new(video_id: &'a str, latency: Duration, output: &ExtractionOutput) -> Self {
        let usage = output.usage().unwrap_or_default();
        LlmMetrics {
            event: METRICS_EVENT,
            video_id,
            latency: round_to_centis(latency.as_secs_f64()),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            places_count: output.places_count(),
        }
    }

    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!("{line}"),
            Err(err) => warn!("failed to serialize metrics: {err}"),
        }
    }
}

fn round_to_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_core::types::{AnalysisResult, PlaceItem, Usage};

    #[test]
    fn metrics_carry_usage_and_place_count() {
        let output = ExtractionOutput::Complete {
            result: AnalysisResult {
                summary: "요약".to_string(),
                places: vec![PlaceItem {
                    place_name: "OO식당".to_string(),
                    search_query: "OO식당 제주".to_string(),
                }],
            },
            usage: Usage {
                input_tokens: 50,
                output_tokens: 30,
            },
        };
        let metrics = LlmMetrics::new("abc123", Duration::from_millis(1234), &output);

        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["event"], "LLM_METRICS");
        assert_eq!(value["video_id"], "abc123");
        assert_eq!(value["latency"], 1.23);
        assert_eq!(value["input_tokens"], 50);
        assert_eq!(value["output_tokens"], 30);
        assert_eq!(value["places_count"], 1);
    }

    #[test]
    fn degraded_output_logs_zeros_without_panicking() {
        let metrics = LlmMetrics::new(
            "abc123",
            Duration::from_millis(80),
            &ExtractionOutput::degraded(),
        );
        assert_eq!(metrics.input_tokens, 0);
        assert_eq!(metrics.output_tokens, 0);
        assert_eq!(metrics.places_count, 0);
        assert_eq!(metrics.latency, 0.08);
    }

    #[test]
    fn latency_rounds_to_two_decimals() {
        assert_eq!(round_to_centis(1.236), 1.24);
        assert_eq!(round_to_centis(0.004), 0.0);
        assert_eq!(round_to_centis(12.3456), 12.35);
    }
}
