// crates/place-core/src/types.rs
use serde::{Deserialize, Serialize};

/// Summary text stored when the model returned no usable payload
/// (safety block, empty candidates, or schema-nonconforming text).
pub const NO_RESULT_SUMMARY: &str = "분석 결과 없음 (안전 필터 또는 내용 없음)";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Source text for one video, produced upstream and read from
/// `{video_id}/source.json`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceRecord {
    #[serde(default)]
    pub video_info: VideoInfo,
    #[serde(default)]
    pub pinned_comment: Option<String>,
    #[serde(default)]
    pub processed_transcript: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlaceItem {
    pub place_name: String,
    pub search_query: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub summary: String,
    /// Always present, possibly empty. Never null.
    pub places: Vec<PlaceItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The artifact written to `{video_id}/extracted.json`.
///
/// Two wire shapes exist and both must round-trip unchanged: a complete
/// extraction serializes as `{"result": {...}, "usage": {...}}`, while a
/// degraded one serializes as the bare `{"summary": ..., "places": []}`
/// with no `usage` key and no `result` wrapper. Consumers that need token
/// counts or the place list go through [`ExtractionOutput::usage`] and
/// [`ExtractionOutput::places_count`], which are total over both shapes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExtractionOutput {
    Complete { result: AnalysisResult, usage: Usage },
    Degraded(AnalysisResult),
}

impl ExtractionOutput {
    /// The fixed placeholder record for a response with no parsed payload.
    pub fn degraded() -> Self {
        ExtractionOutput::Degraded(AnalysisResult {
            summary: NO_RESULT_SUMMARY.to_string(),
            places: Vec::new(),
        })
    }

    pub fn result(&self) -> &AnalysisResult {
        match self {
            ExtractionOutput::Complete { result, .. } => result,
            ExtractionOutput::Degraded(result) => result,
        }
    }

    /// Token usage, absent on the degraded shape.
    pub fn usage(&self) -> Option<Usage> {
        match self {
            ExtractionOutput::Complete { usage, .. } => Some(*usage),
            ExtractionOutput::Degraded(_) => None,
        }
    }

    pub fn places_count(&self) -> usize {
        self.result().places.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            summary: "제주 흑돼지 맛집을 다녀온 후기입니다.".to_string(),
            places: vec![PlaceItem {
                place_name: "OO식당".to_string(),
                search_query: "OO식당 제주".to_string(),
            }],
        }
    }

    #[test]
    fn complete_output_serializes_with_result_wrapper() {
        let output = ExtractionOutput::Complete {
            result: sample_result(),
            usage: Usage {
                input_tokens: 50,
                output_tokens: 30,
            },
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "result": {
                    "summary": "제주 흑돼지 맛집을 다녀온 후기입니다.",
                    "places": [
                        {"place_name": "OO식당", "search_query": "OO식당 제주"}
                    ]
                },
                "usage": {"input_tokens": 50, "output_tokens": 30}
            })
        );
    }

    #[test]
    fn degraded_output_serializes_bare_with_no_usage_key() {
        let value = serde_json::to_value(ExtractionOutput::degraded()).unwrap();
        assert_eq!(
            value,
            json!({
                "summary": "분석 결과 없음 (안전 필터 또는 내용 없음)",
                "places": []
            })
        );
    }

    #[test]
    fn both_shapes_round_trip() {
        for output in [
            ExtractionOutput::Complete {
                result: sample_result(),
                usage: Usage {
                    input_tokens: 50,
                    output_tokens: 30,
                },
            },
            ExtractionOutput::degraded(),
        ] {
            let text = serde_json::to_string_pretty(&output).unwrap();
            let back: ExtractionOutput = serde_json::from_str(&text).unwrap();
            assert_eq!(back, output);
        }
    }

    #[test]
    fn accessors_are_total_over_both_shapes() {
        let complete = ExtractionOutput::Complete {
            result: sample_result(),
            usage: Usage {
                input_tokens: 50,
                output_tokens: 30,
            },
        };
        assert_eq!(complete.places_count(), 1);
        assert_eq!(complete.usage().unwrap().input_tokens, 50);

        let degraded = ExtractionOutput::degraded();
        assert_eq!(degraded.places_count(), 0);
        assert!(degraded.usage().is_none());
    }

    #[test]
    fn source_record_defaults_missing_fields() {
        let record: SourceRecord =
            serde_json::from_value(json!({"video_info": {"title": "t"}})).unwrap();
        assert_eq!(record.video_info.title, "t");
        assert_eq!(record.video_info.description, "");
        assert!(record.pinned_comment.is_none());
        assert!(record.processed_transcript.is_none());
    }

    #[test]
    fn stored_json_preserves_non_ascii() {
        let text = serde_json::to_string_pretty(&ExtractionOutput::degraded()).unwrap();
        assert!(text.contains("분석 결과 없음"));
        assert!(!text.contains("\\u"));
    }
}
