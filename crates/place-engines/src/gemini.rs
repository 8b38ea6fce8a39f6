// crates/place-engines/src/gemini.rs
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use place_core::error::ExtractorError;
use place_core::types::{AnalysisResult, ExtractionOutput, SourceRecord, Usage};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Stands in for an absent transcript in the user payload.
const NO_TRANSCRIPT_PLACEHOLDER: &str = "(자막 없음)";

/// Extraction policy. The model must always summarize, may only extract
/// concretely named POIs mentioned as visited or as a destination, and
/// must never invent addresses or sub-location names.
const SYSTEM_INSTRUCTION: &str = r#"
당신은 여행 콘텐츠 분석 및 위치 정보 추출 전문 AI입니다.
입력된 데이터를 분석하여, **자연스러운 요약**과 **Google Maps 검색 최적화 데이터**를 생성하십시오.

### 1. 처리 목표
1. 요약: 콘텐츠의 핵심 내용을 1~2문장의 자연스러운 한국어로 요약하십시오. (장소 추출 여부와 관계없이 필수 작성)
2. 장소 추출: 본문에 방문 경험이나 목적지로 명확히 언급된 **구체적 장소(POI)**만 추출하십시오.

### 2. 검색 쿼리 생성 규칙
추출된 각 장소에 대해 아래 우선순위로 `search_query`를 생성하십시오.
* **1순위 [주소 기반]:** 본문에 '도로명' 또는 '지번'이 명시된 경우 -> `장소명 + 주소`
* **2순위 [지역/지점 기반]:** 주소가 없는 경우 -> `지점명`이 있으면 포함, 없으면 `행정구역(시/군/구)` 결합.
* **Note:** '동네', '근처' 등의 모호한 표현 대신 상위 행정구역명을 우선 사용하십시오.

### 3. 절대 금지 및 제약 사항
* **No Hallucination:** 본문에 명시되지 않은 지점명이나 상세 주소를 절대 임의로 생성하지 마십시오.
* **Specific POI Only:** 광범위한 지명(서울, 강원도, 제주도 등)은 추출하지 마십시오.
* **명칭 보정:** 오타나 약칭은 문맥을 파악하여 공식 명칭으로 수정하십시오.
* **구체적인 장소(POI)가 하나도 없다면 `places` 리스트는 빈 배열 `[]`로 반환되어야 합니다.**
"#;

/// Wraps one schema-constrained `generateContent` call against the Gemini
/// API. Construction is cheap; one instance per invocation is fine.
pub struct GeminiExtractor {
    client: Client,
    base_url: String,
    api_key: String,
    model_name: String,
}

impl GeminiExtractor {
    pub fn new(api_key: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model_name: model_name.into(),
        }
    }

    /// Points the engine at a different endpoint. Used by tests to target
    /// a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs the extraction and normalizes the response into the uniform
    /// output shape. A response that carries no schema-conformant payload
    /// is not an error; it degrades to the fixed placeholder record.
    pub async fn extract(&self, source: &SourceRecord) -> Result<ExtractionOutput, ExtractorError> {
        let user_content = build_user_content(source);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        );

        let request_body = json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "parts": [{ "text": user_content }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
            "safetySettings": safety_settings(),
        });

        debug!("Gemini request: {:?}", request_body);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            debug!("Gemini error response body: {}", body);
            return Err(ExtractorError::ModelApi { status, body });
        }

        let response_body: Value = response.json().await?;
        debug!("Gemini response: {:?}", response_body);

        Ok(parse_response(&response_body))
    }
}

/// Projects the four prompt fields out of the source record and renders
/// them as one human-readable JSON block, non-ASCII left unescaped.
fn build_user_content(source: &SourceRecord) -> String {
    let payload = json!({
        "title": source.video_info.title,
        "description": source.video_info.description,
        "pinned_comment": source.pinned_comment.as_deref().unwrap_or(""),
        "transcript": source
            .processed_transcript
            .as_deref()
            .unwrap_or(NO_TRANSCRIPT_PLACEHOLDER),
    });
    // Serializing a just-built Value cannot fail.
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}

fn parse_response(body: &Value) -> ExtractionOutput {
    let parsed = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .and_then(|text| serde_json::from_str::<AnalysisResult>(text).ok());

    match parsed {
        Some(result) => {
            let usage = Usage {
                input_tokens: body["usageMetadata"]["promptTokenCount"]
                    .as_u64()
                    .unwrap_or(0) as u32,
                output_tokens: body["usageMetadata"]["candidatesTokenCount"]
                    .as_u64()
                    .unwrap_or(0) as u32,
            };
            ExtractionOutput::Complete { result, usage }
        }
        None => ExtractionOutput::degraded(),
    }
}

/// Response schema mirroring `AnalysisResult`, in the OpenAPI subset the
/// Gemini API accepts for schema-constrained decoding.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "places": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "place_name": { "type": "STRING" },
                        "search_query": { "type": "STRING" }
                    },
                    "required": ["place_name", "search_query"]
                }
            }
        },
        "required": ["summary", "places"]
    })
}

/// Block only at the highest severity for each category.
fn safety_settings() -> Value {
    json!([
        { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH" },
        { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_ONLY_HIGH" },
        { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_ONLY_HIGH" },
        { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_ONLY_HIGH" }
    ])
}
