// src/analysis.rs

/// Raw image bytes plus the MIME type declared by the upload source.
/// Captured once per analysis and dropped when the analysis completes.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Temperature and output-length parameters for the hosted model.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Everything one outbound attempt needs: the fixed instruction text, the
/// image, and the generation configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub instruction: String,
    pub payload: ImagePayload,
    pub generation: GenerationConfig,
}

/// A successful answer. `model` names the backend that actually produced it
/// (primary or fallback); `text` is guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub model: String,
    pub text: String,
}

/// One latitude/longitude pair pulled out of free text, with the substring
/// it came from. No guarantee of geographic correctness beyond range bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub matched_text: String,
}
