use crate::analysis::{AnalysisRequest, AnalysisResponse};
use crate::error::{FailedAttempt, InferenceFailure, ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

/// One hosted model that can answer an [`AnalysisRequest`]. Backends are
/// interchangeable; the invoker only cares about the uniform contract.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn model_id(&self) -> &str;
    async fn generate(&self, request: &AnalysisRequest) -> Result<String, ServiceError>;
}

/// Tries an ordered list of backends and returns the first answer. The list
/// is built as [primary, fallback], so an analysis makes at most two
/// outbound calls and retries immediately with no backoff.
pub struct Invoker {
    backends: Vec<Arc<dyn InferenceBackend>>,
}

impl Invoker {
    pub fn new(backends: Vec<Arc<dyn InferenceBackend>>) -> Self {
        Self { backends }
    }

    pub async fn invoke(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, InferenceFailure> {
        let mut attempts = Vec::new();

        for backend in &self.backends {
            log::debug!("Sending analysis request to model {}", backend.model_id());
            match backend.generate(request).await {
                Ok(text) if !text.trim().is_empty() => {
                    log::info!(
                        "Model {} answered with {} characters",
                        backend.model_id(),
                        text.len()
                    );
                    return Ok(AnalysisResponse {
                        model: backend.model_id().to_string(),
                        text,
                    });
                }
                Ok(_) => {
                    log::warn!("Model {} returned an empty answer", backend.model_id());
                    attempts.push(FailedAttempt {
                        model: backend.model_id().to_string(),
                        error: ServiceError::EmptyResponse,
                    });
                }
                Err(e) => {
                    log::warn!("Model {} failed: {}", backend.model_id(), e);
                    attempts.push(FailedAttempt {
                        model: backend.model_id().to_string(),
                        error: e,
                    });
                }
            }
        }

        log::error!("All {} inference backends failed", attempts.len());
        Err(InferenceFailure { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{GenerationConfig, ImagePayload};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedBackend {
        model: String,
        answer: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn succeeding(model: &str, answer: &str) -> Arc<Self> {
            Arc::new(Self {
                model: model.into(),
                answer: Some(answer.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(model: &str) -> Arc<Self> {
            Arc::new(Self {
                model: model.into(),
                answer: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        fn model_id(&self) -> &str {
            &self.model
        }

        async fn generate(&self, _request: &AnalysisRequest) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Some(text) => Ok(text.clone()),
                None => Err(ServiceError::Status {
                    status: 429,
                    message: "quota exceeded".into(),
                }),
            }
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            instruction: "where is this?".into(),
            payload: ImagePayload {
                bytes: vec![0xFF, 0xD8, 0xFF],
                mime_type: "image/jpeg".into(),
            },
            generation: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 2000,
            },
        }
    }

    #[tokio::test]
    async fn primary_success_makes_one_call() {
        let primary = ScriptedBackend::succeeding("primary-model", "Lisbon, Portugal");
        let fallback = ScriptedBackend::succeeding("fallback-model", "unused");
        let invoker = Invoker::new(vec![primary.clone(), fallback.clone()]);

        let response = invoker.invoke(&request()).await.unwrap();
        assert_eq!(response.model, "primary-model");
        assert_eq!(response.text, "Lisbon, Portugal");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_answers_after_primary_failure() {
        let primary = ScriptedBackend::failing("primary-model");
        let fallback = ScriptedBackend::succeeding("fallback-model", "Lisbon, Portugal");
        let invoker = Invoker::new(vec![primary.clone(), fallback.clone()]);

        let response = invoker.invoke(&request()).await.unwrap();
        assert_eq!(response.model, "fallback-model");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn empty_answer_counts_as_failure() {
        let primary = ScriptedBackend::succeeding("primary-model", "   ");
        let fallback = ScriptedBackend::succeeding("fallback-model", "answer");
        let invoker = Invoker::new(vec![primary.clone(), fallback.clone()]);

        let response = invoker.invoke(&request()).await.unwrap();
        assert_eq!(response.model, "fallback-model");
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn both_failures_surface_both_reasons() {
        let primary = ScriptedBackend::failing("primary-model");
        let fallback = ScriptedBackend::failing("fallback-model");
        let invoker = Invoker::new(vec![primary.clone(), fallback.clone()]);

        let failure = invoker.invoke(&request()).await.unwrap_err();
        assert_eq!(failure.attempts.len(), 2);
        assert_eq!(failure.attempts[0].model, "primary-model");
        assert_eq!(failure.attempts[1].model, "fallback-model");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }
}
