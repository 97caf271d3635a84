use crate::analysis::ImagePayload;
use crate::builder;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::extract;
use crate::inference::{InferenceBackend, Invoker};
use crate::inference_clients::gemini::GeminiBackend;
use crate::maps;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize, Debug)]
pub struct CandidateView {
    pub latitude: f64,
    pub longitude: f64,
    pub matched_text: String,
    pub maps_url: String,
    pub street_view_url: String,
    pub earth_url: String,
    pub osm_url: String,
}

/// What the presentation layer receives for one analysis.
#[derive(Serialize, Debug)]
pub struct AnalysisReport {
    pub model: String,
    pub analysis: String,
    pub candidates: Vec<CandidateView>,
}

/// The whole pipeline for one deployment: fixed instruction text, the
/// ordered [primary, fallback] backends, and the knobs from configuration.
/// Read-only after construction, so concurrent analyses stay independent.
pub struct Pipeline {
    config: AppConfig,
    instruction: String,
    invoker: Invoker,
}

impl Pipeline {
    /// Instruction and backends are injected explicitly; tests substitute
    /// their own without touching process globals.
    pub fn new(config: AppConfig, instruction: String, invoker: Invoker) -> Self {
        Self {
            config,
            instruction,
            invoker,
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        log::debug!("Loading instruction text from {}", config.prompt_path);
        let instruction = std::fs::read_to_string(&config.prompt_path)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let backends: Vec<Arc<dyn InferenceBackend>> = vec![
            Arc::new(GeminiBackend::new(&config, &config.primary_model, client.clone())?),
            Arc::new(GeminiBackend::new(&config, &config.fallback_model, client)?),
        ];
        log::info!(
            "Inference backends ready: primary={} fallback={}",
            config.primary_model,
            config.fallback_model
        );

        Ok(Self::new(config, instruction, Invoker::new(backends)))
    }

    /// One end-to-end analysis: validate and build the request, invoke with
    /// fallback, then scan the answer for coordinates.
    pub async fn analyze(&self, payload: ImagePayload) -> Result<AnalysisReport, AppError> {
        let request = builder::build_request(&self.config, &self.instruction, payload)?;
        let response = self.invoker.invoke(&request).await?;
        let candidates = extract::extract_candidates(&response.text, self.config.dedupe_candidates);

        Ok(AnalysisReport {
            model: response.model,
            analysis: response.text,
            candidates: candidates
                .into_iter()
                .map(|c| CandidateView {
                    maps_url: maps::maps_search_url(c.latitude, c.longitude),
                    street_view_url: maps::street_view_url(c.latitude, c.longitude),
                    earth_url: maps::earth_url(c.latitude, c.longitude),
                    osm_url: maps::osm_url(c.latitude, c.longitude),
                    latitude: c.latitude,
                    longitude: c.longitude,
                    matched_text: c.matched_text,
                })
                .collect(),
        })
    }
}
