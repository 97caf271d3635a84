use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub prompt_path: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub api_base_url: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub request_timeout_secs: u64,
    pub max_image_bytes: usize,
    pub allowed_mime_types: HashSet<String>,
    pub dedupe_candidates: bool,
    pub web_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // GEOINTEL_API_KEY is the usual way to supply the credential
            .add_source(Environment::with_prefix("GEOINTEL"))
            .build()?;

        s.try_deserialize()
    }
}
