use serde::{Deserialize, Serialize};

/// Top-level system configuration, deserialized from `system.toml` (spec §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    pub server: ServerConfig,
    pub acquisition: AcquisitionConfig,
    pub retry: RetryConfig,
    pub embeddings: EmbeddingConfig,
}

/// HTTP server and artifact-storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root directory for per-job artifact exports.
    pub download_base_dir: String,
    /// Origins allowed to call the API from a browser.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// Acquisition pipeline defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Minimum seconds between outbound calls per source, absent a per-adapter override.
    pub default_rate_limit_s: f64,
    /// Default fuzzy-title duplicate threshold tau (spec §4.2).
    pub similarity_threshold: f64,
    /// Seconds after which a terminal job becomes eligible for eviction.
    pub job_ttl_s: u64,
    /// Per-outbound-call timeout in seconds.
    pub source_timeout_s: u64,
}

/// Retry parameters shared by all outbound source calls (spec §7).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Names/paths of the two pretrained embedding models (spec §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model standing in for the "BERT" mean-pooled transformer (spec §4.3.5).
    pub transformer_model: String,
    /// Model standing in for the sentence-transformer siamese encoder (spec §4.3.6).
    pub sentence_model: String,
    /// Pooling strategy for the transformer model: "mean" or "cls".
    #[serde(default = "default_pooling")]
    pub transformer_pooling: String,
}

fn default_pooling() -> String {
    "mean".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                download_base_dir: "./data/jobs".to_string(),
                cors_allowed_origins: Vec::new(),
            },
            acquisition: AcquisitionConfig {
                default_rate_limit_s: 1.0,
                similarity_threshold: 0.95,
                job_ttl_s: 86_400,
                source_timeout_s: 30,
            },
            retry: RetryConfig::default(),
            embeddings: EmbeddingConfig {
                transformer_model: "all-MiniLM-L6-v2".to_string(),
                sentence_model: "bge-small-en-v1.5".to_string(),
                transformer_pooling: "mean".to_string(),
            },
        }
    }
}
