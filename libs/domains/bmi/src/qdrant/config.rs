use core_config::{env_optional, env_or_default, env_parse, env_required, ConfigError, FromEnv};

/// Default collection holding BMI embeddings
pub const DEFAULT_COLLECTION: &str = "bmi_records";

/// Qdrant connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: DEFAULT_COLLECTION.to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// `None` when `QDRANT_URL` is unset, which disables vector features.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        match env_optional("QDRANT_URL") {
            Some(_) => Self::from_env().map(Some),
            None => Ok(None),
        }
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("QDRANT_URL")?,
            api_key: env_optional("QDRANT_API_KEY"),
            collection: env_or_default("QDRANT_COLLECTION", DEFAULT_COLLECTION),
            timeout_secs: env_parse("QDRANT_TIMEOUT_SECS", "30")?,
        })
    }
}
