//! Configuration
//!
//! Settings for the HTTP fetcher, the request cache and default pagination,
//! loaded from YAML:
//!
//! ```yaml
//! origin: https://emr.example.org/openmrs/
//! page_size: 50
//! http:
//!   timeout_secs: 10
//!   headers:
//!     Accept: application/json
//! cache:
//!   ttl_secs: 60
//! ```

use crate::cache::CacheConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagewiseConfig {
    /// Origin that relative targets are resolved against
    #[serde(default)]
    pub origin: Option<String>,

    /// Default page size for server pagination
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Request cache settings
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_page_size() -> u32 {
    50
}

impl Default for PagewiseConfig {
    fn default() -> Self {
        Self {
            origin: None,
            page_size: default_page_size(),
            http: HttpSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Request cache settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    /// Seconds a cached page stays fresh; absent means forever
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

// ============================================================================
// Loading
// ============================================================================

impl PagewiseConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than 0",
            ));
        }
        if let Some(origin) = &self.origin {
            Url::parse(origin).map_err(|e| Error::invalid_value("origin", e.to_string()))?;
        }
        Ok(())
    }

    /// Parsed origin, if configured
    pub fn origin_url(&self) -> Result<Option<Url>> {
        self.origin
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(Error::from)
    }

    /// HTTP client configuration derived from these settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// Cache configuration derived from these settings
    pub fn cache_config(&self) -> CacheConfig {
        match self.cache.ttl_secs {
            Some(secs) => CacheConfig::with_ttl(Duration::from_secs(secs)),
            None => CacheConfig::new(),
        }
    }
}
