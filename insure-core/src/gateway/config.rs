use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the backend lives and how long to wait for it.
///
/// | key | default |
/// |-----|---------|
/// | `base_url` | `http://localhost:8081` |
/// | `timeout_secs` | `30` (omit or `0` to wait indefinitely) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_secs: Some(30),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(
        &self,
        path: &str,
    ) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
