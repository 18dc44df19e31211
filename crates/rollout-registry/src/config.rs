#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the registry API, e.g. `http://localhost:8001/api`.
    pub endpoint: String,
    /// Per-request timeout; `0` disables it.
    pub request_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8001/api".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}
