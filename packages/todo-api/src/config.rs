//! API configuration.

/// Configuration for the todo API service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Timeout for reading a request body, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000, // 5 seconds default
        }
    }
}
