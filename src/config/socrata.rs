//! Socrata-specific configuration constants and types.

/// Where the dataset lives
pub struct DatasetLocation {
    /// Socrata domain hosting the dataset
    pub domain: &'static str,
    /// Dataset identifier for the NY Win 4 draw history
    pub dataset_id: &'static str,
    /// Environment variable holding the optional app token.
    /// No token means the anonymous (throttled) rate-limit tier, not an error.
    pub token_env_var: &'static str,
}

/// Configuration for REST API limits and retry behaviour
pub struct RestLimits {
    /// Records requested per page; a short page terminates pagination
    pub page_size: usize,
    /// Attempts per page before the whole fetch fails
    pub max_retries: u32,
    /// Base backoff; doubles on every retry
    pub retry_backoff_ms: u64,
    /// Per-request HTTP timeout
    pub timeout_ms: u64,
    /// Row-count estimate used for progress reporting when metadata is unavailable
    pub fallback_row_estimate: usize,
}

/// The Master Socrata Configuration Struct
pub struct SocrataConfig {
    pub dataset: DatasetLocation,
    pub limits: RestLimits,
}

pub const SOCRATA: SocrataConfig = SocrataConfig {
    dataset: DatasetLocation {
        domain: "data.ny.gov",
        dataset_id: "hsys-3def",
        token_env_var: "SOCRATA_APP_TOKEN",
    },
    limits: RestLimits {
        page_size: 1000,
        max_retries: 3,
        retry_backoff_ms: 1000,
        // 30 seconds
        timeout_ms: 30_000,
        fallback_row_estimate: 50_000,
    },
};
