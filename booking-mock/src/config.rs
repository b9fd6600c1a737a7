//! Mock 服务配置

use crate::state::DEFAULT_SEATS_PER_SLOT;

/// Mock server configuration, read from the environment
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Listen address (env: BOOKING_MOCK_ADDR)
    pub addr: String,
    /// Seats per time slot (env: BOOKING_MOCK_SEATS)
    pub seats_per_slot: u32,
    /// Log level / filter (env: LOG_LEVEL, overridden by RUST_LOG)
    pub log_level: String,
    /// JSON log output (env: LOG_JSON)
    pub log_json: bool,
    /// Daily rotating log files go here when set (env: LOG_DIR)
    pub log_dir: Option<String>,
}

impl MockConfig {
    pub fn from_env() -> Self {
        Self {
            addr: std::env::var("BOOKING_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            seats_per_slot: std::env::var("BOOKING_MOCK_SEATS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEATS_PER_SLOT),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".into(),
            seats_per_slot: DEFAULT_SEATS_PER_SLOT,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}
