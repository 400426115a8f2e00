use std::env;

use ranksheet_core::gate::DEFAULT_COOLDOWN_SECS;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub max_msg_bytes: usize,
    pub cooldown_secs: u64,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_msg_bytes: 64_000,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("RANKSHEET_MAX_BYTES") {
            if let Ok(n) = v.parse() {
                cfg.max_msg_bytes = n;
            }
        }
        if let Ok(v) = env::var("RANKSHEET_COOLDOWN_SECS") {
            if let Ok(n) = v.parse() {
                cfg.cooldown_secs = n;
            }
        }
        if let Ok(v) = env::var("RANKSHEET_LOG") {
            cfg.log_level = v;
        }
        cfg
    }
}
