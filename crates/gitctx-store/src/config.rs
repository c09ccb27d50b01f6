//! Store configuration, overridable from the environment.

use crate::paths::CONTEXT_DIR;
use std::time::Duration;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Name of the marker directory (default `.gitcontext`).
    pub context_dir: String,
    /// Bounded wait for the repository lock.
    pub lock_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            context_dir: CONTEXT_DIR.to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `GITCTX_DIR` and `GITCTX_LOCK_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("GITCTX_DIR") {
            if !dir.is_empty() {
                config.context_dir = dir;
            }
        }
        if let Ok(ms) = std::env::var("GITCTX_LOCK_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.lock_timeout = Duration::from_millis(ms);
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.context_dir, ".gitcontext");
        assert_eq!(config.lock_timeout, Duration::from_secs(5));
    }
}
