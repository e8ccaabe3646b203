//! Process-wide contract configuration.
//!
//! Contracts are disabled by default; production code pays nothing unless the
//! toggle is flipped before methods are defined. The toggle is read at wrap
//! time only, so it must be set during startup, before any annotated scope
//! defines its methods. Scopes can also carry an explicit [`Config`] to stay
//! independent of the global (tests rely on this).

use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The contract toggle. `enabled` gates whether annotated definitions get
/// wrapped at all; `apply_everywhere` records that the embedder wants the
/// declaration API routed through every scope it creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub enabled: bool,
    pub apply_everywhere: bool,
}

impl Config {
    pub fn enabled(self) -> bool {
        self.enabled
    }

    /// Requests broad application of the declaration API. Has no effect while
    /// contracts are disabled; the embedder consults the flag when building
    /// scopes.
    pub fn include_everywhere(&mut self) {
        if self.enabled {
            self.apply_everywhere = true;
        }
    }
}

static GLOBAL: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Mutates the global config. Call once during startup, before any wrapped
/// calls occur.
pub fn configure(f: impl FnOnce(&mut Config)) {
    let mut config = GLOBAL
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    f(&mut config);
}

/// A snapshot of the global config.
pub fn config() -> Config {
    *GLOBAL
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = Config::default();
        assert!(!config.enabled());
        assert!(!config.apply_everywhere);
    }

    #[test]
    fn include_everywhere_requires_enabled() {
        let mut config = Config::default();
        config.include_everywhere();
        assert!(!config.apply_everywhere);

        config.enabled = true;
        config.include_everywhere();
        assert!(config.apply_everywhere);
    }
}
