//! Environment access and deployment profile detection.
//!
//! # Responsibilities
//! - Abstract over the process environment so resolution stays testable
//! - Resolve the deployment profile name from an ordered list of signals
//! - Decide whether the profile is production-like
//!
//! # Design Decisions
//! - Empty values are treated the same as unset values
//! - Running under Kubernetes counts as production regardless of name

use std::collections::HashMap;

/// Profile signals, checked in order. First non-empty value wins.
pub const PROFILE_VARS: [&str; 4] = ["ENV", "GO_ENV", "ENVIRONMENT", "APP_ENV"];

/// Injected by the kubelet into every pod.
pub const KUBERNETES_MARKER: &str = "KUBERNETES_SERVICE_HOST";

const KUBERNETES_PROFILE: &str = "kubernetes";
const DEFAULT_PROFILE: &str = "development";
const PRODUCTION_PREFIX: &str = "prod";

/// Read-only source of environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset or not valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`EnvSource::var`], but empty values count as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Resolved deployment context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub name: String,
    pub is_production: bool,
}

impl EnvironmentProfile {
    /// Resolve the profile from `env`.
    pub fn resolve(env: &impl EnvSource) -> Self {
        let on_kubernetes = env.non_empty(KUBERNETES_MARKER).is_some();

        let name = PROFILE_VARS
            .iter()
            .find_map(|key| env.non_empty(key))
            .unwrap_or_else(|| {
                if on_kubernetes {
                    KUBERNETES_PROFILE.to_string()
                } else {
                    DEFAULT_PROFILE.to_string()
                }
            });

        let is_production = name.to_lowercase().starts_with(PRODUCTION_PREFIX) || on_kubernetes;

        Self { name, is_production }
    }
}
