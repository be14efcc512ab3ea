//! Lock configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use taro_common::paths;

use crate::error::{LockError, Result};

/// Namespace root used when none is configured
pub const DEFAULT_NAMESPACE_ROOT: &str = "/lock";

/// Default bound on a blocking acquire, in milliseconds (24 hours)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 86_400_000;

/// Configuration for a [`DistributedMutex`](crate::DistributedMutex)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Directory node the contention queue lives under
    #[serde(default = "default_namespace_root")]
    pub namespace_root: String,

    /// Lock name; candidates are `{lock_name}-{sequence}` siblings under the
    /// root. Several lock names may share one root without interfering.
    pub lock_name: String,

    /// Materialize the namespace chain before contending
    #[serde(default = "default_create_namespace")]
    pub create_namespace: bool,

    /// Upper bound on a blocking acquire, in milliseconds
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Fail with `Contended` instead of queueing behind other contenders
    #[serde(default)]
    pub non_blocking: bool,
}

fn default_namespace_root() -> String {
    DEFAULT_NAMESPACE_ROOT.to_string()
}

fn default_create_namespace() -> bool {
    true
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

impl LockConfig {
    pub fn new(lock_name: impl Into<String>) -> Self {
        Self {
            namespace_root: default_namespace_root(),
            lock_name: lock_name.into(),
            create_namespace: default_create_namespace(),
            wait_timeout_ms: default_wait_timeout_ms(),
            non_blocking: false,
        }
    }

    pub fn with_namespace_root(mut self, root: impl Into<String>) -> Self {
        self.namespace_root = root.into();
        self
    }

    pub fn with_create_namespace(mut self, create_namespace: bool) -> Self {
        self.create_namespace = create_namespace;
        self
    }

    pub fn with_wait_timeout_ms(mut self, wait_timeout_ms: u64) -> Self {
        self.wait_timeout_ms = wait_timeout_ms;
        self
    }

    pub fn non_blocking(mut self, non_blocking: bool) -> Self {
        self.non_blocking = non_blocking;
        self
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Path prefix a candidate is created at; the store appends the sequence
    pub fn candidate_prefix(&self) -> String {
        format!(
            "{}{}",
            paths::join(&self.namespace_root, &self.lock_name),
            taro_common::SEQUENCE_SEPARATOR
        )
    }

    /// Check the configuration; runs before any store interaction
    pub fn validate(&self) -> Result<()> {
        if paths::validate_path(&self.namespace_root).is_err() {
            return Err(LockError::Configuration(format!(
                "namespace_root must be an absolute path: '{}'",
                self.namespace_root
            )));
        }
        if self.lock_name.is_empty() {
            return Err(LockError::Configuration(
                "lock_name must not be empty".to_string(),
            ));
        }
        if self.lock_name.contains('/') {
            return Err(LockError::Configuration(format!(
                "lock_name must not contain '/': '{}'",
                self.lock_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LockConfig::new("work");
        assert_eq!(config.namespace_root, "/lock");
        assert_eq!(config.lock_name, "work");
        assert!(config.create_namespace);
        assert_eq!(config.wait_timeout_ms, 86_400_000);
        assert!(!config.non_blocking);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = LockConfig::new("work")
            .with_namespace_root("/apps/locks")
            .with_create_namespace(false)
            .with_wait_timeout_ms(100)
            .non_blocking(true);
        assert_eq!(config.namespace_root, "/apps/locks");
        assert!(!config.create_namespace);
        assert_eq!(config.wait_timeout(), Duration::from_millis(100));
        assert!(config.non_blocking);
        assert_eq!(config.candidate_prefix(), "/apps/locks/work-");
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let config = LockConfig::new("work").with_namespace_root("lock");
        assert!(matches!(
            config.validate(),
            Err(LockError::Configuration(_))
        ));

        let config = LockConfig::new("a/b");
        assert!(matches!(
            config.validate(),
            Err(LockError::Configuration(_))
        ));

        let config = LockConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(LockError::Configuration(_))
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let config: LockConfig = serde_json::from_str(r#"{"lock_name":"work"}"#).unwrap();
        assert_eq!(config.namespace_root, "/lock");
        assert!(config.create_namespace);
        assert_eq!(config.wait_timeout_ms, 86_400_000);
        assert!(!config.non_blocking);
    }
}
