use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Worker count used when the requested count is below one.
pub const DEFAULT_WORKERS: usize = 2;

/// Pool settings.
///
/// Missing fields fall back to their defaults when deserialized, so
/// `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Requested number of workers. Values below one mean [`DEFAULT_WORKERS`].
    pub workers: isize,
    /// Log a line for every job that starts and finishes.
    pub debug: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            workers: DEFAULT_WORKERS as isize,
            debug: false,
        }
    }
}

impl PoolConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The worker count the pool will actually use.
    pub fn effective_workers(&self) -> usize {
        effective_workers(self.workers)
    }
}

pub(crate) fn effective_workers(requested: isize) -> usize {
    if requested < 1 {
        DEFAULT_WORKERS
    } else {
        requested as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoolError;

    #[test]
    fn empty_object_uses_defaults() {
        let config: PoolConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PoolConfig::default());
        assert_eq!(config.effective_workers(), 2);
    }

    #[test]
    fn partial_object_keeps_other_defaults() {
        let config: PoolConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn non_positive_workers_are_coerced() {
        assert_eq!(effective_workers(0), DEFAULT_WORKERS);
        assert_eq!(effective_workers(-7), DEFAULT_WORKERS);
        assert_eq!(effective_workers(1), 1);
        assert_eq!(effective_workers(16), 16);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PoolConfig::from_json_file("/nonexistent/workerpool.json").unwrap_err();
        assert!(matches!(err, PoolError::Io(_)));
    }
}
