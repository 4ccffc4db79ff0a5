use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Error type for pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// IO error, e.g. a worker thread could not be spawned or a config
    /// file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be deserialized.
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The pool has already been started; it runs exactly once.
    #[error("Pool has already been started")]
    AlreadyStarted,

    /// The result channel closed before every job reported back.
    #[error("Received {received} of {expected} job results")]
    ResultsIncomplete {
        /// Number of jobs that were enqueued.
        expected: usize,
        /// Number of results collected before the channel closed.
        received: usize,
    },
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

/// Error produced by a single job.
///
/// Job errors never abort a run; they are stored in the job's result slot
/// and counted by the pool.
#[derive(Error, Debug)]
pub enum JobError {
    /// The work function returned an error.
    #[error("{0}")]
    Failed(Box<dyn StdError + Send + Sync>),

    /// The work function panicked.
    #[error("Work function panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Wraps any error (or anything convertible into a boxed error, such as
    /// a `String` or `&str`) as a job failure.
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        JobError::Failed(err.into())
    }

    /// Creates a job failure from a plain message.
    pub fn msg(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        JobError::Failed(msg.into())
    }

    /// Returns `true` if the failure came from a panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, JobError::Panicked(_))
    }
}
