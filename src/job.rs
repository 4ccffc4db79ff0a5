use std::fmt;
use std::sync::Arc;

use crate::error::JobError;

/// Outcome of executing one job.
pub type JobResult = std::result::Result<(), JobError>;

/// A work function shared by any number of jobs.
pub type WorkFn<T> = Arc<dyn Fn(&T) -> JobResult + Send + Sync>;

/// Wraps a closure as a shareable [`WorkFn`].
pub fn work_fn<T, F>(f: F) -> WorkFn<T>
where
    F: Fn(&T) -> JobResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A single unit of work: a payload, the function to run on it, and the
/// slot its outcome is written to once the pool has run it.
pub struct Job<T> {
    id: Option<u64>,
    data: T,
    work: WorkFn<T>,
    result: Option<JobResult>,
}

impl<T> Job<T> {
    /// Creates a job without an identifier.
    pub fn new(data: T, work: WorkFn<T>) -> Self {
        Job {
            id: None,
            data,
            work,
            result: None,
        }
    }

    /// Attaches an identifier used in log lines. Identifiers need not be unique.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// The caller-supplied identifier, if any.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// The input payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The outcome of the job, or `None` if it has not been run yet.
    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    /// Takes the outcome out of the job, leaving `None` behind.
    pub fn take_result(&mut self) -> Option<JobResult> {
        self.result.take()
    }

    /// Returns `true` if the job has run and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.result, Some(Err(_)))
    }

    pub(crate) fn execute(&self) -> JobResult {
        (self.work)(&self.data)
    }

    pub(crate) fn set_result(&mut self, result: JobResult) {
        self.result = Some(result);
    }

    pub(crate) fn label(&self) -> JobLabel {
        JobLabel(self.id)
    }
}

impl<T: fmt::Debug> fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Display helper for job identifiers in log lines.
pub(crate) struct JobLabel(Option<u64>);

impl fmt::Display for JobLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("-"),
        }
    }
}
