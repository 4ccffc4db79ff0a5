use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam::channel;
use log::debug;

use crate::config::{effective_workers, PoolConfig};
use crate::job::{Job, JobResult};
use crate::worker::{self, Completion, Dispatch, WorkerContext};
use crate::{PoolError, Result};

/// A bounded worker pool that runs a fixed list of jobs exactly once.
///
/// Jobs are fanned out to `worker_count()` threads through a shared
/// channel, and each job's outcome is written back into that job's own
/// slot once every worker has finished.
///
/// ```
/// use workerpool::{work_fn, Job, JobError, Pool};
///
/// let check = work_fn(|n: &u32| {
///     if *n % 2 == 0 { Ok(()) } else { Err(JobError::msg("odd")) }
/// });
/// let jobs = (0..10).map(|n| Job::new(n, check.clone())).collect();
///
/// let mut pool = Pool::new(jobs, 4, false);
/// pool.start().unwrap();
///
/// assert!(pool.is_finished());
/// assert_eq!(pool.error_count(), 5);
/// assert!(pool.jobs()[3].is_failed());
/// ```
pub struct Pool<T> {
    jobs: Vec<Job<T>>,
    workers: usize,
    errors: AtomicUsize,
    started: bool,
    finished: bool,
    debug: bool,
}

impl<T> Pool<T> {
    /// Creates a pool over `jobs`.
    ///
    /// A requested worker count below one is replaced with the default of 2.
    /// Nothing runs until [`Pool::start`] is called.
    pub fn new(jobs: Vec<Job<T>>, workers: isize, debug: bool) -> Self {
        let effective = effective_workers(workers);
        if effective as isize != workers {
            debug!("Requested {workers} workers, using {effective}");
        }

        Pool {
            jobs,
            workers: effective,
            errors: AtomicUsize::new(0),
            started: false,
            finished: false,
            debug,
        }
    }

    /// Creates a pool over `jobs` with the given configuration.
    pub fn with_config(jobs: Vec<Job<T>>, config: &PoolConfig) -> Self {
        Self::new(jobs, config.workers, config.debug)
    }

    /// Appends jobs to the pending list, preserving their order.
    ///
    /// Returns [`PoolError::AlreadyStarted`] once the pool has been started.
    pub fn add_jobs<I>(&mut self, jobs: I) -> Result<()>
    where
        I: IntoIterator<Item = Job<T>>,
    {
        if self.started {
            return Err(PoolError::AlreadyStarted);
        }
        self.jobs.extend(jobs);
        Ok(())
    }

    /// The job list. After a successful run every job carries its result.
    pub fn jobs(&self) -> &[Job<T>] {
        &self.jobs
    }

    /// Consumes the pool, returning the job list.
    pub fn into_jobs(self) -> Vec<Job<T>> {
        self.jobs
    }

    /// Jobs whose result is an error.
    pub fn failed_jobs(&self) -> impl Iterator<Item = &Job<T>> {
        self.jobs.iter().filter(|job| job.is_failed())
    }

    /// Number of jobs that failed so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Acquire)
    }

    /// Returns `true` once every job has produced a result.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of worker threads a run uses.
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Whether per-job progress lines are logged.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Number of jobs in the pool.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if the pool has no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<T: Sync> Pool<T> {
    /// Runs every job to completion and blocks until all results are in.
    ///
    /// Job failures never abort the run; they are stored in the job's slot
    /// and counted in [`Pool::error_count`]. A work function that never
    /// returns blocks this call forever.
    ///
    /// The pool runs once: a second call returns [`PoolError::AlreadyStarted`].
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(PoolError::AlreadyStarted);
        }
        self.started = true;

        let total = self.jobs.len();
        let workers = self.workers;
        debug!("Starting pool: {} workers, {} jobs", workers, total);

        let jobs = &self.jobs;
        let ctx = WorkerContext {
            errors: &self.errors,
            debug: self.debug,
        };

        let results = thread::scope(|scope| -> Result<Vec<Option<JobResult>>> {
            // Both channels hold every job, so neither side ever waits on capacity.
            let (job_tx, job_rx) = channel::bounded::<Dispatch<'_, T>>(total);
            let (result_tx, result_rx) = channel::bounded::<Completion>(total);

            for id in 0..workers {
                worker::spawn_worker(scope, id, job_rx.clone(), result_tx.clone(), ctx)?;
            }
            drop(job_rx);
            drop(result_tx);

            for dispatch in jobs.iter().enumerate() {
                // Fails only when no worker is left to receive.
                if job_tx.send(dispatch).is_err() {
                    break;
                }
            }
            drop(job_tx);

            let mut results: Vec<Option<JobResult>> =
                iter::repeat_with(|| None).take(total).collect();
            for received in 0..total {
                let (index, result) = result_rx.recv().map_err(|_| PoolError::ResultsIncomplete {
                    expected: total,
                    received,
                })?;
                results[index] = Some(result);
            }
            Ok(results)
        })?;

        for (job, result) in self.jobs.iter_mut().zip(results) {
            if let Some(result) = result {
                job.set_result(result);
            }
        }
        self.finished = true;

        debug!("Pool finished: {} jobs, {} errors", total, self.error_count());
        Ok(())
    }
}
