use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, Scope};

use crossbeam::channel::{Receiver, Sender};
use log::{debug, error, info};

use crate::error::JobError;
use crate::job::{Job, JobResult};

/// A job handed to a worker, tagged with its position in the job list.
pub(crate) type Dispatch<'a, T> = (usize, &'a Job<T>);

/// A finished job's outcome, tagged with the position it came from.
pub(crate) type Completion = (usize, JobResult);

/// State shared by every worker of one run.
#[derive(Clone, Copy)]
pub(crate) struct WorkerContext<'a> {
    pub(crate) errors: &'a AtomicUsize,
    pub(crate) debug: bool,
}

/// Spawns a single worker thread inside `scope` that pulls jobs until the
/// job channel is closed and drained.
pub(crate) fn spawn_worker<'scope, 'env, 'a, T>(
    scope: &'scope Scope<'scope, 'env>,
    id: usize,
    jobs: Receiver<Dispatch<'a, T>>,
    results: Sender<Completion>,
    ctx: WorkerContext<'a>,
) -> io::Result<()>
where
    'a: 'scope,
    T: Sync + 'a,
{
    thread::Builder::new()
        .name(format!("pool-worker-{id}"))
        .spawn_scoped(scope, move || run(id, jobs, results, ctx))?;
    Ok(())
}

fn run<T>(
    id: usize,
    jobs: Receiver<Dispatch<'_, T>>,
    results: Sender<Completion>,
    ctx: WorkerContext<'_>,
) {
    for (index, job) in jobs.iter() {
        if ctx.debug {
            info!(">> Worker {} started job {}", id, job.label());
        }

        let result = execute(id, job);
        if result.is_err() {
            ctx.errors.fetch_add(1, Ordering::AcqRel);
        }

        if ctx.debug {
            info!(">> Worker {} finished job {}", id, job.label());
        }

        if results.send((index, result)).is_err() {
            debug!("Worker {id}: result channel closed, shutting down");
            return;
        }
    }
    debug!("Worker {id}: job channel closed, shutting down");
}

/// Runs the job's work function, turning a panic into a job error so the
/// worker keeps draining the queue.
fn execute<T>(id: usize, job: &Job<T>) -> JobResult {
    match panic::catch_unwind(AssertUnwindSafe(|| job.execute())) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Worker {} job {} panicked: {}", id, job.label(), message);
            Err(JobError::Panicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
