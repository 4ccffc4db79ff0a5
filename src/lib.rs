#![deny(missing_docs)]

//! A bounded worker pool.
//!
//! A fixed number of worker threads drain a list of independent jobs,
//! run a caller-supplied work function on each payload, and report one
//! result per job. Results land back in the job list, each in the slot of
//! the job that produced it, and failures are tallied on the pool.

mod config;
mod error;
mod job;
mod pool;
mod worker;

pub use config::{PoolConfig, DEFAULT_WORKERS};
pub use error::{JobError, PoolError, Result};
pub use job::{work_fn, Job, JobResult, WorkFn};
pub use pool::Pool;
