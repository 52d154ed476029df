//! Periodic background jobs.
//!
//! Realizes the scheduling contract the refresh cycle runs under: uniquely
//! named periodic jobs, environmental constraints checked before every run,
//! and a keep-existing conflict policy. Runs of one job never overlap; the
//! next tick waits for the previous run to finish.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::ports::probe::{ConstraintProbe, Constraints};

/// Name under which the playlist refresh job is registered.
pub const REFRESH_JOB_NAME: &str = "stashcast:refresh_videos";

/// A named periodic job description.
#[derive(Debug, Clone)]
pub struct PeriodicJob {
    pub name: String,
    pub every: Duration,
    pub constraints: Constraints,
}

/// What to do when a job with the same name is already scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingJobPolicy {
    /// Leave the already-scheduled job in place.
    Keep,
    /// Cancel the existing job and install the new one.
    Replace,
}

/// Outcome of a schedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// The job was installed.
    Installed,
    /// A job with the same name was already live and was kept.
    Existing,
}

/// In-process scheduler for uniquely named periodic jobs.
pub struct JobScheduler<E> {
    probe: Arc<E>,
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl<E> JobScheduler<E>
where
    E: ConstraintProbe + 'static,
{
    pub fn new(probe: E) -> Self {
        Self {
            probe: Arc::new(probe),
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Register `job`, invoking `run` once per interval while the probe
    /// reports its constraints satisfied.
    ///
    /// At most one job is live per name; `policy` decides what happens when
    /// the name is already taken. The first run happens one full interval
    /// after registration.
    pub fn schedule_unique<R, F>(
        &self,
        job: PeriodicJob,
        policy: ExistingJobPolicy,
        run: R,
    ) -> Scheduled
    where
        R: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = ()> + Send,
    {
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");

        if let Some(existing) = jobs.get(&job.name) {
            if policy == ExistingJobPolicy::Keep && !existing.is_finished() {
                return Scheduled::Existing;
            }
            existing.abort();
        }

        let probe = Arc::clone(&self.probe);
        let name = job.name.clone();
        let handle = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + job.every, job.every);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !probe.satisfied(&job.constraints) {
                    println!("[Job {}] Constraints unmet, skipping run", job.name);
                    continue;
                }
                run().await;
            }
        });

        jobs.insert(name, handle);
        Scheduled::Installed
    }

    /// Cancel a scheduled job. Returns true if one was live under `name`.
    pub fn cancel(&self, name: &str) -> bool {
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        match jobs.remove(name) {
            Some(handle) => {
                let was_live = !handle.is_finished();
                handle.abort();
                was_live
            }
            None => false,
        }
    }
}
