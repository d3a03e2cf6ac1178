//! In-process job execution.
//!
//! Intentionally minimal: real deployments hang these jobs off whatever
//! scheduler the platform provides (cron, message queue, admin endpoint); the
//! engine only needs them to be callable functions.

use crate::job::{AlertBatch, AlertError, AlertJob};

/// Runs alert jobs immediately, in-process, with tracing around each run.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalAlertScheduler;

impl LocalAlertScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Run a single job.
    pub fn run(&self, job: &dyn AlertJob) -> Result<AlertBatch, AlertError> {
        let span = tracing::info_span!("alert_job", job = job.name());
        let _guard = span.enter();

        match job.run() {
            Ok(batch) => {
                tracing::info!(alerts = batch.alerts.len(), "scan finished");
                Ok(batch)
            }
            Err(err) => {
                tracing::warn!(error = %err, "scan failed");
                Err(err)
            }
        }
    }

    /// Run every job, collecting per-job outcomes. One failing job does not
    /// stop the others.
    pub fn run_all(&self, jobs: &[&dyn AlertJob]) -> Vec<Result<AlertBatch, AlertError>> {
        jobs.iter().map(|job| self.run(*job)).collect()
    }
}
