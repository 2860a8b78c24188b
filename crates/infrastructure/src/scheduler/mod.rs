//! Cron scheduling for recurring weather refreshes
//!
//! Each named task owns a run record. A tick that fires while the previous
//! execution of the same task is still running is counted and dropped.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument, warn};

/// Refresh every hour on the hour (6 fields, seconds first)
pub const HOURLY: &str = "0 0 * * * *";

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Execution history of one scheduled task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub cron_expression: String,
    /// An execution is in flight
    pub running: bool,
    pub success_count: u64,
    pub failure_count: u64,
    /// Ticks dropped because the previous execution was still running
    pub skipped_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_duration_ms: u64,
}

/// Run record shared by the scheduler and the job closure of one task
#[derive(Debug)]
struct RunRecord(Mutex<TaskStats>);

impl RunRecord {
    fn new(cron_expression: &str) -> Self {
        Self(Mutex::new(TaskStats {
            cron_expression: cron_expression.to_string(),
            ..TaskStats::default()
        }))
    }

    /// Mark the task running; false (and one more skip) if it already is
    fn try_begin(&self) -> bool {
        let mut stats = self.0.lock();
        if stats.running {
            stats.skipped_count += 1;
            return false;
        }
        stats.running = true;
        true
    }

    fn finish(&self, result: Result<(), String>, finished_at: DateTime<Utc>, duration_ms: u64) {
        let mut stats = self.0.lock();
        stats.running = false;
        stats.last_run = Some(finished_at);
        stats.last_duration_ms = duration_ms;
        match result {
            Ok(()) => stats.success_count += 1,
            Err(e) => {
                stats.failure_count += 1;
                stats.last_error = Some(e);
            },
        }
    }

    fn stats(&self) -> TaskStats {
        self.0.lock().clone()
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Start ticking as soon as the scheduler is built
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Runs named async tasks on cron expressions
pub struct TaskScheduler {
    jobs: AsyncMutex<JobScheduler>,
    records: RwLock<HashMap<String, Arc<RunRecord>>>,
    started: AtomicBool,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("started", &self.is_running())
            .field("tasks", &self.records.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = Self {
            jobs: AsyncMutex::new(JobScheduler::new().await?),
            records: RwLock::new(HashMap::new()),
            started: AtomicBool::new(false),
        };
        if config.auto_start {
            scheduler.start().await?;
        }
        Ok(scheduler)
    }

    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.jobs.lock().await.start().await {
            self.started.store(false, Ordering::Release);
            return Err(e.into());
        }
        info!("Task scheduler started");
        Ok(())
    }

    /// Shut the scheduler down. The underlying job scheduler cannot be
    /// restarted afterwards.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.started.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.jobs.lock().await.shutdown().await?;
        info!("Task scheduler stopped");
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Schedule `task` under `name` on a 6-field cron expression
    /// (`sec min hour day-of-month month day-of-week`).
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        cron_expression
            .parse::<cron::Schedule>()
            .map_err(|e| SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}")))?;

        if self.records.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let record = Arc::new(RunRecord::new(cron_expression));
        let job_record = Arc::clone(&record);
        let task_name = name.to_string();

        let job = Job::new_async(cron_expression, move |_id, _lock| {
            let record = Arc::clone(&job_record);
            let name = task_name.clone();
            let run = task();

            Box::pin(async move {
                if !record.try_begin() {
                    warn!(task = %name, "Previous run still in flight, tick dropped");
                    return;
                }

                debug!(task = %name, "Scheduled run starting");
                let started = Instant::now();
                let result = run.await;
                let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                if let Err(e) = &result {
                    error!(task = %name, error = %e, duration_ms, "Scheduled run failed");
                } else {
                    info!(task = %name, duration_ms, "Scheduled run finished");
                }
                record.finish(result, Utc::now(), duration_ms);
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        self.jobs.lock().await.add(job).await?;
        self.records.write().insert(name.to_string(), record);

        info!(task = %name, cron = %cron_expression, "Task scheduled");
        Ok(())
    }

    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.records.read().get(name).map(|r| r.stats())
    }
}
