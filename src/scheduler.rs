use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::services::{IssueService, RefreshReport};

/// Periodically refreshes the cached current issue.
pub struct Scheduler {
    issues: Arc<IssueService>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(issues: Arc<IssueService>, config: SchedulerConfig) -> Self {
        Self {
            issues,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if self.config.run_on_startup {
            self.run_once().await;
        }

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let issues = Arc::clone(&self.issues);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let issues = Arc::clone(&issues);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_refresh_job(&issues).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.refresh_interval_minutes.max(1);

        info!("Scheduler running every {} minutes", interval_mins);

        let mut refresh_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));
        // the first tick completes immediately; startup runs are handled separately
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_refresh_job(&self.issues).await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn run_once(&self) -> RefreshReport {
        info!("Running manual refresh...");
        run_refresh_job(&self.issues).await
    }
}

async fn run_refresh_job(issues: &IssueService) -> RefreshReport {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = "refresh_current_issue", "Starting scheduled refresh");

    let report = issues.refresh().await;

    if let Err(e) = &report.issue {
        error!(
            event = "job_failed",
            job_name = "refresh_current_issue",
            error = %e,
            "Scheduled refresh failed"
        );
    }

    info!(
        event = "job_finished",
        job_name = "refresh_current_issue",
        wrote_cache = report.wrote_cache(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Scheduled refresh finished"
    );

    report
}
