//! Cron-based scheduler driving the analysis pipeline.

use crate::core::pipeline::AnalysisPipeline;
use crate::error::PipelineError;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Scheduler that runs the pipeline on a fixed calendar cadence.
///
/// Runs never overlap: the loop sleeps until the next tick, runs the batch to
/// completion, then computes the following tick from the current time.
pub struct BatchScheduler {
    pipeline: Arc<AnalysisPipeline>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl BatchScheduler {
    /// Create a scheduler from a cron expression
    /// (sec min hour day month weekday).
    pub fn new(pipeline: Arc<AnalysisPipeline>, cron_expr: &str) -> Result<Self, PipelineError> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| PipelineError::Schedule {
            expr: cron_expr.to_string(),
            reason: e.to_string(),
        })?;

        info!(cron = %cron_expr, "BatchScheduler: created with cadence '{}'", cron_expr);
        Ok(Self {
            pipeline,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler loop on a background task.
    pub async fn start(&self) {
        let pipeline = self.pipeline.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("BatchScheduler: started, waiting for next tick");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                match upcoming.next() {
                    Some(next_tick) => {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            let wait = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(wait).await;
                        }
                    }
                    None => {
                        tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                        continue;
                    }
                }

                info!("BatchScheduler: tick, running analysis");
                match pipeline.run_once().await {
                    Ok(report) => {
                        info!(
                            passed = report.filtered_symbols.len(),
                            forecasts = report.results.len(),
                            "BatchScheduler: run complete ({} passed, {} forecasts)",
                            report.filtered_symbols.len(),
                            report.results.len()
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "BatchScheduler: run failed: {}", e);
                    }
                }
            }
        });

        let mut h = handle_arc.write().await;
        *h = Some(handle);
        info!("BatchScheduler: started successfully");
    }

    /// Stop the scheduler.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("BatchScheduler: stopped");
        }
    }

    /// Check if the scheduler is running.
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
