//! Cron-based scheduler driving the periodic report cycle

use chrono::Utc;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::core::pipeline::ReportPipeline;

#[derive(Debug, Error)]
#[error("invalid cron expression '{expression}': {reason}")]
pub struct ScheduleError {
    pub expression: String,
    pub reason: String,
}

/// Runs the pipeline on every cron tick.
///
/// Cycles run inline in a single task, so a slow cycle delays the next tick
/// instead of overlapping it.
pub struct CycleScheduler {
    pipeline: Arc<ReportPipeline>,
    schedule: Schedule,
    expression: String,
}

impl CycleScheduler {
    /// Expressions use the seconds-resolution format:
    /// `second minute hour day-of-month month day-of-week`.
    pub fn new(pipeline: Arc<ReportPipeline>, expression: &str) -> Result<Self, ScheduleError> {
        let schedule = Schedule::from_str(expression).map_err(|e| ScheduleError {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;

        info!(cron = %expression, "CycleScheduler: created");

        Ok(Self {
            pipeline,
            schedule,
            expression: expression.to_string(),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Time until the next tick, or `None` if the schedule has no future ticks.
    pub fn until_next_tick(&self) -> Option<Duration> {
        let next_tick = self.schedule.upcoming(Utc).next()?;
        Some((next_tick - Utc::now()).to_std().unwrap_or_default())
    }

    /// Run until `shutdown` flips to `true`. A cycle already running is
    /// allowed to finish.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(cron = %self.expression, "CycleScheduler: started, waiting for cron schedule...");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let Some(wait) = self.until_next_tick() else {
                warn!(cron = %self.expression, "CycleScheduler: schedule has no upcoming ticks");
                break;
            };

            // Some(sender_dropped) when the shutdown channel fired before the tick.
            let woken = tokio::select! {
                _ = tokio::time::sleep(wait) => None,
                changed = shutdown.changed() => Some(changed.is_err()),
            };
            match woken {
                Some(true) => break,
                Some(false) => continue,
                None => {}
            }

            info!("CycleScheduler: cron tick");
            let outcome = self.pipeline.run_cycle().await;
            info!(outcome = ?outcome, "CycleScheduler: cycle finished");
        }

        info!("CycleScheduler: stopped");
    }
}
