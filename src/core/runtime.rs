//! Starts the long-running tasks: cron scheduler and command listener

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::pipeline::ReportPipeline;
use crate::core::scheduler::{CycleScheduler, ScheduleError};
use crate::delivery::listener::CommandHandler;
use crate::delivery::service::DeliveryService;

/// Owns the shutdown channel shared by both tasks.
pub struct SentinelRuntime {
    pipeline: Arc<ReportPipeline>,
    delivery: DeliveryService,
    cron_spec: String,
    shutdown_tx: watch::Sender<bool>,
}

impl SentinelRuntime {
    pub fn new(pipeline: Arc<ReportPipeline>, delivery: DeliveryService, cron_spec: impl Into<String>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            pipeline,
            delivery,
            cron_spec: cron_spec.into(),
            shutdown_tx,
        }
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Spawn the scheduler and the listener, returning their handles for
    /// graceful shutdown.
    pub fn start(&self) -> Result<Vec<JoinHandle<()>>, ScheduleError> {
        let scheduler = CycleScheduler::new(self.pipeline.clone(), &self.cron_spec)?;

        let scheduler_shutdown = self.shutdown_signal();
        let scheduler_handle = tokio::spawn(async move {
            scheduler.run(scheduler_shutdown).await;
        });

        let listener = self.delivery.listener();
        let handler: Arc<dyn CommandHandler> = self.pipeline.clone();
        let listener_shutdown = self.shutdown_signal();
        let listener_handle = tokio::spawn(async move {
            listener.listen(listener_shutdown, handler).await;
        });

        info!(cron = %self.cron_spec, "SentinelRuntime: scheduler and listener started");
        Ok(vec![scheduler_handle, listener_handle])
    }

    /// Ask both tasks to stop at their next loop boundary. In-flight work
    /// is never interrupted; await the handles to wait for it.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        info!("SentinelRuntime: shutdown requested");
    }
}
