//! Core application primitives (pipeline, scheduling, runtime)

pub mod http;
pub mod pipeline;
pub mod runtime;
pub mod scheduler;

pub use pipeline::{CycleOutcome, ReportPipeline};
pub use runtime::SentinelRuntime;
pub use scheduler::CycleScheduler;
