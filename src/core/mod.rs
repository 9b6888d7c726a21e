//! Batch orchestration: the per-run pipeline and the cron scheduler.

pub mod pipeline;
pub mod scheduler;

pub use pipeline::AnalysisPipeline;
pub use scheduler::BatchScheduler;
