// Resume state derived from today's output files

pub mod manager;
pub mod resume;

pub use manager::{OutputPaths, Progress, ProgressSource, StateManager};
pub use resume::{plan_offsets, ResumePlan};
