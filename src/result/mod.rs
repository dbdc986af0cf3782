//! Result accumulation, formatting, and the output pipeline.

pub mod delete;
pub mod pipeline;
pub mod record;

pub use delete::perform_delete;
pub use pipeline::{spawn, BatchList, Pipeline, PipelineHandle};
pub use record::{DeleteStatus, RecordFields, ResultBatch, ResultRecord};
