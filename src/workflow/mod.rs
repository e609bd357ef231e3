pub mod bulk_flow;
pub mod run_ctx;
pub mod timeline_flow;

pub use bulk_flow::BulkFlow;
pub use run_ctx::RunCtx;
pub use timeline_flow::{RunTimeline, TimelineFlow};
