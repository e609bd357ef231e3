pub mod bulk_poller;
pub mod grouping;
pub mod refs;

pub use bulk_poller::{BulkPoller, BulkStatusSource};
pub use grouping::{group_instructions, instruction_complete_statuses, instruction_ids};
