pub mod bulk;
pub mod instruction;
pub mod loaders;
pub mod run;
pub mod timeline;

pub use bulk::{BulkPollOutcome, BulkRequest};
pub use instruction::{Instruction, LiquidHandleOp, Location, Operation, Shape, UnknownOp};
pub use loaders::{load_all_run_files, load_toml_to_run};
pub use run::Run;
pub use timeline::{BatchKind, InstructionStatus, TimelineEntry};
