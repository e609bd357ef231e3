//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责命令分发和批量调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Run> / 单个批量任务)
//!     ↓
//! workflow::TimelineFlow / BulkFlow (处理单个 Run / 单个任务)
//!     ↓
//! services (能力层：grouping / bulk_poller / refs)
//!     ↓
//! clients (接口层：RunClient / BulkClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：编排层只做调度和统计，不做具体业务判断
//! 2. **向下依赖**：编排层 → workflow → services → clients

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::App;
