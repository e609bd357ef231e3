//! # Lab Ops Console
//!
//! 一个用于实验室运行时间线与批量操作的 Rust 控制台
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 接口层（Clients）
//! - `clients/` - 封装后端 HTTP 接口，只暴露能力
//! - `RunClient` - 获取协议运行及其指令
//! - `BulkClient` - 查询批量任务状态
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `grouping` - 指令分组引擎（纯函数，无 I/O）
//! - `BulkPoller` - 批量任务轮询能力
//! - `refs` - 容器引用解析能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次运行 / 一个任务"的完整处理流程
//! - `RunCtx` - 上下文封装（run_id + run_index）
//! - `TimelineFlow` - 时间线构建（获取 → 排序 → 分组 → 汇报）
//! - `BulkFlow` - 批量任务轮询（轮询 → 结果日志）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 命令分发、并发调度和全局统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{BulkClient, RunClient};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, BusinessError, ConfigError};
pub use models::{
    BatchKind, BulkPollOutcome, BulkRequest, Instruction, InstructionStatus, Operation, Run, Shape,
    TimelineEntry,
};
pub use orchestrator::App;
pub use services::bulk_poller::{
    BulkPoller, BulkStatusSource, MAX_POLL_WAIT, POLL_INTERVAL, STOP_STATUS_CODES,
};
pub use services::grouping::{group_instructions, instruction_complete_statuses, instruction_ids};
pub use workflow::{BulkFlow, RunCtx, RunTimeline, TimelineFlow};
