use serde::{Deserialize, Serialize};

/// 批量操作请求
///
/// 服务端异步执行的批量任务（如批量删除、批量转移容器）。
/// 轮询器只观察不修改，`completed_at` 非空是唯一的成功完成信号
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BulkRequest {
    #[serde(default)]
    pub id: String,
    /// 批量动作名称（如 "destroy_container"、"relocate"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// 完成时间，非空即任务成功结束
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// 预期处理的记录数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_records: Option<u64>,
    /// 服务端记录的失败原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_with: Option<String>,
    /// 轮询器在成功终态时置位，调用方不必再自行判断
    #[serde(default, skip_deserializing)]
    pub is_done: bool,
}

impl BulkRequest {
    /// 判断任务是否已完成
    pub fn is_complete(&self) -> bool {
        self.completed_at.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// 轮询终态
///
/// 三种互斥的结束方式：成功、命中停止状态码、超时
#[derive(Debug, Clone, PartialEq)]
pub enum BulkPollOutcome {
    /// 任务完成，携带最终响应（已置位 is_done）
    Succeeded(BulkRequest),
    /// 命中停止状态码，轮询立即结束
    StoppedByStatus {
        status: u16,
        /// 失败响应的载荷（无完成标记，以此与成功区分）
        payload: Option<BulkRequest>,
    },
    /// 超过最大等待时间，轮询停止
    TimedOut,
}
