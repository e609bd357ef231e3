//! 批量操作流程 - 流程层
//!
//! 把批量客户端接到轮询器上，驱动到终态并输出结果日志

use anyhow::Result;
use tracing::{error, info, warn};

use crate::clients::BulkClient;
use crate::config::Config;
use crate::models::BulkPollOutcome;
use crate::services::bulk_poller::{BulkPoller, MAX_POLL_WAIT};

/// 批量操作流程
pub struct BulkFlow {
    client: BulkClient,
    poller: BulkPoller,
}

impl BulkFlow {
    /// 创建新的批量操作流程
    pub fn new(config: &Config) -> Self {
        Self {
            client: BulkClient::new(config),
            poller: BulkPoller::new(),
        }
    }

    /// 轮询批量任务直到终态
    ///
    /// # 参数
    /// - `request_id`: 批量任务ID
    pub async fn run(&self, request_id: &str) -> Result<BulkPollOutcome> {
        info!("⏳ 开始轮询批量任务 {} ...", request_id);

        let outcome = self
            .poller
            .poll_for_bulk_request(&self.client, request_id)
            .await;

        match &outcome {
            BulkPollOutcome::Succeeded(request) => {
                info!(
                    "✅ 批量任务 {} 完成 (完成时间: {})",
                    request_id,
                    request.completed_at.as_deref().unwrap_or("-")
                );
                if let Some(action) = &request.bulk_action {
                    info!("动作: {}", action);
                }
                if let Some(records) = request.expected_records {
                    info!("📊 预期处理记录数: {}", records);
                }
            }
            BulkPollOutcome::StoppedByStatus { status, payload } => {
                warn!("⚠️ 批量任务 {} 轮询被停止 (HTTP {})", request_id, status);
                if let Some(reason) = payload.as_ref().and_then(|p| p.failed_with.as_deref()) {
                    warn!("失败原因: {}", reason);
                }
            }
            BulkPollOutcome::TimedOut => {
                error!(
                    "❌ 批量任务 {} 轮询超时 ({} 秒)",
                    request_id,
                    MAX_POLL_WAIT.as_secs()
                );
            }
        }

        Ok(outcome)
    }
}
