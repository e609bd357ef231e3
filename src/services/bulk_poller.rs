//! 批量操作轮询器 - 业务能力层
//!
//! 周期性查询服务端批量任务的状态，直到三种终态之一：
//! 任务完成、命中停止状态码、超过最大等待时间。
//!
//! 实现为显式的调度循环 + 单调时钟截止检查，而不是层层嵌套的
//! 回调：同一任务同一时刻只有一个在途请求，下一次查询一定在
//! 上一次的响应处理完之后才发出。超时路径因此可以在测试里用
//! tokio 的暂停时钟精确验证

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{BulkPollOutcome, BulkRequest};

/// 轮询间隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// 最大总等待时间
pub const MAX_POLL_WAIT: Duration = Duration::from_millis(300_000);

/// 停止状态码
///
/// 命中即视为不可重试的确定性失败，立即停止轮询；
/// 其余失败一律当作瞬时错误静默重试
pub const STOP_STATUS_CODES: [u16; 3] = [400, 403, 404];

/// 批量任务状态来源
///
/// 生产实现是 `BulkClient`；测试里用脚本化的内存实现代替
pub trait BulkStatusSource {
    fn fetch_status(
        &self,
        request_id: &str,
    ) -> impl std::future::Future<Output = Result<BulkRequest, ApiError>> + Send;
}

/// 批量操作轮询器
///
/// 节奏是固定常量而不是运行时参数：5 秒间隔，最长等待 5 分钟。
/// 没有显式的取消句柄，超时是唯一的提前退出方式
pub struct BulkPoller {
    interval: Duration,
    max_wait: Duration,
}

impl BulkPoller {
    /// 创建轮询器
    pub fn new() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_wait: MAX_POLL_WAIT,
        }
    }

    /// 轮询批量任务直到终态
    ///
    /// # 参数
    /// - `source`: 状态来源
    /// - `request_id`: 批量任务ID
    ///
    /// # 返回
    /// 返回三种终态之一：成功（载荷已置位 is_done）、
    /// 命中停止状态码（携带失败载荷）、超时（无载荷）
    pub async fn poll_for_bulk_request<S>(&self, source: &S, request_id: &str) -> BulkPollOutcome
    where
        S: BulkStatusSource,
    {
        let started = Instant::now();

        loop {
            match source.fetch_status(request_id).await {
                Ok(mut status) => {
                    if status.is_complete() {
                        status.is_done = true;
                        return BulkPollOutcome::Succeeded(status);
                    }
                    debug!("批量任务 {} 尚未完成，继续轮询", request_id);
                }
                Err(err) => {
                    if let Some(code) = err.status() {
                        if STOP_STATUS_CODES.contains(&code) {
                            warn!("批量任务 {} 返回停止状态码 {}，停止轮询", request_id, code);
                            let payload = err
                                .take_payload()
                                .and_then(|v| serde_json::from_value::<BulkRequest>(v).ok());
                            return BulkPollOutcome::StoppedByStatus {
                                status: code,
                                payload,
                            };
                        }
                    }
                    // 瞬时错误：静默重试，调用方只能看到最终结果
                    warn!("批量任务 {} 查询失败（将继续重试）: {}", request_id, err);
                }
            }

            sleep(self.interval).await;
            if started.elapsed() >= self.max_wait {
                return BulkPollOutcome::TimedOut;
            }
        }
    }
}

impl Default for BulkPoller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use serde_json::json;

    /// 脚本化的状态来源：按序吐出预设响应并计数调用次数，
    /// 脚本耗尽后一直返回"未完成"
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<BulkRequest, ApiError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn with(responses: Vec<Result<BulkRequest, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn endless_incomplete() -> Self {
            Self::with(Vec::new())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl BulkStatusSource for ScriptedSource {
        async fn fetch_status(&self, _request_id: &str) -> Result<BulkRequest, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(incomplete()))
        }
    }

    fn incomplete() -> BulkRequest {
        BulkRequest {
            id: "br1".to_string(),
            ..Default::default()
        }
    }

    fn complete() -> BulkRequest {
        BulkRequest {
            id: "br1".to_string(),
            completed_at: Some("2026-08-01T10:00:00Z".to_string()),
            expected_records: Some(24),
            ..Default::default()
        }
    }

    fn bad_status(status: u16, payload: Option<serde_json::Value>) -> ApiError {
        ApiError::BadStatus {
            endpoint: "/api/bulk_requests/br1".to_string(),
            status,
            payload,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_n_polls_spaced_by_interval() {
        let source = ScriptedSource::with(vec![Ok(incomplete()), Ok(incomplete()), Ok(complete())]);
        let started = Instant::now();

        let outcome = BulkPoller::new().poll_for_bulk_request(&source, "br1").await;

        match outcome {
            BulkPollOutcome::Succeeded(request) => {
                assert!(request.is_done);
                assert!(request.is_complete());
                assert_eq!(request.expected_records, Some(24));
            }
            other => panic!("应当以成功结束: {:?}", other),
        }
        assert_eq!(source.calls(), 3);
        // 第 1 次立即查询，之后每次间隔 5 秒
        assert_eq!(started.elapsed(), Duration::from_millis(10_000));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_completion_marker_is_not_success() {
        let almost = BulkRequest {
            id: "br1".to_string(),
            completed_at: Some(String::new()),
            ..Default::default()
        };
        let source = ScriptedSource::with(vec![Ok(almost), Ok(complete())]);

        let outcome = BulkPoller::new().poll_for_bulk_request(&source, "br1").await;

        assert!(matches!(outcome, BulkPollOutcome::Succeeded(_)));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_immediately_on_stop_status() {
        let source = ScriptedSource::with(vec![Err(bad_status(
            403,
            Some(json!({"id": "br1", "failed_with": "forbidden"})),
        ))]);
        let started = Instant::now();

        let outcome = BulkPoller::new().poll_for_bulk_request(&source, "br1").await;

        match outcome {
            BulkPollOutcome::StoppedByStatus { status, payload } => {
                assert_eq!(status, 403);
                let payload = payload.expect("停止终态应当携带失败载荷");
                assert_eq!(payload.id, "br1");
                assert_eq!(payload.failed_with.as_deref(), Some("forbidden"));
                // 失败载荷没有完成标记，以此与成功区分
                assert!(!payload.is_complete());
            }
            other => panic!("应当命中停止状态码: {:?}", other),
        }
        assert_eq!(source.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_silently() {
        let source = ScriptedSource::with(vec![
            Err(bad_status(500, None)),
            Err(bad_status(502, None)),
            Ok(complete()),
        ]);

        let outcome = BulkPoller::new().poll_for_bulk_request(&source, "br1").await;

        assert!(matches!(outcome, BulkPollOutcome::Succeeded(_)));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_at_the_wall_clock_ceiling() {
        let source = ScriptedSource::endless_incomplete();
        let started = Instant::now();

        let outcome = BulkPoller::new().poll_for_bulk_request(&source, "br1").await;

        assert_eq!(outcome, BulkPollOutcome::TimedOut);
        assert_eq!(started.elapsed(), Duration::from_millis(300_000));
        // 0 秒立即查询一次，之后每 5 秒一次，300 秒整点停止
        assert_eq!(source.calls(), 60);
    }
}
