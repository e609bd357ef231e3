/// 批量操作 API 客户端
///
/// 封装批量任务状态查询接口的调用逻辑
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::BulkRequest;
use crate::services::bulk_poller::BulkStatusSource;

/// 批量操作 API 客户端
pub struct BulkClient {
    http: Client,
    base_url: String,
    token: String,
}

impl BulkClient {
    /// 创建新的批量操作客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        }
    }

    /// 查询批量任务状态
    ///
    /// # 参数
    /// - `request_id`: 批量任务ID
    ///
    /// # 返回
    /// 返回当前任务载荷；非 2xx 响应以 BadStatus 形式返回，
    /// 失败响应体能解析时随错误一并带回
    pub async fn fetch_bulk_request(&self, request_id: &str) -> Result<BulkRequest, ApiError> {
        let endpoint = format!("{}/bulk_requests/{}", self.base_url, request_id);

        debug!("查询批量任务状态: {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
            .query(&[("polling", "true")])
            .header("X-Console-Token", &self.token)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<serde_json::Value>().await.ok();
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                payload,
            });
        }

        response
            .json::<BulkRequest>()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint,
                source: e,
            })
    }
}

impl BulkStatusSource for BulkClient {
    async fn fetch_status(&self, request_id: &str) -> Result<BulkRequest, ApiError> {
        self.fetch_bulk_request(request_id).await
    }
}
