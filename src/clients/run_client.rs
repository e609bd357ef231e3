/// 运行 API 客户端
///
/// 封装协议运行及其指令列表的获取逻辑
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::Run;

/// 运行 API 客户端
pub struct RunClient {
    http: Client,
    base_url: String,
    token: String,
}

impl RunClient {
    /// 创建新的运行客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        }
    }

    /// 获取一次运行（含全部指令）
    ///
    /// # 参数
    /// - `run_id`: 运行ID
    pub async fn fetch_run(&self, run_id: &str) -> Result<Run, ApiError> {
        let endpoint = format!("{}/runs/{}", self.base_url, run_id);

        debug!("获取运行: {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
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
            .json::<Run>()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint,
                source: e,
            })
    }
}
