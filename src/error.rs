/// 应用程序错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
///
/// 客户端层使用带类型的错误：轮询器需要结构化地读取
/// HTTP 状态码和失败响应的载荷
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非成功状态码
    #[error("API返回错误状态 ({endpoint}): HTTP {status}")]
    BadStatus {
        endpoint: String,
        status: u16,
        /// 失败响应体（能解析时保留，交给调用方判断）
        payload: Option<serde_json::Value>,
    },
}

impl ApiError {
    /// HTTP 状态码（仅 BadStatus 携带）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 取出失败响应的载荷
    pub fn take_payload(self) -> Option<serde_json::Value> {
        match self {
            ApiError::BadStatus { payload, .. } => payload,
            _ => None,
        }
    }
}

/// 业务逻辑错误
#[derive(Debug, thiserror::Error)]
pub enum BusinessError {
    /// 运行ID为空
    #[error("运行ID不能为空")]
    EmptyRunId,
    /// 批量任务ID为空
    #[error("批量任务ID不能为空")]
    EmptyRequestId,
    /// 未知命令
    #[error("未知命令: {command}")]
    UnknownCommand { command: String },
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 缺少 API 访问令牌
    #[error("缺少 API 访问令牌 (请设置环境变量 LAB_API_TOKEN)")]
    MissingApiToken,
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
