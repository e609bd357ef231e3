/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的运行数量
    pub max_concurrent_runs: usize,
    /// 后端 API 基础URL
    pub api_base_url: String,
    /// 后端 API 访问令牌
    pub api_token: String,
    /// 本地运行文件存放目录
    pub run_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 4,
            api_base_url: "https://lab-console-api.example.com/api".to_string(),
            api_token: String::new(),
            run_folder: "runs_toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_runs: std::env::var("MAX_CONCURRENT_RUNS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_runs),
            api_base_url: std::env::var("LAB_API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("LAB_API_TOKEN").unwrap_or(default.api_token),
            run_folder: std::env::var("RUN_FOLDER").unwrap_or(default.run_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
