//! 批量运行处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责命令分发、批量运行处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写入日志文件头、输出启动信息
//! 2. **命令分发**：timeline（远端运行）/ folder（本地文件）/ bulk（批量任务）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的运行数量
//! 4. **全局统计**：汇总所有运行的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个运行的细节，向下委托给 workflow
//! - **并发安全**：通过 Semaphore 和 tokio::spawn 实现并发
//! - **无业务逻辑**：只做调度和统计，不做分组/轮询判断

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, BusinessError, ConfigError};
use crate::models::{load_all_run_files, BulkPollOutcome};
use crate::workflow::{BulkFlow, RunCtx, TimelineFlow};

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// 获取并渲染一个或多个远端运行的时间线
    Timeline { run_ids: Vec<String> },
    /// 渲染本地文件夹中的运行（离线模式）
    Folder,
    /// 轮询一个批量任务直到终态
    Bulk { request_id: String },
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `args`: 进程参数（不含程序名），为空时默认走离线模式
    pub async fn run(&self, args: &[String]) -> Result<()> {
        match self.parse_command(args)? {
            Command::Timeline { run_ids } => self.process_runs(run_ids).await,
            Command::Folder => self.process_folder().await,
            Command::Bulk { request_id } => self.process_bulk(&request_id).await,
        }
    }

    /// 解析命令行参数
    fn parse_command(&self, args: &[String]) -> Result<Command> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Command::Folder);
        };

        match command.as_str() {
            "timeline" => {
                if rest.is_empty() {
                    return Err(AppError::Business(BusinessError::EmptyRunId).into());
                }
                self.ensure_api_token()?;
                Ok(Command::Timeline {
                    run_ids: rest.to_vec(),
                })
            }
            "folder" => Ok(Command::Folder),
            "bulk" => {
                let request_id = rest
                    .first()
                    .ok_or(AppError::Business(BusinessError::EmptyRequestId))?;
                self.ensure_api_token()?;
                Ok(Command::Bulk {
                    request_id: request_id.clone(),
                })
            }
            other => Err(AppError::Business(BusinessError::UnknownCommand {
                command: other.to_string(),
            })
            .into()),
        }
    }

    /// 访问远端接口的命令需要配置令牌
    fn ensure_api_token(&self) -> Result<(), AppError> {
        if self.config.api_token.is_empty() {
            return Err(ConfigError::MissingApiToken.into());
        }
        Ok(())
    }

    /// 并发处理多个远端运行
    async fn process_runs(&self, run_ids: Vec<String>) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_runs));
        let total = run_ids.len();

        log_runs_loaded(total, self.config.max_concurrent_runs);

        let mut handles = Vec::new();

        for (idx, run_id) in run_ids.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = TimelineFlow::new(&self.config);
            let ctx = RunCtx::new(idx + 1, run_id);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                match flow.run(&ctx).await {
                    Ok(timeline) => Ok(timeline),
                    Err(e) => {
                        error!("[运行 {}] ❌ 处理过程中发生错误: {}", ctx.run_index, e);
                        Err(e)
                    }
                }
            }));
        }

        // 等待全部任务完成
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for result in futures::future::join_all(handles).await {
            match result {
                Ok(Ok(_)) => stats.success += 1,
                Ok(Err(_)) => stats.failed += 1,
                Err(e) => {
                    error!("任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 处理本地文件夹中的运行
    async fn process_folder(&self) -> Result<()> {
        info!("\n📁 正在扫描本地运行文件...");

        let runs = load_all_run_files(&self.config.run_folder).await?;

        if runs.is_empty() {
            warn!("⚠️ 没有找到待处理的运行文件，程序结束");
            return Ok(());
        }

        let total = runs.len();
        let flow = TimelineFlow::new(&self.config);
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (idx, run) in runs.into_iter().enumerate() {
            let ctx = RunCtx::new(idx + 1, run.id.clone());
            let timeline = flow.build_timeline(run, &ctx);
            if !timeline.is_complete() {
                // 未跑完的运行不算失败，只是提醒
                info!("[运行 {}] 💡 运行尚未全部完成", ctx.run_index);
            }
            stats.success += 1;
        }

        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 轮询批量任务
    async fn process_bulk(&self, request_id: &str) -> Result<()> {
        let flow = BulkFlow::new(&self.config);
        let outcome = flow.run(request_id).await?;

        if outcome == BulkPollOutcome::TimedOut {
            anyhow::bail!("批量任务 {} 轮询超时", request_id);
        }

        Ok(())
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

// ========== 日志辅助函数 ==========

fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n运行处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 实验室运行控制台");
    info!("📊 最大并发数: {}", config.max_concurrent_runs);
    info!("{}", "=".repeat(60));
}

fn log_runs_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 共 {} 个待处理的运行", total);
    info!("📋 最多同时处理 {} 个\n", max_concurrent);
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
