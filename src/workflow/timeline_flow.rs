//! 运行时间线流程 - 流程层
//!
//! 定义"一次运行"的完整处理流程：
//! 1. 获取运行（远端接口或本地文件）
//! 2. 指令按 sequence_no 排序（分组引擎本身不排序）
//! 3. 分组引擎生成时间线
//! 4. 输出时间线摘要和完成进度

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::clients::RunClient;
use crate::config::Config;
use crate::models::{Instruction, Run, TimelineEntry};
use crate::services::{grouping, refs};
use crate::utils::logging::truncate_text;
use crate::workflow::run_ctx::RunCtx;

/// 运行时间线结果
#[derive(Debug, Clone)]
pub struct RunTimeline {
    /// 分组后的时间线条目
    pub entries: Vec<TimelineEntry>,
    /// 指令总数
    pub total: usize,
    /// 已完成指令数
    pub completed: usize,
}

impl RunTimeline {
    /// 运行是否已全部完成
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// 完成进度（0-100）
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u32
    }

    /// 按时间线顺序收集全部指令ID
    pub fn instruction_ids(&self) -> Vec<String> {
        grouping::instruction_ids(&self.entries)
    }
}

/// 运行时间线流程
///
/// - 编排完整的时间线构建流程
/// - 不持有运行数据，只依赖业务能力（grouping / refs）
pub struct TimelineFlow {
    run_client: RunClient,
    verbose_logging: bool,
}

impl TimelineFlow {
    /// 创建新的时间线流程
    pub fn new(config: &Config) -> Self {
        Self {
            run_client: RunClient::new(config),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 获取并处理一次运行
    pub async fn run(&self, ctx: &RunCtx) -> Result<RunTimeline> {
        info!("[运行 {}] 🔍 正在获取运行 {} ...", ctx.run_index, ctx.run_id);

        let run = self
            .run_client
            .fetch_run(&ctx.run_id)
            .await
            .with_context(|| format!("获取运行 {} 失败", ctx.run_id))?;

        Ok(self.build_timeline(run, ctx))
    }

    /// 为已加载的运行构建时间线（本地文件模式也走这里）
    pub fn build_timeline(&self, mut run: Run, ctx: &RunCtx) -> RunTimeline {
        info!(
            "[运行 {}] 标题: {}",
            ctx.run_index,
            truncate_text(run.display_title(), 80)
        );

        // 按服务端排序号排序后再分组
        let mut instructions = std::mem::take(&mut run.instructions);
        instructions.sort_by_key(|i| i.sequence_no);
        let total = instructions.len();

        let entries = grouping::group_instructions(instructions);
        let statuses = grouping::instruction_complete_statuses(&entries);
        let completed = statuses.iter().filter(|s| s.is_completed()).count();

        let timeline = RunTimeline {
            entries,
            total,
            completed,
        };

        self.log_timeline(&timeline, ctx);

        timeline
    }

    // ========== 日志辅助方法 ==========

    /// 输出时间线摘要
    fn log_timeline(&self, timeline: &RunTimeline, ctx: &RunCtx) {
        info!(
            "[运行 {}] ✓ 时间线构建完成: {} 条指令 → {} 个条目",
            ctx.run_index,
            timeline.total,
            timeline.entries.len()
        );

        if self.verbose_logging {
            for (i, entry) in timeline.entries.iter().enumerate() {
                self.log_entry(i + 1, entry, ctx);
            }
            debug!(
                "[运行 {}] 指令顺序: {:?}",
                ctx.run_index,
                timeline.instruction_ids()
            );
        }

        info!(
            "[运行 {}] 📊 进度: {}/{} 条指令已完成 ({}%)",
            ctx.run_index,
            timeline.completed,
            timeline.total,
            timeline.progress_percent()
        );
    }

    /// 输出单个时间线条目
    fn log_entry(&self, position: usize, entry: &TimelineEntry, ctx: &RunCtx) {
        match entry {
            TimelineEntry::Ungrouped { instruction } => {
                info!(
                    "[运行 {}]   {}. {}",
                    ctx.run_index,
                    position,
                    instruction.operation.display_label()
                );
            }
            TimelineEntry::Batch { kind, instructions } => {
                let containers = batch_refs(instructions);
                let wells = batch_well_count(instructions);
                info!(
                    "[运行 {}]   {}. {} ×{} (容器: {} | 孔位: {})",
                    ctx.run_index,
                    position,
                    kind.display_label(),
                    instructions.len(),
                    containers.join(", "),
                    wells
                );
            }
        }
    }
}

/// 汇总一个批次引用到的全部容器
fn batch_refs(instructions: &[Instruction]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for instruction in instructions {
        if let Some(lh) = instruction.operation.as_liquid_handle() {
            set.extend(refs::ref_set(&lh.locations));
        }
    }
    set.into_iter().collect()
}

/// 统计一个批次涉及的不同孔位数量
fn batch_well_count(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .filter_map(|i| i.operation.as_liquid_handle())
        .flat_map(|lh| lh.locations.iter())
        .filter_map(|l| l.location.as_deref())
        .filter_map(refs::well_label)
        .collect::<BTreeSet<_>>()
        .len()
}
