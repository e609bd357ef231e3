//! 指令分组引擎 - 业务能力层
//!
//! 把一次运行的扁平指令序列变成时间线条目序列：相邻且相互兼容的
//! 移液指令合并成批次统一展示，其余指令保持单条原样。
//!
//! ## 分组规则
//!
//! 1. 只有 `liquid_handle` 指令参与分组，其他指令一律单条输出，
//!    并且会关闭当前打开的移液段
//! 2. 一条移液指令延续当前移液段，当且仅当它与上一条移液指令的
//!    有效 shape（缺省补全为 1×1 SBS96）逐字段相等、且容器引用
//!    集合相等（与顺序无关）
//! 3. 段内按批次类型分拣：mode 为 "dispense" 的进 dispense 批次
//!    （不看通道数）；其余按字面 shape 判定单通道/多通道
//! 4. 段关闭时非空批次按 single、multi、dispense 的固定顺序输出
//!
//! 整个过程单次从左到右遍历，不修改指令本身，也不改变全局顺序：
//! 把输出条目按序展平即可还原输入序列。任何字段缺失都按宽松
//! 策略取默认值，不会报错

use std::collections::BTreeSet;

use crate::models::{BatchKind, Instruction, InstructionStatus, Operation, Shape, TimelineEntry};
use crate::services::refs;

/// 分组累加器
///
/// 贯穿整个遍历的待定状态：三个同时打开的待定批次，
/// 加上最近一条移液指令的有效 shape 和引用集合
#[derive(Debug, Default)]
struct GroupingAccumulator {
    entries: Vec<TimelineEntry>,
    single: Vec<Instruction>,
    multi: Vec<Instruction>,
    dispense: Vec<Instruction>,
    prev_shape: Option<Shape>,
    prev_refs: Option<BTreeSet<String>>,
}

impl GroupingAccumulator {
    /// 处理一条指令
    fn step(mut self, instruction: Instruction) -> Self {
        let liquid_handle = match &instruction.operation {
            Operation::LiquidHandle(lh) => Some((
                lh.effective_shape(),
                refs::ref_set(&lh.locations),
                lh.is_dispense_mode(),
                lh.is_single_channel(),
            )),
            _ => None,
        };

        match liquid_handle {
            Some((shape, ref_set, is_dispense, is_single)) => {
                // 延续判定：上一条也是移液，且有效 shape 与引用集合都相等
                let continues = self.prev_shape.as_ref() == Some(&shape)
                    && self.prev_refs.as_ref() == Some(&ref_set);
                if !continues {
                    self.flush_pending();
                }

                // 分拣：dispense 模式优先，其余按字面 shape 判定通道数
                if is_dispense {
                    self.dispense.push(instruction);
                } else if is_single {
                    self.single.push(instruction);
                } else {
                    self.multi.push(instruction);
                }

                self.prev_shape = Some(shape);
                self.prev_refs = Some(ref_set);
            }
            None => {
                // 非移液指令：关闭当前移液段，自己单条输出
                self.flush_pending();
                self.entries.push(TimelineEntry::Ungrouped {
                    instruction: Box::new(instruction),
                });
            }
        }

        self
    }

    /// 关闭当前打开的移液段
    ///
    /// 非空待定批次按 single、multi、dispense 的固定顺序写入输出，
    /// 同时清空携带的比较状态
    fn flush_pending(&mut self) {
        for (kind, pending) in [
            (BatchKind::Single, &mut self.single),
            (BatchKind::Multi, &mut self.multi),
            (BatchKind::Dispense, &mut self.dispense),
        ] {
            if !pending.is_empty() {
                self.entries.push(TimelineEntry::Batch {
                    kind,
                    instructions: std::mem::take(pending),
                });
            }
        }
        self.prev_shape = None;
        self.prev_refs = None;
    }

    /// 遍历结束，输出最终时间线
    fn finish(mut self) -> Vec<TimelineEntry> {
        self.flush_pending();
        self.entries
    }
}

/// 指令分组
///
/// # 参数
/// - `instructions`: 按展示顺序排好的指令序列（引擎不负责排序）
///
/// # 返回
/// 返回时间线条目序列，展平后与输入严格一致
pub fn group_instructions<I>(instructions: I) -> Vec<TimelineEntry>
where
    I: IntoIterator<Item = Instruction>,
{
    instructions
        .into_iter()
        .fold(GroupingAccumulator::default(), GroupingAccumulator::step)
        .finish()
}

/// 展平时间线，按顺序收集全部指令ID
pub fn instruction_ids(entries: &[TimelineEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.instructions())
        .map(|instruction| instruction.id.clone())
        .collect()
}

/// 展平时间线，投影每条指令的完成状态
pub fn instruction_complete_statuses(entries: &[TimelineEntry]) -> Vec<InstructionStatus> {
    entries
        .iter()
        .flat_map(|entry| entry.instructions())
        .map(|instruction| InstructionStatus {
            id: instruction.id.clone(),
            completed_at: instruction.completed_at.clone(),
        })
        .collect()
}
