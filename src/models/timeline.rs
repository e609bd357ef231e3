use serde::{Deserialize, Serialize};

use crate::models::instruction::Instruction;

/// 时间线条目
///
/// 分组引擎的输出单元：要么是一条未分组指令，要么是一批
/// 相互兼容的移液指令。把所有条目按顺序展平即可还原输入序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    /// 单条非移液指令
    Ungrouped { instruction: Box<Instruction> },
    /// 一批相邻且兼容的移液指令
    Batch {
        kind: BatchKind,
        instructions: Vec<Instruction>,
    },
}

impl TimelineEntry {
    /// 条目内的指令数量
    pub fn len(&self) -> usize {
        match self {
            TimelineEntry::Ungrouped { .. } => 1,
            TimelineEntry::Batch { instructions, .. } => instructions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按条目内部顺序遍历指令
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        match self {
            TimelineEntry::Ungrouped { instruction } => std::slice::from_ref(instruction.as_ref()),
            TimelineEntry::Batch { instructions, .. } => instructions.as_slice(),
        }
        .iter()
    }
}

/// 批次类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    /// 单通道移液
    Single,
    /// 多通道移液
    Multi,
    /// 分液模式
    Dispense,
}

impl BatchKind {
    /// 返回用于展示的批次名称
    pub fn display_label(&self) -> &'static str {
        match self {
            BatchKind::Single => "Single-channel",
            BatchKind::Multi => "Multi-channel",
            BatchKind::Dispense => "Dispense",
        }
    }
}

/// 指令完成状态投影
///
/// 下游用它统计运行进度，不必重新遍历原始指令列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStatus {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl InstructionStatus {
    pub fn is_completed(&self) -> bool {
        self.completed_at.as_deref().is_some_and(|t| !t.is_empty())
    }
}
