use serde::{Deserialize, Serialize};

use crate::models::instruction::Instruction;

/// 协议运行
///
/// 控制台渲染的基本单位：一次运行及其全部指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// 来源文件路径（仅本地加载时填充）
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl Run {
    /// 获取用于展示的运行标题，缺失时退回运行ID
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
