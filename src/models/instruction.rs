use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 操作显示名称映射表
///
/// 未收录的 op 直接显示原始名称
static OP_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "liquid_handle" => "Liquid Handle",
    "dispense" => "Dispense",
    "spin" => "Spin",
    "incubate" => "Incubate",
    "seal" => "Seal",
    "unseal" => "Unseal",
    "cover" => "Cover",
    "uncover" => "Uncover",
};

/// 协议运行中的单条指令
///
/// 由服务端创建并按 `sequence_no` 排序下发，客户端只读不改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// 指令ID（运行内唯一）
    pub id: String,
    /// 服务端分配的排序号
    pub sequence_no: u64,
    /// 操作内容（按 op 字段区分类型）
    pub operation: Operation,
    /// 执行完成时间（服务端时间戳，非空即已完成）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Instruction {
    /// 判断指令是否已执行完成
    pub fn is_completed(&self) -> bool {
        self.completed_at.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// 指令操作类型
///
/// 按 `op` 判别字段区分。未识别的 op 统一落入 `Unknown`，
/// 保留原始 op 名称和载荷，时间线上按普通单条指令展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// 移液操作（时间线分组只针对该类型）
    LiquidHandle(LiquidHandleOp),
    /// 批量分液
    Dispense,
    /// 离心
    Spin,
    /// 孵育
    Incubate,
    /// 封膜
    Seal,
    /// 揭膜
    Unseal,
    /// 加盖
    Cover,
    /// 开盖
    Uncover,
    /// 未识别的操作类型
    #[serde(untagged)]
    Unknown(UnknownOp),
}

impl Operation {
    /// 返回 op 判别字段的原始值
    pub fn op_name(&self) -> &str {
        match self {
            Operation::LiquidHandle(_) => "liquid_handle",
            Operation::Dispense => "dispense",
            Operation::Spin => "spin",
            Operation::Incubate => "incubate",
            Operation::Seal => "seal",
            Operation::Unseal => "unseal",
            Operation::Cover => "cover",
            Operation::Uncover => "uncover",
            Operation::Unknown(other) => &other.op,
        }
    }

    /// 返回用于展示的操作名称
    pub fn display_label(&self) -> &str {
        let name = self.op_name();
        OP_LABELS.get(name).copied().unwrap_or(name)
    }

    /// 如果是移液操作，返回其载荷
    pub fn as_liquid_handle(&self) -> Option<&LiquidHandleOp> {
        match self {
            Operation::LiquidHandle(lh) => Some(lh),
            _ => None,
        }
    }
}

/// 移液操作载荷
///
/// 所有字段都可能缺失，缺失时按宽松策略取默认值
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiquidHandleOp {
    /// 移液模式，"dispense" 是特殊值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// 通道形状
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    /// 移液位置列表
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl LiquidHandleOp {
    /// 是否是分液模式
    pub fn is_dispense_mode(&self) -> bool {
        self.mode.as_deref() == Some("dispense")
    }

    /// 是否是单通道操作
    ///
    /// 注意：按指令自带的字面 shape 判断，缺省 shape 视为单通道；
    /// 分组时的延续比较用的是补全后的 shape，两者不要混用
    pub fn is_single_channel(&self) -> bool {
        self.shape
            .as_ref()
            .is_none_or(|s| s.rows == 1 && s.columns == 1)
    }

    /// 返回用于延续比较的有效 shape（缺省时补全为默认 shape）
    pub fn effective_shape(&self) -> Shape {
        self.shape.clone().unwrap_or_default()
    }
}

/// 通道形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            format: default_format(),
        }
    }
}

fn default_rows() -> u32 {
    1
}

fn default_columns() -> u32 {
    1
}

fn default_format() -> String {
    "SBS96".to_string()
}

/// 移液位置
///
/// `location` 形如 "ref/well"，容器引用名在斜杠前
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// 未识别操作的载荷
///
/// 保留原始 op 名称和其余字段，便于日志排查
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownOp {
    pub op: String,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}
