// ==========================================
// BOM 零件核对系统 - 领域类型定义
// ==========================================
// 差异类型 / 处理状态 / 重复定稿策略
// 序列化格式与数据库存储值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 差异类型 (Item Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Shortage, // 缺件
    Surplus,  // 多件
}

impl ItemType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Shortage => "shortage",
            ItemType::Surplus => "surplus",
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "shortage" => Some(ItemType::Shortage),
            "surplus" => Some(ItemType::Surplus),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 处理状态 (Action Item Status)
// ==========================================
// 线上字面值沿用既有系统: BARU_MASUK / DITINDAKLANJUTI / SELESAI
// 任意状态之间均可通过显式更新互相切换（不强制单向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionItemStatus {
    #[serde(rename = "BARU_MASUK")]
    New, // 新建
    #[serde(rename = "DITINDAKLANJUTI")]
    InProgress, // 处理中
    #[serde(rename = "SELESAI")]
    Done, // 已完成
}

impl ActionItemStatus {
    /// 所有合法状态
    pub const ALL: [ActionItemStatus; 3] = [
        ActionItemStatus::New,
        ActionItemStatus::InProgress,
        ActionItemStatus::Done,
    ];

    /// 线上/数据库字面值
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionItemStatus::New => "BARU_MASUK",
            ActionItemStatus::InProgress => "DITINDAKLANJUTI",
            ActionItemStatus::Done => "SELESAI",
        }
    }

    /// 从线上字面值解析（大小写敏感，不接受别名）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BARU_MASUK" => Some(ActionItemStatus::New),
            "DITINDAKLANJUTI" => Some(ActionItemStatus::InProgress),
            "SELESAI" => Some(ActionItemStatus::Done),
            _ => None,
        }
    }
}

impl Default for ActionItemStatus {
    fn default() -> Self {
        ActionItemStatus::New
    }
}

impl fmt::Display for ActionItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 重复定稿策略 (Refinalize Policy)
// ==========================================
// 未重置即再次定稿时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefinalizePolicy {
    Reject, // 拒绝（默认）
    Append, // 追加第二批差异项
}

impl RefinalizePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefinalizePolicy::Reject => "REJECT",
            RefinalizePolicy::Append => "APPEND",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REJECT" => Some(RefinalizePolicy::Reject),
            "APPEND" => Some(RefinalizePolicy::Append),
            _ => None,
        }
    }
}

impl Default for RefinalizePolicy {
    fn default() -> Self {
        RefinalizePolicy::Reject
    }
}

impl fmt::Display for RefinalizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        for status in ActionItemStatus::ALL {
            assert_eq!(ActionItemStatus::from_str(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(ActionItemStatus::from_str("NEW"), None);
        assert_eq!(ActionItemStatus::from_str("selesai"), None);
        assert_eq!(ActionItemStatus::default(), ActionItemStatus::New);
    }

    #[test]
    fn test_item_type_serde() {
        assert_eq!(serde_json::to_string(&ItemType::Shortage).unwrap(), "\"shortage\"");
        let parsed: ItemType = serde_json::from_str("\"surplus\"").unwrap();
        assert_eq!(parsed, ItemType::Surplus);
        assert_eq!(ItemType::from_str("other"), None);
    }

    #[test]
    fn test_refinalize_policy_parse() {
        assert_eq!(RefinalizePolicy::from_str(" append "), Some(RefinalizePolicy::Append));
        assert_eq!(RefinalizePolicy::from_str("REJECT"), Some(RefinalizePolicy::Reject));
        assert_eq!(RefinalizePolicy::from_str("ignore"), None);
    }
}
