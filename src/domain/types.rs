// ==========================================
// 轮班排班系统 - 领域类型定义
// ==========================================
// 班次类型 / 每日状态 / 松弛等级
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 班次类型 (Shift Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Day,   // 白班
    Night, // 夜班
}

impl ShiftKind {
    /// 固定分配顺序: 先白班后夜班
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Day, ShiftKind::Night];
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Day => write!(f, "DAY"),
            ShiftKind::Night => write!(f, "NIGHT"),
        }
    }
}

// ==========================================
// 每日状态 (Day Status)
// ==========================================
// 显式三态: 休息不再是"未出现在白班/夜班"的隐含结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Day,
    Night,
    Off,
}

impl DayStatus {
    /// 是否为上班日（白班或夜班）
    pub fn is_working(&self) -> bool {
        !matches!(self, DayStatus::Off)
    }

    pub fn to_token(&self) -> &'static str {
        match self {
            DayStatus::Day => "DAY",
            DayStatus::Night => "NIGHT",
            DayStatus::Off => "OFF",
        }
    }
}

impl From<ShiftKind> for DayStatus {
    fn from(kind: ShiftKind) -> Self {
        match kind {
            ShiftKind::Day => DayStatus::Day,
            ShiftKind::Night => DayStatus::Night,
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

// ==========================================
// 松弛等级 (Relaxation Level)
// ==========================================
// L0: 按配置原样
// L1: 放弃软偏好（周三超配、周五夜班优先名单），硬约束保持不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelaxationLevel {
    L0,
    L1,
}

impl fmt::Display for RelaxationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationLevel::L0 => write!(f, "L0"),
            RelaxationLevel::L1 => write!(f, "L1"),
        }
    }
}

/// 星期的英文全称（导出表格使用）
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// 是否为周末
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
