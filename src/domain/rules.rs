// ==========================================
// 轮班排班系统 - 全局排班规则
// ==========================================
// 连续上班 / 休息天数 / 夜班后约束 / 软偏好 / 工时目标
// ==========================================

use crate::domain::types::RelaxationLevel;
use serde::{Deserialize, Serialize};

/// 全局排班规则
///
/// 默认值与配置文件缺省值一致：
/// - max_shifts_in_row = 5
/// - min_days_off = 1, max_days_off = 2
/// - no_day_after_night = true
/// - wednesday_day_overfill = true
/// - min_days_off_after_night_streak = 0
/// - target_weekly_hours = [40, 48]
/// - require_equal_hours = false, enable_auto_adjust = true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// 最大连续上班天数（白班夜班合并计算）
    pub max_shifts_in_row: u32,
    pub min_days_off: u32,
    pub max_days_off: u32,
    /// 夜班次日不得上白班
    pub no_day_after_night: bool,
    /// 周五夜班优先人员（软偏好）
    #[serde(alias = "friday_shift2_priority_names")]
    pub friday_night_priority_names: Vec<String>,
    /// 周三白班超配（软偏好）
    pub wednesday_day_overfill: bool,
    /// 夜班连续段之后的最少休息天数
    pub min_days_off_after_night_streak: u32,
    pub target_weekly_hours_min: f64,
    pub target_weekly_hours_max: f64,
    pub require_equal_hours: bool,
    pub enable_auto_adjust: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_shifts_in_row: 5,
            min_days_off: 1,
            max_days_off: 2,
            no_day_after_night: true,
            friday_night_priority_names: Vec::new(),
            wednesday_day_overfill: true,
            min_days_off_after_night_streak: 0,
            target_weekly_hours_min: 40.0,
            target_weekly_hours_max: 48.0,
            require_equal_hours: false,
            enable_auto_adjust: true,
        }
    }
}

impl Rules {
    /// 是否存在可放弃的软偏好
    ///
    /// 周三超配只有在某个班组配置了超配人数时才算数
    pub fn has_soft_preferences(&self, any_group_overfills: bool) -> bool {
        !self.friday_night_priority_names.is_empty()
            || (self.wednesday_day_overfill && any_group_overfills)
    }

    /// 放弃软偏好后的规则变体，硬约束不变
    pub fn without_soft_preferences(&self) -> Rules {
        Rules {
            friday_night_priority_names: Vec::new(),
            wednesday_day_overfill: false,
            ..self.clone()
        }
    }

    /// 指定松弛等级下的规则变体
    pub fn for_level(&self, level: RelaxationLevel) -> Rules {
        match level {
            RelaxationLevel::L0 => self.clone(),
            RelaxationLevel::L1 => self.without_soft_preferences(),
        }
    }

    /// 夜班后实际需要的最少休息天数
    pub fn rest_after_night(&self) -> u32 {
        self.min_days_off.max(self.min_days_off_after_night_streak)
    }

    pub fn is_friday_priority(&self, name: &str) -> bool {
        self.friday_night_priority_names.iter().any(|n| n == name)
    }
}
