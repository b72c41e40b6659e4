// ==========================================
// 轮班排班系统 - 班组领域模型
// ==========================================
// 班组 = 成员名单 + 白班/夜班时间窗 + 各班次人数上下限
// ==========================================

use crate::domain::types::{is_weekend, ShiftKind};
use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 24 * 3600;

// ==========================================
// TimeWindow - 班次时间窗
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// 解析 "HH:MM" 形式的时间窗
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: NaiveTime::parse_from_str(start.trim(), "%H:%M")?,
            end: NaiveTime::parse_from_str(end.trim(), "%H:%M")?,
        })
    }

    /// 结束时间小于开始时间视为跨零点
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// 班次时长（小时）
    ///
    /// 时长 = (end - start) mod 24h；start == end 时为 0
    pub fn duration_hours(&self) -> f64 {
        let start = self.start.num_seconds_from_midnight() as i64;
        let end = self.end.num_seconds_from_midnight() as i64;
        (end - start).rem_euclid(SECONDS_PER_DAY) as f64 / 3600.0
    }
}

// ==========================================
// StaffingBounds - 人数上下限
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingBounds {
    pub min: usize,
    pub max: usize,
}

impl StaffingBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

// ==========================================
// StaffingPlan - 按星期生效的人数上下限
// ==========================================
// 周三覆写优先于周末覆写（两者不会同时命中）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingPlan {
    pub default: StaffingBounds,
    #[serde(default)]
    pub weekend: Option<StaffingBounds>,
    #[serde(default)]
    pub wednesday: Option<StaffingBounds>,
}

impl StaffingPlan {
    pub fn uniform(bounds: StaffingBounds) -> Self {
        Self {
            default: bounds,
            weekend: None,
            wednesday: None,
        }
    }

    pub fn for_weekday(&self, weekday: Weekday) -> StaffingBounds {
        if weekday == Weekday::Wed {
            if let Some(bounds) = self.wednesday {
                return bounds;
            }
        }
        if is_weekend(weekday) {
            if let Some(bounds) = self.weekend {
                return bounds;
            }
        }
        self.default
    }

    /// 所有生效上下限（校验用）
    pub fn all_bounds(&self) -> impl Iterator<Item = StaffingBounds> + '_ {
        std::iter::once(self.default)
            .chain(self.weekend)
            .chain(self.wednesday)
    }
}

// ==========================================
// Person - 人员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub group: String,
}

// ==========================================
// ShiftGroup - 班组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftGroup {
    pub name: String,
    pub members: Vec<String>,       // 成员（顺序即输出顺序）
    pub timezone: Option<String>,   // 仅作展示
    pub day_window: TimeWindow,
    pub night_window: TimeWindow,
    pub day_staff: StaffingPlan,
    pub night_staff: StaffingPlan,
    pub wednesday_overfill_count: usize,
    pub pattern_weeks: u32,         // 班组自身周期（周），参与计算基础周期
}

impl ShiftGroup {
    /// 以默认覆写项构造班组（无周末/周三覆写、无超配、周期 1 周）
    pub fn new(
        name: &str,
        members: &[&str],
        day_window: TimeWindow,
        night_window: TimeWindow,
        day_staff: StaffingBounds,
        night_staff: StaffingBounds,
    ) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            timezone: None,
            day_window,
            night_window,
            day_staff: StaffingPlan::uniform(day_staff),
            night_staff: StaffingPlan::uniform(night_staff),
            wednesday_overfill_count: 0,
            pattern_weeks: 1,
        }
    }

    pub fn window(&self, kind: ShiftKind) -> &TimeWindow {
        match kind {
            ShiftKind::Day => &self.day_window,
            ShiftKind::Night => &self.night_window,
        }
    }

    pub fn staffing_plan(&self, kind: ShiftKind) -> &StaffingPlan {
        match kind {
            ShiftKind::Day => &self.day_staff,
            ShiftKind::Night => &self.night_staff,
        }
    }

    /// 指定星期、班次的人数上下限
    pub fn staffing(&self, kind: ShiftKind, weekday: Weekday) -> StaffingBounds {
        self.staffing_plan(kind).for_weekday(weekday)
    }

    pub fn shift_hours(&self, kind: ShiftKind) -> f64 {
        self.window(kind).duration_hours()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn persons(&self) -> impl Iterator<Item = Person> + '_ {
        self.members.iter().map(move |m| Person {
            name: m.clone(),
            group: self.name.clone(),
        })
    }
}
