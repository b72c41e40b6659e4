// ==========================================
// 轮班排班系统 - 配置加载器
// ==========================================
// 格式: { "shifts": [...], "rules": {...} }
// ==========================================
// 班组缺省值:
// - min_*_staff 缺省: prefer_two_or_more_in_shift ? 2 : 1
// - max_*_staff 缺省: max(推断的 min, 成员数)
// - *_weekend / *_wednesday 覆写: 未给出的一侧沿用默认上下限
// - pattern_weeks 缺省 1，wednesday_day_overfill_count 缺省 0
// 规则缺省值见 Rules::default()
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::roster::{validate_roster, RosterInput};
use crate::domain::rules::Rules;
use crate::domain::shift_group::{ShiftGroup, StaffingBounds, StaffingPlan, TimeWindow};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 班次时间段（HH:MM）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeRangeConfig {
    pub start: String,
    pub end: String,
}

// ==========================================
// ShiftConfig - 班组原始配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShiftConfig {
    pub name: String,
    #[serde(alias = "members", default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    pub day_shift: TimeRangeConfig,
    pub night_shift: TimeRangeConfig,
    #[serde(default)]
    pub wednesday_day_overfill_count: usize,
    #[serde(default)]
    pub prefer_two_or_more_in_shift: bool,
    #[serde(default)]
    pub pattern_weeks: Option<u32>,

    pub min_day_staff: Option<usize>,
    pub max_day_staff: Option<usize>,
    pub min_night_staff: Option<usize>,
    pub max_night_staff: Option<usize>,

    // ===== 周末覆写 =====
    pub min_day_staff_weekend: Option<usize>,
    pub max_day_staff_weekend: Option<usize>,
    pub min_night_staff_weekend: Option<usize>,
    pub max_night_staff_weekend: Option<usize>,

    // ===== 周三覆写 =====
    pub min_day_staff_wednesday: Option<usize>,
    pub max_day_staff_wednesday: Option<usize>,
    pub min_night_staff_wednesday: Option<usize>,
    pub max_night_staff_wednesday: Option<usize>,
}

impl ShiftConfig {
    fn inferred_min(&self) -> usize {
        if self.prefer_two_or_more_in_shift {
            2
        } else {
            1
        }
    }

    fn staffing_plan(
        &self,
        min: Option<usize>,
        max: Option<usize>,
        weekend: (Option<usize>, Option<usize>),
        wednesday: (Option<usize>, Option<usize>),
    ) -> StaffingPlan {
        let inferred = self.inferred_min();
        let default = StaffingBounds::new(
            min.unwrap_or(inferred),
            max.unwrap_or_else(|| inferred.max(self.people.len())),
        );
        let overlay = |(lo, hi): (Option<usize>, Option<usize>)| {
            if lo.is_none() && hi.is_none() {
                None
            } else {
                Some(StaffingBounds::new(
                    lo.unwrap_or(default.min),
                    hi.unwrap_or(default.max),
                ))
            }
        };
        StaffingPlan {
            default,
            weekend: overlay(weekend),
            wednesday: overlay(wednesday),
        }
    }

    fn window(&self, field: &str, range: &TimeRangeConfig) -> ConfigResult<TimeWindow> {
        TimeWindow::parse(range.start.trim(), range.end.trim()).map_err(|_| ConfigError::InvalidTime {
            group: self.name.clone(),
            field: field.to_string(),
            value: format!("{}-{}", range.start, range.end),
        })
    }

    /// 转换为领域班组（不做跨班组校验）
    pub fn to_group(&self) -> ConfigResult<ShiftGroup> {
        let day_staff = self.staffing_plan(
            self.min_day_staff,
            self.max_day_staff,
            (self.min_day_staff_weekend, self.max_day_staff_weekend),
            (self.min_day_staff_wednesday, self.max_day_staff_wednesday),
        );
        let night_staff = self.staffing_plan(
            self.min_night_staff,
            self.max_night_staff,
            (self.min_night_staff_weekend, self.max_night_staff_weekend),
            (self.min_night_staff_wednesday, self.max_night_staff_wednesday),
        );

        Ok(ShiftGroup {
            name: self.name.trim().to_string(),
            members: self.people.iter().map(|p| p.trim().to_string()).collect(),
            timezone: self.timezone.clone(),
            day_window: self.window("day_shift", &self.day_shift)?,
            night_window: self.window("night_shift", &self.night_shift)?,
            day_staff,
            night_staff,
            wednesday_overfill_count: self.wednesday_day_overfill_count,
            pattern_weeks: self.pattern_weeks.unwrap_or(1),
        })
    }
}

// ==========================================
// RosterConfig - 配置文件整体
// ==========================================
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub shifts: Vec<ShiftConfig>,
    #[serde(default)]
    pub rules: Rules,
}

impl RosterConfig {
    /// 转换并校验
    pub fn into_loaded(self) -> ConfigResult<LoadedConfig> {
        let groups = self
            .shifts
            .iter()
            .map(ShiftConfig::to_group)
            .collect::<ConfigResult<Vec<_>>>()?;

        validate_roster(&groups, &self.rules).map_err(ConfigError::InvalidValue)?;

        Ok(LoadedConfig {
            groups,
            rules: self.rules,
        })
    }
}

/// 已校验的配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub groups: Vec<ShiftGroup>,
    pub rules: Rules,
}

impl LoadedConfig {
    pub fn into_input(self, start_date: NaiveDate) -> RosterInput {
        RosterInput::new(self.groups, self.rules, start_date)
    }
}

/// 从 JSON 字符串解析配置
pub fn parse_config(json: &str) -> ConfigResult<LoadedConfig> {
    let raw: RosterConfig = serde_json::from_str(json)?;
    debug!(shifts = raw.shifts.len(), "配置 JSON 解析完成");
    raw.into_loaded()
}

/// 从文件加载配置
///
/// # 参数
/// - path: JSON 配置文件路径
///
/// # 返回
/// - `Ok(LoadedConfig)`: 已补齐缺省值并通过校验
/// - `Err(ConfigError)`: 读取、解析或校验失败
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<LoadedConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    let loaded = parse_config(&text)?;
    info!(
        path = %path.display(),
        groups = loaded.groups.len(),
        persons = loaded.groups.iter().map(|g| g.members.len()).sum::<usize>(),
        auto_adjust = loaded.rules.enable_auto_adjust,
        "配置加载完成"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ShiftKind;
    use chrono::Weekday;

    const MINIMAL: &str = r#"{
        "shifts": [{
            "name": "Shift 1",
            "people": ["Alice", "Bob", "Charlie"],
            "timezone": "EET",
            "day_shift": {"start": "09:00", "end": "18:00"},
            "night_shift": {"start": "17:00", "end": "02:00"}
        }]
    }"#;

    #[test]
    fn test_minimal_config_uses_documented_defaults() {
        let loaded = parse_config(MINIMAL).unwrap();
        assert_eq!(loaded.rules, Rules::default());

        let g = &loaded.groups[0];
        assert_eq!(g.timezone.as_deref(), Some("EET"));
        assert_eq!(g.day_staff.default, StaffingBounds::new(1, 3));
        assert_eq!(g.night_staff.default, StaffingBounds::new(1, 3));
        assert_eq!(g.pattern_weeks, 1);
        assert_eq!(g.wednesday_overfill_count, 0);
        assert_eq!(g.night_window.duration_hours(), 9.0);
    }

    #[test]
    fn test_prefer_two_infers_min_staff() {
        let json = MINIMAL.replace(
            r#""timezone": "EET","#,
            r#""timezone": "EET", "prefer_two_or_more_in_shift": true, "max_night_staff": 2,"#,
        );
        let loaded = parse_config(&json).unwrap();
        let g = &loaded.groups[0];
        assert_eq!(g.day_staff.default, StaffingBounds::new(2, 3));
        assert_eq!(g.night_staff.default, StaffingBounds::new(2, 2));
    }

    #[test]
    fn test_weekend_and_wednesday_overrides() {
        let json = MINIMAL.replace(
            r#""timezone": "EET","#,
            r#""timezone": "EET", "max_day_staff_weekend": 1, "min_night_staff_wednesday": 2,"#,
        );
        let g = parse_config(&json).unwrap().groups.remove(0);
        assert_eq!(g.staffing(ShiftKind::Day, Weekday::Sat), StaffingBounds::new(1, 1));
        assert_eq!(g.staffing(ShiftKind::Day, Weekday::Mon), StaffingBounds::new(1, 3));
        assert_eq!(g.staffing(ShiftKind::Night, Weekday::Wed), StaffingBounds::new(2, 3));
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let json = MINIMAL.replace("\"18:00\"", "\"25:99\"");
        let err = parse_config(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTime { ref field, .. } if field == "day_shift"));
    }
}
