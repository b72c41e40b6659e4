// ==========================================
// 轮班排班系统 - 配置层
// ==========================================
// 职责: 读取 JSON 配置，补齐缺省值，校验后转换为领域模型
// 红线: 校验失败即终止，引擎只接收已校验的输入
// ==========================================

pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, parse_config, LoadedConfig, RosterConfig, ShiftConfig, TimeRangeConfig};
