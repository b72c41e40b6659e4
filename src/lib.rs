// ==========================================
// 轮班排班系统 - 核心库
// ==========================================
// 定位: 按班组生成可循环的周期班表
// 流程: 配置加载 -> 引擎搜索（自动调整）-> 导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排班规则与周期搜索
pub mod engine;

// 配置层 - JSON 配置加载与校验
pub mod config;

// 导出层 - CSV / JSON
pub mod export;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DayStatus, RelaxationLevel, ShiftKind};

// 领域实体
pub use domain::{
    Cycle, DayState, GroupAssignment, PersonLedger, RosterInput, Rules, ShiftGroup,
    StaffingBounds, StaffingPlan, TimeWindow, WeekSlice, MAX_CYCLE_WEEKS,
};

// 引擎
pub use engine::{
    AdjustPolicy, AttemptFailure, AutoAdjustController, EngineError, FailedReport, HoursReport,
    LadderOrder, PatternBuilder, RosterOrchestrator, RosterOutcome,
};

// 配置与导出
pub use config::{load_config, parse_config, ConfigError, LoadedConfig};
pub use export::{ExportError, ExportFormat, RosterExporter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "轮班排班系统";
