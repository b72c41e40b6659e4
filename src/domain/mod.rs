// ==========================================
// 轮班排班系统 - 领域模型层
// ==========================================
// 职责: 定义班组、规则、周期班表等实体与类型
// 红线: 不含引擎逻辑，不含 I/O
// ==========================================

pub mod cycle;
pub mod roster;
pub mod rules;
pub mod shift_group;
pub mod types;

// 重导出核心类型
pub use cycle::{Cycle, DayState, GroupAssignment, PersonLedger, RepeatedDay, WeekSlice};
pub use roster::{validate_roster, RosterInput, MAX_CYCLE_WEEKS};
pub use rules::Rules;
pub use shift_group::{Person, ShiftGroup, StaffingBounds, StaffingPlan, TimeWindow};
pub use types::{DayStatus, RelaxationLevel, ShiftKind};
