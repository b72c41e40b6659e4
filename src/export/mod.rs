// ==========================================
// 轮班排班系统 - 导出层
// ==========================================
// 职责: 将已接受的周期按循环展开写出
// 格式: 行式 CSV / 透视 CSV / JSON
// ==========================================

pub mod error;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use writer::{ExportFormat, RosterExporter};
