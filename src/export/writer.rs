// ==========================================
// 轮班排班系统 - 班表导出
// ==========================================
// 行式 CSV: week_index,date,weekday,shift_name,shift_type,members
//           每周内按班组、再按日期，每天先 DAY 后 NIGHT，成员以 ';' 连接
// 透视 CSV: week_index,date,weekday,<人员...>，单元格为 DAY/NIGHT/OFF
// XLSX:     与透视 CSV 同形的工作表 "Schedule"，表头加粗并冻结首行
// JSON:     Cycle 原样序列化（只含一个周期）
// ==========================================

use crate::domain::cycle::{Cycle, RepeatedDay, DAYS_PER_WEEK};
use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::{weekday_name, DayStatus, ShiftKind};
use crate::export::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const ROW_HEADER: [&str; 6] = ["week_index", "date", "weekday", "shift_name", "shift_type", "members"];
const PIVOT_KEYS: [&str; 3] = ["week_index", "date", "weekday"];
const XLSX_SHEET: &str = "Schedule";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Rows,
    Pivot,
    Xlsx,
    Json,
}

impl ExportFormat {
    /// 按扩展名推断: .json -> Json，.xlsx -> Xlsx，其余 -> Rows
    pub fn from_path(path: &Path) -> ExportFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Xlsx,
            _ => ExportFormat::Rows,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" | "csv" => Ok(ExportFormat::Rows),
            "pivot" => Ok(ExportFormat::Pivot),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Rows => write!(f, "rows"),
            ExportFormat::Pivot => write!(f, "pivot"),
            ExportFormat::Xlsx => write!(f, "xlsx"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

// ==========================================
// RosterExporter - 班表导出器
// ==========================================
pub struct RosterExporter<'a> {
    cycle: &'a Cycle,
    groups: &'a [ShiftGroup],
}

impl<'a> RosterExporter<'a> {
    pub fn new(cycle: &'a Cycle, groups: &'a [ShiftGroup]) -> Self {
        Self { cycle, groups }
    }

    /// 行式 CSV，返回写出的数据行数
    pub fn write_rows<W: Write>(&self, writer: W, total_weeks: u32) -> ExportResult<usize> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(ROW_HEADER)?;

        let days: Vec<RepeatedDay<'_>> = self.cycle.repeat(total_weeks).collect();
        let mut rows = 0;
        for week in days.chunks(DAYS_PER_WEEK) {
            for group in self.groups {
                for day in week {
                    let Some(assignment) = day.state.group(&group.name) else {
                        continue;
                    };
                    for kind in ShiftKind::ALL {
                        csv.write_record([
                            day.week_index.to_string(),
                            day.date.to_string(),
                            weekday_name(day.state.weekday).to_string(),
                            group.name.clone(),
                            kind.to_string(),
                            assignment.members(kind).join(";"),
                        ])?;
                        rows += 1;
                    }
                }
            }
        }

        csv.flush()?;
        Ok(rows)
    }

    fn pivot_header(&self) -> Vec<String> {
        PIVOT_KEYS
            .iter()
            .map(|k| k.to_string())
            .chain(self.cycle.ledgers.iter().map(|l| l.person.clone()))
            .collect()
    }

    /// 某天每人的状态，顺序与台账一致
    fn pivot_cells(&self, day: &RepeatedDay<'_>) -> Vec<&'static str> {
        self.cycle
            .ledgers
            .iter()
            .map(|l| {
                day.state
                    .group(&l.group)
                    .map(|g| g.status_of(&l.person))
                    .unwrap_or(DayStatus::Off)
                    .to_token()
            })
            .collect()
    }

    /// 透视 CSV（每人一列），返回写出的数据行数
    pub fn write_pivot<W: Write>(&self, writer: W, total_weeks: u32) -> ExportResult<usize> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.pivot_header())?;

        let mut rows = 0;
        for day in self.cycle.repeat(total_weeks) {
            let mut record = vec![
                day.week_index.to_string(),
                day.date.to_string(),
                weekday_name(day.state.weekday).to_string(),
            ];
            record.extend(self.pivot_cells(&day).into_iter().map(str::to_string));
            csv.write_record(&record)?;
            rows += 1;
        }

        csv.flush()?;
        Ok(rows)
    }

    /// 透视 XLSX 工作簿，返回写出的数据行数
    ///
    /// week_index 写为数字，其余单元格为文本
    pub fn write_xlsx<W: Write>(&self, mut writer: W, total_weeks: u32) -> ExportResult<usize> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(XLSX_SHEET)?;

        let bold = Format::new().set_bold();
        for (col, title) in self.pivot_header().iter().enumerate() {
            sheet.write_string_with_format(0, xlsx_col(col)?, title, &bold)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        let mut rows = 0;
        for day in self.cycle.repeat(total_weeks) {
            let row = u32::try_from(rows + 1).map_err(|_| ExportError::SheetTooLarge {
                rows: rows + 1,
                columns: self.cycle.ledgers.len() + PIVOT_KEYS.len(),
            })?;
            sheet.write_number(row, 0, f64::from(day.week_index))?;
            sheet.write_string(row, 1, day.date.to_string())?;
            sheet.write_string(row, 2, weekday_name(day.state.weekday))?;
            for (offset, token) in self.pivot_cells(&day).into_iter().enumerate() {
                sheet.write_string(row, xlsx_col(offset + PIVOT_KEYS.len())?, token)?;
            }
            rows += 1;
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(rows)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> ExportResult<()> {
        let mut writer = writer;
        serde_json::to_writer_pretty(&mut writer, self.cycle)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write<W: Write>(&self, format: ExportFormat, writer: W, total_weeks: u32) -> ExportResult<()> {
        match format {
            ExportFormat::Rows => self.write_rows(writer, total_weeks).map(|_| ()),
            ExportFormat::Pivot => self.write_pivot(writer, total_weeks).map(|_| ()),
            ExportFormat::Xlsx => self.write_xlsx(writer, total_weeks).map(|_| ()),
            ExportFormat::Json => self.write_json(writer),
        }
    }

    /// 写出到文件
    ///
    /// # 参数
    /// - total_weeks: 展开的总周数（JSON 忽略此参数）
    pub fn export_to_path(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
        total_weeks: u32,
    ) -> ExportResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ExportError::FileCreate {
            path: path.display().to_string(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        self.write(format, &mut out, total_weeks)?;
        out.flush()?;

        info!(
            path = %path.display(),
            format = %format,
            total_weeks,
            cycle_weeks = self.cycle.cycle_weeks,
            "班表导出完成"
        );
        Ok(())
    }
}

fn xlsx_col(index: usize) -> ExportResult<u16> {
    u16::try_from(index).map_err(|_| ExportError::SheetTooLarge {
        rows: 1,
        columns: index + 1,
    })
}
