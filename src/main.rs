// ==========================================
// 轮班排班系统 - 命令行入口
// ==========================================
// 用法:
//   shift-roster --config roster.json --start 2025-01-06 --out schedule.csv
// 退出码: 0 成功 / 1 配置或导出错误 / 2 未找到可行周期
// ==========================================

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Weekday};
use clap::Parser;
use shift_roster::engine::{AdjustPolicy, EngineError, LadderOrder};
use shift_roster::{
    load_config, logging, DayStatus, ExportFormat, RosterExporter, RosterOrchestrator, MAX_CYCLE_WEEKS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "shift-roster")]
#[command(version)]
#[command(about = "按班组生成可循环的周期班表并导出", long_about = None)]
struct Cli {
    /// JSON 配置文件
    #[arg(long)]
    config: PathBuf,

    /// 起始日期（YYYY-MM-DD，建议为周一）
    #[arg(long)]
    start: NaiveDate,

    /// 显式周期周数（须为基础周期的整数倍）
    #[arg(long)]
    weeks: Option<u32>,

    /// 导出时展开的总周数（默认等于周期周数）
    #[arg(long)]
    emit_weeks: Option<u32>,

    /// 自动调整的周期周数上限
    #[arg(long, default_value_t = MAX_CYCLE_WEEKS)]
    max_weeks: u32,

    /// 松弛阶梯顺序: relax-first / grow-first
    #[arg(long, default_value_t = LadderOrder::RelaxThenGrow)]
    ladder: LadderOrder,

    /// 导出格式: rows / pivot / xlsx / json（默认按扩展名推断）
    #[arg(long)]
    format: Option<ExportFormat>,

    /// 输出文件
    #[arg(long)]
    out: PathBuf,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    info!(version = shift_roster::VERSION, "{}", shift_roster::APP_NAME);

    if cli.start.weekday() != Weekday::Mon {
        warn!(start = %cli.start, weekday = ?cli.start.weekday(), "起始日期不是周一，每周将从周中开始");
    }

    let loaded = match load_config(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("配置错误: {}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let mut input = loaded.into_input(cli.start);
    if let Some(weeks) = cli.weeks {
        input = input.with_weeks(weeks);
    }

    let policy = AdjustPolicy::default()
        .with_order(cli.ladder)
        .with_max_cycle_weeks(cli.max_weeks);

    let outcome = match RosterOrchestrator::with_policy(policy).run(&input) {
        Ok(outcome) => outcome,
        Err(EngineError::Configuration(msg)) => {
            eprintln!("配置错误: {}", msg);
            return Ok(ExitCode::from(1));
        }
        Err(EngineError::ExhaustedCeiling(report)) => {
            eprintln!("{}", report);
            eprintln!("建议:");
            for hint in report.hints() {
                eprintln!("  - {}", hint);
            }
            return Ok(ExitCode::from(2));
        }
    };

    println!(
        "周期长度: {} 周（规则等级 {}，共尝试 {} 次）",
        outcome.cycle.cycle_weeks,
        outcome.cycle.level,
        outcome.attempts.len()
    );
    for p in &outcome.hours.people {
        let (working, nights) = outcome
            .cycle
            .ledger(&p.person)
            .map(|l| (l.working_days(), l.count(DayStatus::Night)))
            .unwrap_or_default();
        println!(
            "  {} [{}]: 平均 {:.2} 小时/周，上班 {} 天（夜班 {} 天）",
            p.person, p.group, p.average, working, nights
        );
    }

    let format = cli
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&cli.out));
    let total_weeks = cli.emit_weeks.unwrap_or(outcome.cycle.cycle_weeks);
    RosterExporter::new(&outcome.cycle, &input.groups)
        .export_to_path(&cli.out, format, total_weeks)
        .with_context(|| format!("导出到 {} 失败", cli.out.display()))?;

    println!("班表已写入 {}", cli.out.display());
    Ok(ExitCode::SUCCESS)
}
