// ==========================================
// 轮班排班系统 - 导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出文件创建失败 ({path}): {source}")]
    FileCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("写入失败: {0}")]
    Write(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX 写入失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("工作表超出范围: {rows} 行 / {columns} 列")]
    SheetTooLarge { rows: usize, columns: usize },

    #[error("无法识别的导出格式: {0}（可选 rows / pivot / xlsx / json）")]
    UnknownFormat(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
