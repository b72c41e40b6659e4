// ==========================================
// 轮班排班系统 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误（均为致命错误）
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置 JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("时间格式错误 (班组 '{group}', 字段 {field}): '{value}'，期望 HH:MM")]
    InvalidTime {
        group: String,
        field: String,
        value: String,
    },

    #[error("配置值无效: {0}")]
    InvalidValue(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
