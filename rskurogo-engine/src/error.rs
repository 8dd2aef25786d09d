//! rskurogo-engine 内核错误定义
//! 规则集加载失败的统一错误类型，基于thiserror实现
use std::io::Error as IoError;
use std::path::PathBuf;
use thiserror::Error;

/// 规则集加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    /// 规则文件不存在
    #[error("Ruleset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// 规则文档无法解析，或缺少顶层 devices 集合
    #[error("Ruleset malformed: {0}")]
    Malformed(String),

    /// 规则文件存在但读取失败
    #[error("Ruleset read failed: {0}")]
    Io(#[from] IoError),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Malformed(e.to_string())
    }
}

/// 规则加载层Result类型别名
pub type LoadResult<T> = Result<T, LoadError>;
