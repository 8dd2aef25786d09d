//! 全局错误类型定义
use std::io::Error as IoError;
use std::path::PathBuf;
use thiserror::Error;

pub use rskurogo_engine::LoadError;

/// 配置错误：非法检测模式、规则文件缺失/不可读、缓存目录不可用
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid detection mode: {0} (expected `local` or `remote`)")]
    InvalidDetectionMode(String),
    #[error("Local detection mode requires a device file")]
    MissingDeviceFile,
    #[error("Device file is not readable: {}", .0.display())]
    UnreadableDeviceFile(PathBuf),
    #[error("Cache directory is not usable: {}", .0.display())]
    CacheDirUnusable(PathBuf),
    #[error("Config file parse failed: {0}")]
    Parse(String),
}

/// 远程分类接口错误
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Remote returned status code {0}")]
    Status(u16),
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = e.status() {
            NetworkError::Status(status.as_u16())
        } else {
            NetworkError::Transport(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum RskurogoError {
    #[error("配置错误：{0}")]
    Config(#[from] ConfigError),

    #[error("规则加载失败：{0}")]
    Load(#[from] LoadError),

    #[error("网络相关错误：{0}")]
    Network(#[from] NetworkError),

    #[error("分类结果解析失败：{0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

// 全局Result类型
pub type RskResult<T> = Result<T, RskurogoError>;
