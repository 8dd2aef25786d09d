//! 磁盘缓存条目
//! 以 MessagePack（带字段名）序列化 {cached, data}，缺字段或损坏的条目解码失败

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// 缓存内部错误，只记录日志，不向调用方传播
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache directory unusable: {}", .0.display())]
    Unusable(PathBuf),
    #[error("cache io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache entry encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("cache entry decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// 写入时间（Unix 秒）
    pub cached: u64,
    pub data: Vec<u8>,
}

impl CacheEntry {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            cached: unix_now(),
            data,
        }
    }

    /// now <= cached + ttl 时有效
    pub fn is_valid(&self, now: u64, ttl: Duration) -> bool {
        now <= self.cached.saturating_add(ttl.as_secs())
    }

    pub fn encode(&self) -> Result<Vec<u8>, CacheError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CacheError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
