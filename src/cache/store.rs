//! 两级缓存存储
//! 核心职责：
//! 1. 内存槽：当前会话最近一次结果，invalidate 只清这一层
//! 2. 磁盘缓存：每个指纹一个文件，先写临时文件再 rename，读到过期/损坏条目即删除
//! 3. 缓存错误一律降级为未命中，不向调用方传播

use log::{debug, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use super::entry::{unix_now, CacheEntry, CacheError};
use super::fingerprint::Fingerprint;
use crate::config::DEFAULT_CACHE_EXPIRE_MIN;

/// 磁盘缓存目录
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// 打开缓存目录：目录必须已存在且可写（以创建临时文件探测）
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(CacheError::Unusable(dir));
        }
        NamedTempFile::new_in(&dir).map_err(|_| CacheError::Unusable(dir.clone()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 指纹对应的缓存文件路径
    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(fingerprint.as_str())
    }

    /// 读取有效条目；过期或损坏的条目删除后按未命中处理
    pub fn read(&self, fingerprint: &Fingerprint, ttl: Duration) -> Option<Vec<u8>> {
        let path = self.path_for(fingerprint);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cache read failed [{}]: {}", path.display(), e);
                return None;
            }
        };

        let entry = match CacheEntry::decode(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt cache entry [{}] removed: {}", path.display(), e);
                self.remove(fingerprint);
                return None;
            }
        };

        if !entry.is_valid(unix_now(), ttl) {
            debug!("Cache entry expired [{}]", fingerprint);
            self.remove(fingerprint);
            return None;
        }

        Some(entry.data)
    }

    /// 原子写入：同目录临时文件 + rename，并发读者不会看到半写条目
    pub fn write(&self, fingerprint: &Fingerprint, entry: &CacheEntry) -> Result<(), CacheError> {
        let bytes = entry.encode()?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(self.path_for(fingerprint)).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn remove(&self, fingerprint: &Fingerprint) {
        let path = self.path_for(fingerprint);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Cache entry removal failed [{}]: {}", path.display(), e);
            }
        }
    }
}

/// 分类结果缓存
#[derive(Debug, Clone)]
pub struct CacheStore {
    memory: Option<(Fingerprint, Vec<u8>)>,
    disk: Option<DiskCache>,
    ttl: Duration,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_EXPIRE_MIN * 60))
    }
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            memory: None,
            disk: None,
            ttl,
        }
    }

    /// 启用磁盘缓存，目录不可用时保持（或变为）禁用并返回 false
    pub fn enable_disk(&mut self, dir: impl Into<PathBuf>) -> bool {
        match DiskCache::open(dir) {
            Ok(disk) => {
                debug!("Disk cache enabled at {}", disk.dir().display());
                self.disk = Some(disk);
                true
            }
            Err(e) => {
                warn!("Disk cache disabled: {}", e);
                self.disk = None;
                false
            }
        }
    }

    pub fn disable_disk(&mut self) {
        self.disk = None;
    }

    pub fn disk_dir(&self) -> Option<&Path> {
        self.disk.as_ref().map(DiskCache::dir)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// 先查内存槽，再查磁盘；磁盘命中后提升到内存槽
    pub fn get(&mut self, fingerprint: &Fingerprint) -> Option<Vec<u8>> {
        if let Some((fp, data)) = &self.memory {
            if fp == fingerprint {
                debug!("Memory cache hit [{}]", fingerprint);
                return Some(data.clone());
            }
        }

        let data = self.disk.as_ref()?.read(fingerprint, self.ttl)?;
        debug!("Disk cache hit [{}]", fingerprint);
        self.memory = Some((fingerprint.clone(), data.clone()));
        Some(data)
    }

    /// 写入内存槽，启用磁盘缓存时同时落盘；落盘失败只记录日志
    pub fn put(&mut self, fingerprint: &Fingerprint, data: Vec<u8>) {
        if let Some(disk) = &self.disk {
            if let Err(e) = disk.write(fingerprint, &CacheEntry::new(data.clone())) {
                warn!("Cache write failed [{}]: {}", fingerprint, e);
            }
        }
        self.memory = Some((fingerprint.clone(), data));
    }

    /// 仅清除内存槽，磁盘条目保留并在下次读取时按 TTL 校验
    pub fn invalidate(&mut self) {
        self.memory = None;
    }
}
