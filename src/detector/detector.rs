//! Device detector facade
//! 设备检测器
//! 核心职责：
//! 1. 持有一次检测会话的配置（User-Agent / API版本 / 测试标志 / 检测模式 / 规则文件）
//! 2. 本地模式：加载规则文件 → 首个命中规则分类
//! 3. 远程模式：查缓存 → 未命中则请求远程接口 → 回写缓存 → 解析结果
//! 4. 影响结果的配置变更前先清除内存缓存

use log::{debug, warn};
use rskurogo_engine::{ClassificationResult, Classifier};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, Fingerprint};
use crate::config::{DetectOptions, DetectionMode, Endpoints};
use crate::error::{ConfigError, RskResult};
use crate::remote::{HttpRemoteClient, RemoteClient};
use crate::rule::RuleLoader;

/// 非移动端的页面类型
const DESKTOP_PAGETYPE: &str = "computer";

/// 设备检测器：一个实例对应一次检测会话，不支持并发修改
pub struct DeviceDetector {
    user_agent: String,
    api_version: String,
    test: bool,
    detection_mode: DetectionMode,
    local_device_file: Option<PathBuf>,
    endpoints: Endpoints,
    cache: CacheStore,
    loader: RuleLoader,
    remote: Arc<dyn RemoteClient>,
}

impl std::fmt::Debug for DeviceDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDetector")
            .field("user_agent", &self.user_agent)
            .field("api_version", &self.api_version)
            .field("test", &self.test)
            .field("detection_mode", &self.detection_mode)
            .field("local_device_file", &self.local_device_file)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DeviceDetector {
    /// 使用默认的 reqwest 远程客户端创建检测器
    pub fn new(options: DetectOptions) -> RskResult<Self> {
        let remote = HttpRemoteClient::from_options(&options)?;
        Self::with_remote_client(options, Arc::new(remote))
    }

    /// 使用自定义远程客户端创建检测器
    /// 缓存目录不可用时静默禁用磁盘缓存；本地模式缺少规则文件或规则文件不可读时报错
    pub fn with_remote_client(
        options: DetectOptions,
        remote: Arc<dyn RemoteClient>,
    ) -> RskResult<Self> {
        let mut cache = CacheStore::new(minutes(options.cache_expire_min));
        if let Some(dir) = &options.caching {
            cache.enable_disk(dir);
        }

        if let Some(path) = &options.local_device_file {
            if !is_readable_file(path) {
                return Err(ConfigError::UnreadableDeviceFile(path.clone()).into());
            }
        } else if options.detection_mode == DetectionMode::Local {
            return Err(ConfigError::MissingDeviceFile.into());
        }

        Ok(Self {
            user_agent: options.user_agent.unwrap_or_default(),
            api_version: options.api_version,
            test: options.test,
            detection_mode: options.detection_mode,
            local_device_file: options.local_device_file,
            endpoints: options.endpoints,
            cache,
            loader: RuleLoader::new(),
            remote,
        })
    }

    // ===== Getters =====

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn test_mode(&self) -> bool {
        self.test
    }

    pub fn detection_mode(&self) -> DetectionMode {
        self.detection_mode
    }

    pub fn local_device_file(&self) -> Option<&Path> {
        self.local_device_file.as_deref()
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache.disk_dir()
    }

    pub fn cache_lifetime(&self) -> Duration {
        self.cache.ttl()
    }

    // ===== Setters：影响结果的配置变更先清除内存缓存 =====

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.cache.invalidate();
        self.user_agent = user_agent.into();
    }

    pub fn set_api_version(&mut self, api_version: impl Into<String>) {
        self.cache.invalidate();
        self.api_version = api_version.into();
    }

    pub fn set_test_mode(&mut self, test: bool) {
        self.cache.invalidate();
        self.test = test;
    }

    /// 设置检测模式（local / remote），非法值或未配置规则文件时切换到 local 返回 false 并保留原配置
    pub fn set_detection_mode(&mut self, mode: &str) -> bool {
        match mode.parse::<DetectionMode>() {
            Ok(DetectionMode::Local) if self.local_device_file.is_none() => {
                warn!("{}", ConfigError::MissingDeviceFile);
                false
            }
            Ok(mode) => {
                self.cache.invalidate();
                self.detection_mode = mode;
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// 设置本地规则文件，文件不可读时返回 false 并保留原配置
    pub fn set_local_device_file(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !is_readable_file(&path) {
            warn!("{}", ConfigError::UnreadableDeviceFile(path));
            return false;
        }
        self.cache.invalidate();
        self.local_device_file = Some(path);
        true
    }

    /// 启用（Some）或关闭（None）磁盘缓存，目录不可用时返回 false
    pub fn set_cache_dir(&mut self, dir: Option<PathBuf>) -> bool {
        match dir {
            Some(dir) => self.cache.enable_disk(dir),
            None => {
                self.cache.disable_disk();
                true
            }
        }
    }

    pub fn set_cache_lifetime(&mut self, cache_expire_min: u64) {
        self.cache.set_ttl(minutes(cache_expire_min));
    }

    // ===== Detection =====

    /// 对当前 User-Agent 分类
    /// 远程模式下网络错误直接返回，不会回退到本地模式；本地规则加载失败时返回 Ok(None)
    pub async fn detect(&mut self) -> RskResult<Option<ClassificationResult>> {
        match self.detection_mode {
            DetectionMode::Remote => self.detect_remote().await,
            DetectionMode::Local => Ok(self.detect_local()),
        }
    }

    /// 是否为移动设备：有分类结果且页面类型不是 computer
    pub async fn is_mobile(&mut self) -> RskResult<bool> {
        Ok(self
            .detect()
            .await?
            .is_some_and(|c| c.pagetype != DESKTOP_PAGETYPE))
    }

    async fn detect_remote(&mut self) -> RskResult<Option<ClassificationResult>> {
        let fingerprint = Fingerprint::new(&self.user_agent, &self.api_version);

        let payload = match self.cache.get(&fingerprint) {
            Some(bytes) => bytes,
            None => {
                let endpoint = self.endpoints.select(self.test);
                let bytes = self
                    .remote
                    .fetch(endpoint, &self.user_agent, &self.api_version)
                    .await?;
                debug!("Remote classification fetched, {} bytes", bytes.len());
                self.cache.put(&fingerprint, bytes.clone());
                bytes
            }
        };

        Ok(serde_json::from_slice(&payload)?)
    }

    fn detect_local(&self) -> Option<ClassificationResult> {
        let Some(path) = &self.local_device_file else {
            warn!("Local detection requested without a device file");
            return None;
        };

        let ruleset = self
            .loader
            .load(path)
            .map_err(|e| warn!("Local ruleset unavailable: {}", e))
            .ok()?;
        Classifier::classify(&ruleset, &self.user_agent, &self.api_version)
    }
}

fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
