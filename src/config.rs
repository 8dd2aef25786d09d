//! 检测配置管理，存储所有可配置项
//! 选项名与 Kurogo 原有配置保持一致，可直接从 JSON 配置文件反序列化

use http::header::{HeaderMap, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, RskResult};

pub const DEFAULT_API_VERSION: &str = "2";
/// 默认缓存有效期（分钟）
pub const DEFAULT_CACHE_EXPIRE_MIN: u64 = 7200;
/// 默认HTTP超时（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const TEST_URL: &str = "https://modolabs-device-test.appspot.com/api/";
const PRODUCTION_URL: &str = "https://modolabs-device.appspot.com/api/";

/// 检测模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// 本地规则文件匹配
    Local,
    /// 远程分类接口
    #[default]
    Remote,
}

impl FromStr for DetectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::InvalidDetectionMode(other.to_string())),
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// 远程接口地址（测试 / 生产）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub test: String,
    pub production: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            test: TEST_URL.to_string(),
            production: PRODUCTION_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// 按测试标志选择接口地址
    pub fn select(&self, test: bool) -> &str {
        if test {
            &self.test
        } else {
            &self.production
        }
    }
}

/// 检测选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    /// 待分类的 User-Agent；None 时为空串
    pub user_agent: Option<String>,
    pub api_version: String,
    /// 使用测试接口
    pub test: bool,
    /// 磁盘缓存目录，None 表示不启用
    pub caching: Option<PathBuf>,
    pub cache_expire_min: u64,
    pub detection_mode: DetectionMode,
    /// 本地模式下的规则文件
    pub local_device_file: Option<PathBuf>,
    pub http_timeout_secs: u64,
    /// 跳过远程接口的证书校验，默认校验
    pub accept_invalid_certs: bool,
    pub endpoints: Endpoints,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            test: false,
            caching: None,
            cache_expire_min: DEFAULT_CACHE_EXPIRE_MIN,
            detection_mode: DetectionMode::default(),
            local_device_file: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            accept_invalid_certs: false,
            endpoints: Endpoints::default(),
        }
    }
}

impl DetectOptions {
    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }

    /// 从 JSON 配置文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> RskResult<Self> {
        let content = std::fs::read(path.as_ref())?;
        Self::from_json_slice(&content)
    }

    pub fn from_json_slice(bytes: &[u8]) -> RskResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// 未显式指定 User-Agent 时，取入站请求头中的值作为默认
    pub fn user_agent_from_headers(mut self, headers: &HeaderMap) -> Self {
        if self.user_agent.is_none() {
            self.user_agent = headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
        }
        self
    }
}

/// 配置构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: DetectOptions,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = api_version.into();
        self
    }

    pub fn test(mut self, test: bool) -> Self {
        self.config.test = test;
        self
    }

    pub fn caching(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.caching = Some(dir.into());
        self
    }

    pub fn cache_expire_min(mut self, minutes: u64) -> Self {
        self.config.cache_expire_min = minutes;
        self
    }

    pub fn detection_mode(mut self, mode: DetectionMode) -> Self {
        self.config.detection_mode = mode;
        self
    }

    /// 设置本地规则文件，同时切换为本地模式
    pub fn local_device_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.local_device_file = Some(path.into());
        self.config.detection_mode = DetectionMode::Local;
        self
    }

    pub fn http_timeout(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn build(self) -> DetectOptions {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_defaults() {
        let opts = DetectOptions::default();
        assert_eq!(opts.api_version, "2");
        assert!(!opts.test);
        assert_eq!(opts.cache_expire_min, 7200);
        assert_eq!(opts.detection_mode, DetectionMode::Remote);
        assert!(!opts.accept_invalid_certs);
        assert_eq!(opts.endpoints.select(false), PRODUCTION_URL);
        assert_eq!(opts.endpoints.select(true), TEST_URL);
    }

    #[test]
    fn test_detection_mode_from_str() {
        assert_eq!("local".parse::<DetectionMode>().unwrap(), DetectionMode::Local);
        assert_eq!("remote".parse::<DetectionMode>().unwrap(), DetectionMode::Remote);
        assert!(matches!(
            "hybrid".parse::<DetectionMode>(),
            Err(ConfigError::InvalidDetectionMode(_))
        ));
    }

    #[test]
    fn test_from_json_uses_legacy_option_names() {
        let opts = DetectOptions::from_json_slice(
            br#"{"user_agent": "Nokia", "test": true, "caching": "/tmp/kg", "cache_expire_min": 5,
                "detection_mode": "local", "local_device_file": "deviceData.json"}"#,
        )
        .unwrap();
        assert_eq!(opts.user_agent.as_deref(), Some("Nokia"));
        assert!(opts.test);
        assert_eq!(opts.caching, Some(PathBuf::from("/tmp/kg")));
        assert_eq!(opts.cache_expire_min, 5);
        assert_eq!(opts.detection_mode, DetectionMode::Local);
        // 未出现的选项保持默认
        assert_eq!(opts.api_version, "2");
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let err = DetectOptions::from_json_slice(br#"{"detection_mode": "hybrid"}"#).unwrap_err();
        assert!(matches!(err, crate::RskurogoError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_user_agent_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (iPhone)"));

        let opts = DetectOptions::default().user_agent_from_headers(&headers);
        assert_eq!(opts.user_agent.as_deref(), Some("Mozilla/5.0 (iPhone)"));

        // 显式配置优先于请求头
        let opts = DetectOptions::custom()
            .user_agent("explicit")
            .build()
            .user_agent_from_headers(&headers);
        assert_eq!(opts.user_agent.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_builder_local_device_file_switches_mode() {
        let opts = DetectOptions::custom().local_device_file("devices.json").build();
        assert_eq!(opts.detection_mode, DetectionMode::Local);
        assert_eq!(opts.local_device_file, Some(PathBuf::from("devices.json")));
    }
}
