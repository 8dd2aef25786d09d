//! rskurogo - Kurogo 设备检测：User-Agent → 移动设备分类
//! 支持本地规则文件匹配与远程分类接口两种模式，远程结果可缓存到磁盘

// 声明所有子模块
pub mod cache;
pub mod config;
pub mod detector;
pub mod error;
pub mod remote;
pub mod rule;

// 导出全局错误类型
pub use self::error::{ConfigError, LoadError, NetworkError, RskResult, RskurogoError};

// 导出配置模块核心结构体与构建器
pub use self::config::{CustomConfigBuilder, DetectOptions, DetectionMode, Endpoints};

// 导出缓存模块核心接口
pub use self::cache::{CacheEntry, CacheStore, Fingerprint};

// 导出远程客户端
pub use self::remote::{HttpRemoteClient, RemoteClient};

// 导出规则模块核心接口
pub use self::rule::RuleLoader;

// 导出检测器
pub use self::detector::DeviceDetector;

// 导出内核数据结构
pub use rskurogo_engine::{
    Classification, ClassificationResult, Classifier, DeviceRule, MatchFlags, MatchPredicate,
    Matcher, RuleSet,
};
