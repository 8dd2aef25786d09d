// 核心公共结构体（设备规则、匹配谓词、分类结果）
pub mod core;
// 匹配器：单条谓词 / 单条设备规则的匹配判定
pub mod matcher;
// 分类器：按规则顺序首个命中即返回
pub mod classifier;
// 规则源解析（Kurogo deviceData JSON）
pub mod source;
// 内核错误定义
pub mod error;

// 顶层导出常用类型
pub use self::core::{
    Classification, ClassificationResult, DeviceRule, MatchFlags, MatchPredicate, RuleSet,
};
pub use classifier::Classifier;
pub use error::{LoadError, LoadResult};
pub use matcher::Matcher;
pub use source::KurogoParser;
