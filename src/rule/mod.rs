//! 规则模块：负责本地设备规则文件的加载
pub mod loader;

// 导出核心接口
pub use self::loader::RuleLoader;
pub use rskurogo_engine::{Classification, DeviceRule, MatchFlags, MatchPredicate, RuleSet};
