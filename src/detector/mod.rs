//! 检测模块：本地/远程模式编排
pub mod detector;

// 导出核心接口
pub use self::detector::DeviceDetector;
