//! 缓存模块：分类结果的两级缓存（内存槽 + 磁盘文件）
pub mod entry;
pub mod fingerprint;
pub mod store;

pub use self::entry::{CacheEntry, CacheError};
pub use self::fingerprint::Fingerprint;
pub use self::store::{CacheStore, DiskCache};
