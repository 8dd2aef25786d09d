//! 远程分类接口模块
pub mod client;

pub use self::client::{HttpRemoteClient, RemoteClient};
