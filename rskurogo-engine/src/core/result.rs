//! 分类结果（对外输出结构）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 设备分类结果
/// 远程接口返回的载荷也按此结构宽松解析：缺失字段取默认值，多余字段忽略
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default)]
    pub supports_certificate: bool,
    #[serde(default)]
    pub pagetype: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pagetype, self.platform)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}
