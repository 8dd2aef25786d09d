use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::predicate::MatchPredicate;
use super::result::ClassificationResult;

/// 单个API版本下的设备分类
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub supports_certificate: bool,
    #[serde(default)]
    pub pagetype: String,
    #[serde(default)]
    pub platform: String,
}

/// 设备规则：加载后不可变，由 RuleSet 独占
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRule {
    /// 有序谓词列表，任一命中即规则命中
    pub predicates: Vec<MatchPredicate>,
    /// API版本 → 分类
    pub classification: HashMap<String, Classification>,
    pub description: Option<String>,
}

impl DeviceRule {
    pub fn new(predicates: Vec<MatchPredicate>) -> Self {
        Self {
            predicates,
            ..Default::default()
        }
    }

    /// 追加某个API版本的分类（链式）
    pub fn with_classification(
        mut self,
        api_version: impl Into<String>,
        classification: Classification,
    ) -> Self {
        self.classification.insert(api_version.into(), classification);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 按API版本投影为分类结果，无该版本条目时返回None
    pub fn project(&self, api_version: &str) -> Option<ClassificationResult> {
        let c = self.classification.get(api_version)?;
        Some(ClassificationResult {
            supports_certificate: c.supports_certificate,
            pagetype: c.pagetype.clone(),
            description: self.description.clone().unwrap_or_default(),
            platform: c.platform.clone(),
        })
    }
}

/// 有序设备规则集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    devices: Vec<DeviceRule>,
}

impl RuleSet {
    pub fn new(devices: Vec<DeviceRule>) -> Self {
        Self { devices }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceRule> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> &[DeviceRule] {
        &self.devices
    }
}

impl From<Vec<DeviceRule>> for RuleSet {
    fn from(devices: Vec<DeviceRule>) -> Self {
        Self::new(devices)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a DeviceRule;
    type IntoIter = std::slice::Iter<'a, DeviceRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchFlags;

    #[test]
    fn test_project_known_version() {
        let rule = DeviceRule::new(vec![MatchPredicate::partial("iPhone", MatchFlags::default())])
            .with_classification(
                "2",
                Classification {
                    supports_certificate: true,
                    pagetype: "webapp".to_string(),
                    platform: "ios".to_string(),
                },
            );

        let result = rule.project("2").unwrap();
        assert!(result.supports_certificate);
        assert_eq!(result.pagetype, "webapp");
        assert_eq!(result.platform, "ios");
        // 无描述时输出空字符串
        assert_eq!(result.description, "");
    }

    #[test]
    fn test_project_unknown_version() {
        let rule = DeviceRule::new(Vec::new())
            .with_classification("1", Classification::default())
            .with_description("legacy");
        assert!(rule.project("2").is_none());
        assert_eq!(rule.project("1").unwrap().description, "legacy");
    }
}
