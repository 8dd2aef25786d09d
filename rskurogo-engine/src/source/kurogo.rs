//! Kurogo 设备规则文档解析
//! 文档结构：顶层 devices 数组，每项包含 match / classification / description

use crate::core::{Classification, DeviceRule, MatchFlags, MatchPredicate, RuleSet};
use crate::error::{LoadError, LoadResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始匹配选项
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KurogoOriginalOptions {
    #[serde(rename = "CASE_INSENSITIVE", default)]
    pub case_insensitive: bool,
    #[serde(rename = "DOT_ALL", default)]
    pub dot_all: bool,
}

/// 原始匹配谓词，同一对象内按 regex → partial → prefix → suffix 的顺序取第一个存在的键
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KurogoOriginalMatch {
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub partial: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub options: Option<KurogoOriginalOptions>,
}

/// 原始设备条目
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KurogoOriginalDevice {
    #[serde(rename = "match", default)]
    pub match_rules: Vec<KurogoOriginalMatch>,
    #[serde(default)]
    pub classification: HashMap<String, Classification>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 原始规则文档
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KurogoOriginalRuleSet {
    pub devices: Vec<KurogoOriginalDevice>,
}

/// Kurogo 规则解析器
#[derive(Debug, Clone, Default)]
pub struct KurogoParser;

impl KurogoParser {
    pub fn new() -> Self {
        Self
    }

    /// 从字节解析并转换为有序规则集
    pub fn parse_from_bytes(&self, bytes: &[u8]) -> LoadResult<RuleSet> {
        let original: KurogoOriginalRuleSet = serde_json::from_slice(bytes)?;
        self.convert_original_to_ruleset(original)
    }

    pub fn parse(&self, content: &str) -> LoadResult<RuleSet> {
        self.parse_from_bytes(content.as_bytes())
    }

    /// 原始文档 → 规则集，保持设备顺序
    pub fn convert_original_to_ruleset(&self, original: KurogoOriginalRuleSet) -> LoadResult<RuleSet> {
        let mut devices = Vec::with_capacity(original.devices.len());
        for (index, device) in original.devices.into_iter().enumerate() {
            let predicates = device
                .match_rules
                .into_iter()
                .map(|m| Self::convert_match(m).ok_or_else(|| {
                    LoadError::Malformed(format!(
                        "device #{} has a match entry without regex/partial/prefix/suffix",
                        index
                    ))
                }))
                .collect::<LoadResult<Vec<_>>>()?;

            for predicate in &predicates {
                if let MatchPredicate::Regex { pattern, flags } = predicate {
                    if let Err(e) = Self::check_regex(pattern, *flags) {
                        log::warn!(
                            "Device #{} regex will never match: pattern={} error={}",
                            index,
                            pattern,
                            e
                        );
                    }
                }
            }

            devices.push(DeviceRule {
                predicates,
                classification: device.classification,
                description: device.description,
            });
        }

        log::debug!("Parsed Kurogo ruleset, total devices: {}", devices.len());
        Ok(RuleSet::new(devices))
    }

    /// 解析阶段预检正则，与匹配器使用相同的编译选项
    fn check_regex(pattern: &str, flags: MatchFlags) -> Result<(), regex::Error> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map(|_| ())
    }

    fn convert_match(m: KurogoOriginalMatch) -> Option<MatchPredicate> {
        let opts = m.options.unwrap_or_default();
        let flags = MatchFlags::new(opts.case_insensitive, opts.dot_all);

        if let Some(pattern) = m.regex {
            Some(MatchPredicate::regex(pattern, flags))
        } else if let Some(pattern) = m.partial {
            Some(MatchPredicate::partial(pattern, flags))
        } else if let Some(pattern) = m.prefix {
            Some(MatchPredicate::prefix(pattern, flags))
        } else {
            m.suffix.map(|pattern| MatchPredicate::suffix(pattern, flags))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "devices": [
            {
                "description": "Apple iPhone",
                "match": [
                    {"partial": "iPhone"},
                    {"regex": "ipod", "options": {"CASE_INSENSITIVE": true}}
                ],
                "classification": {
                    "2": {"supports_certificate": true, "pagetype": "webapp", "platform": "ios"}
                }
            },
            {
                "match": [{"suffix": "Nokia", "options": {"DOT_ALL": true}}],
                "classification": {
                    "1": {"supports_certificate": false, "pagetype": "basic", "platform": "symbian"}
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let ruleset = KurogoParser::new().parse(SAMPLE).unwrap();
        assert_eq!(ruleset.len(), 2);

        let first = &ruleset.devices()[0];
        assert_eq!(first.description.as_deref(), Some("Apple iPhone"));
        assert_eq!(first.predicates[0], MatchPredicate::partial("iPhone", MatchFlags::default()));
        assert_eq!(first.predicates[1], MatchPredicate::regex("ipod", MatchFlags::case_insensitive()));
        assert_eq!(first.classification["2"].platform, "ios");

        let second = &ruleset.devices()[1];
        assert_eq!(second.description, None);
        assert_eq!(second.predicates[0], MatchPredicate::suffix("Nokia", MatchFlags::new(false, true)));
    }

    #[test]
    fn test_missing_devices_is_malformed() {
        let err = KurogoParser::new().parse(r#"{"rules": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = KurogoParser::new().parse("{not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_match_without_pattern_is_malformed() {
        let doc = r#"{"devices": [{"match": [{"options": {"CASE_INSENSITIVE": true}}]}]}"#;
        let err = KurogoParser::new().parse(doc).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_unsupported_regex_keeps_device() {
        // 环视在 regex 方言中不可用：文档仍可加载，但该谓词永不命中
        let doc = r#"{"devices": [{"match": [{"regex": "iPhone(?!x)"}, {"partial": "iPad"}],
            "classification": {"2": {"pagetype": "webapp", "platform": "ios"}}}]}"#;
        let ruleset = KurogoParser::new().parse(doc).unwrap();
        assert_eq!(ruleset.len(), 1);
        assert!(KurogoParser::check_regex("iPhone(?!x)", MatchFlags::default()).is_err());

        let rule = &ruleset.devices()[0];
        assert!(!crate::Matcher::rule_matches(rule, "Mozilla/5.0 (iPhone)"));
        assert!(crate::Matcher::rule_matches(rule, "Mozilla/5.0 (iPad)"));
    }

    #[test]
    fn test_empty_devices() {
        let ruleset = KurogoParser::new().parse(r#"{"devices": []}"#).unwrap();
        assert!(ruleset.is_empty());
    }
}
