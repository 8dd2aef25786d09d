//! 设备分类器
//! 按规则集顺序线性扫描，首个命中的规则决定结果（first-match-wins）

use crate::core::{ClassificationResult, RuleSet};
use crate::matcher::Matcher;

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    /// 对 User-Agent 分类
    /// 无规则命中，或首个命中规则缺少该API版本的分类，均返回None，调用方无法区分两者
    pub fn classify(
        ruleset: &RuleSet,
        user_agent: &str,
        api_version: &str,
    ) -> Option<ClassificationResult> {
        let (index, rule) = ruleset
            .iter()
            .enumerate()
            .find(|(_, rule)| Matcher::rule_matches(rule, user_agent))?;

        let result = rule.project(api_version);
        if result.is_none() {
            log::debug!(
                "Device rule #{} matched but has no classification for api version {}",
                index,
                api_version
            );
        }
        result
    }
}
