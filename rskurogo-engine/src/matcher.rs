//! 设备匹配器
//! 核心职责：
//! 1. 单条谓词对 User-Agent 的匹配判定（正则/包含/前缀/后缀）
//! 2. 单条设备规则的匹配判定（谓词间逻辑或，首个命中短路）
//! 3. 正则懒编译 + 全局缓存，非法正则一律视为不匹配

use crate::core::{DeviceRule, MatchFlags, MatchPredicate};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// 全局正则缓存类型定义
/// Key: (正则模式字符串, 是否忽略大小写, 是否 dot_all)
/// Value: 编译结果（None 表示编译失败，后续直接判定不匹配）
type RegexCacheKey = (String, bool, bool);
static REGEX_CACHE: Lazy<RwLock<FxHashMap<RegexCacheKey, Option<Arc<Regex>>>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

/// 无状态匹配器
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    /// 单条谓词匹配
    pub fn matches(predicate: &MatchPredicate, user_agent: &str) -> bool {
        match predicate {
            MatchPredicate::Regex { pattern, flags } => Self::regex_match(pattern, *flags, user_agent),
            MatchPredicate::Partial { pattern, flags } => {
                Self::compare(user_agent, pattern, *flags, |ua, p| ua.contains(p))
            }
            MatchPredicate::Prefix { pattern, flags } => {
                Self::compare(user_agent, pattern, *flags, |ua, p| ua.starts_with(p))
            }
            MatchPredicate::Suffix { pattern, flags } => {
                Self::compare(user_agent, pattern, *flags, |ua, p| ua.ends_with(p))
            }
        }
    }

    /// 设备规则匹配：任一谓词命中即命中，空谓词列表永不命中
    pub fn rule_matches(rule: &DeviceRule, user_agent: &str) -> bool {
        rule.predicates.iter().any(|p| Self::matches(p, user_agent))
    }

    #[inline]
    fn compare(user_agent: &str, pattern: &str, flags: MatchFlags, op: fn(&str, &str) -> bool) -> bool {
        if flags.case_insensitive {
            op(&user_agent.to_lowercase(), &pattern.to_lowercase())
        } else {
            op(user_agent, pattern)
        }
    }

    fn regex_match(pattern: &str, flags: MatchFlags, user_agent: &str) -> bool {
        match Self::compiled_regex(pattern, flags) {
            Some(re) => re.is_match(user_agent),
            None => false,
        }
    }

    /// 获取编译后的正则（懒加载+全局缓存）
    /// 读锁查缓存 → 未命中则写锁编译并缓存；锁中毒时沿用内部数据
    fn compiled_regex(pattern: &str, flags: MatchFlags) -> Option<Arc<Regex>> {
        let cache_key = (pattern.to_string(), flags.case_insensitive, flags.dot_all);

        {
            let cache_read = REGEX_CACHE.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache_read.get(&cache_key) {
                return entry.clone();
            }
        }

        let mut cache_write = REGEX_CACHE.write().unwrap_or_else(|e| e.into_inner());
        cache_write
            .entry(cache_key)
            .or_insert_with(|| Self::compile_regex(pattern, flags))
            .clone()
    }

    fn compile_regex(pattern: &str, flags: MatchFlags) -> Option<Arc<Regex>> {
        RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|e| {
                log::warn!("Regex compilation failed: pattern={} error={}", pattern, e);
            })
            .ok()
            .map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

    #[test]
    fn test_partial_case_sensitivity() {
        assert!(Matcher::matches(&MatchPredicate::partial("iPhone", MatchFlags::default()), IPHONE_UA));
        assert!(!Matcher::matches(&MatchPredicate::partial("iphone", MatchFlags::default()), IPHONE_UA));
        assert!(Matcher::matches(
            &MatchPredicate::partial("IPHONE", MatchFlags::case_insensitive()),
            IPHONE_UA
        ));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(Matcher::matches(&MatchPredicate::prefix("Mozilla/5.0", MatchFlags::default()), IPHONE_UA));
        assert!(!Matcher::matches(&MatchPredicate::prefix("Opera", MatchFlags::default()), IPHONE_UA));
        assert!(Matcher::matches(&MatchPredicate::suffix("15E148", MatchFlags::default()), IPHONE_UA));
        assert!(Matcher::matches(
            &MatchPredicate::suffix("mobile/15e148", MatchFlags::case_insensitive()),
            IPHONE_UA
        ));
        // 后缀谓词只比较自身的模式串，不会退化为包含匹配
        assert!(!Matcher::matches(&MatchPredicate::suffix("iPhone", MatchFlags::default()), IPHONE_UA));
    }

    #[test]
    fn test_regex_flags() {
        assert!(Matcher::matches(
            &MatchPredicate::regex(r"iPhone OS \d+_\d+", MatchFlags::default()),
            IPHONE_UA
        ));
        assert!(!Matcher::matches(
            &MatchPredicate::regex(r"iphone os", MatchFlags::default()),
            IPHONE_UA
        ));
        assert!(Matcher::matches(
            &MatchPredicate::regex(r"iphone os", MatchFlags::case_insensitive()),
            IPHONE_UA
        ));

        // dot_all：. 可跨越换行
        let multiline = "Agent\nNokia";
        assert!(!Matcher::matches(&MatchPredicate::regex("Agent.Nokia", MatchFlags::default()), multiline));
        assert!(Matcher::matches(
            &MatchPredicate::regex("Agent.Nokia", MatchFlags::new(false, true)),
            multiline
        ));
    }

    #[test]
    fn test_malformed_regex_fails_closed() {
        let bad = MatchPredicate::regex("(unclosed", MatchFlags::default());
        assert!(!Matcher::matches(&bad, IPHONE_UA));
        // 第二次命中缓存中的失败记录，结果不变
        assert!(!Matcher::matches(&bad, "(unclosed"));
    }

    #[test]
    fn test_rule_matches_any_predicate() {
        let rule = DeviceRule::new(vec![
            MatchPredicate::partial("Android", MatchFlags::default()),
            MatchPredicate::partial("iPhone", MatchFlags::default()),
        ]);
        assert!(Matcher::rule_matches(&rule, IPHONE_UA));
        assert!(!Matcher::rule_matches(&rule, "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"));
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rule = DeviceRule::new(Vec::new());
        assert!(!Matcher::rule_matches(&rule, IPHONE_UA));
        assert!(!Matcher::rule_matches(&rule, ""));
    }
}
