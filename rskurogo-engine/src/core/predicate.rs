//! 匹配谓词定义
//! 每条谓词恰好携带一种匹配方式（正则/包含/前缀/后缀）

use serde::{Deserialize, Serialize};

/// 匹配选项
/// dot_all 仅对正则谓词生效
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchFlags {
    pub case_insensitive: bool,
    pub dot_all: bool,
}

impl MatchFlags {
    pub fn new(case_insensitive: bool, dot_all: bool) -> Self {
        Self {
            case_insensitive,
            dot_all,
        }
    }

    /// 仅忽略大小写
    pub fn case_insensitive() -> Self {
        Self::new(true, false)
    }
}

/// 单条匹配谓词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchPredicate {
    /// 正则匹配（任意位置命中）
    /// 语法为 `regex` crate 方言：不支持环视（`(?!...)` / `(?<=...)`）与反向引用，
    /// 这类 PCRE 模式编译失败，该谓词永不命中
    Regex { pattern: String, flags: MatchFlags },
    /// 子串包含
    Partial { pattern: String, flags: MatchFlags },
    /// 前缀匹配
    Prefix { pattern: String, flags: MatchFlags },
    /// 后缀匹配
    Suffix { pattern: String, flags: MatchFlags },
}

impl MatchPredicate {
    pub fn regex(pattern: impl Into<String>, flags: MatchFlags) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags,
        }
    }

    pub fn partial(pattern: impl Into<String>, flags: MatchFlags) -> Self {
        Self::Partial {
            pattern: pattern.into(),
            flags,
        }
    }

    pub fn prefix(pattern: impl Into<String>, flags: MatchFlags) -> Self {
        Self::Prefix {
            pattern: pattern.into(),
            flags,
        }
    }

    pub fn suffix(pattern: impl Into<String>, flags: MatchFlags) -> Self {
        Self::Suffix {
            pattern: pattern.into(),
            flags,
        }
    }

    #[inline]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Regex { pattern, .. }
            | Self::Partial { pattern, .. }
            | Self::Prefix { pattern, .. }
            | Self::Suffix { pattern, .. } => pattern,
        }
    }

    #[inline]
    pub fn flags(&self) -> MatchFlags {
        match self {
            Self::Regex { flags, .. }
            | Self::Partial { flags, .. }
            | Self::Prefix { flags, .. }
            | Self::Suffix { flags, .. } => *flags,
        }
    }

    /// 谓词描述（用于日志输出）
    pub fn describe(&self) -> String {
        match self {
            Self::Regex { pattern, .. } => format!("regex: {}", pattern),
            Self::Partial { pattern, .. } => format!("partial: {}", pattern),
            Self::Prefix { pattern, .. } => format!("prefix: {}", pattern),
            Self::Suffix { pattern, .. } => format!("suffix: {}", pattern),
        }
    }
}
