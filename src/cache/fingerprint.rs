use std::fmt;

/// 缓存指纹：(User-Agent, API版本) 的确定性哈希，同时作为磁盘缓存文件名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(user_agent: &str, api_version: &str) -> Self {
        let digest = md5::compute(format!("{}:::{}", user_agent, api_version));
        Self(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_md5_hex() {
        let fp = Fingerprint::new("iPhone", "2");
        assert_eq!(fp.as_str(), "eaffa7ce3caef11b339007d0063662b0");
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, Fingerprint::new("iPhone", "2"));
    }

    #[test]
    fn test_fingerprint_depends_on_version() {
        assert_ne!(Fingerprint::new("iPhone", "1"), Fingerprint::new("iPhone", "2"));
        // 分隔符区分 User-Agent 与版本的边界
        assert_ne!(Fingerprint::new("ab", "c"), Fingerprint::new("a", "bc"));
    }
}
