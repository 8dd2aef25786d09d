//! 本地规则加载器
//! 读取规则文件并交由内核解析器转换为有序规则集，本身不做缓存，何时重新加载由调用方决定

use log::debug;
use rskurogo_engine::{KurogoParser, LoadError, LoadResult, RuleSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct RuleLoader {
    parser: KurogoParser,
}

impl RuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从本地文件加载规则集
    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<RuleSet> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Io(e),
        })?;

        let ruleset = self.parser.parse_from_bytes(&bytes)?;
        debug!("Loaded {} device rules from {}", ruleset.len(), path.display());
        Ok(ruleset)
    }
}
