// Kurogo deviceData.json 规则源
pub mod kurogo;

pub use kurogo::{KurogoOriginalDevice, KurogoOriginalRuleSet, KurogoParser};
