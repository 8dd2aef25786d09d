pub mod predicate;
pub mod result;
pub mod rule;

pub use predicate::{MatchFlags, MatchPredicate};
pub use result::ClassificationResult;
pub use rule::{Classification, DeviceRule, RuleSet};
