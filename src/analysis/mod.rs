//! Rule-based code-quality analysis over building metrics: design-smell
//! classification and the composite health score.

pub mod pattern;
pub mod health;

pub use pattern::{classify, DesignPattern, PatternMatch, PatternRules, Severity};
pub use health::{score, HealthGrade, HealthRules};
