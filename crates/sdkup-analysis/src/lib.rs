mod classify;
mod fixes;
mod keywords;
mod policy;
mod release;
mod risk;
mod upgrade;

pub use classify::ChangeClassifier;
pub use fixes::{FixSuggestion, FixSuggestions, suggest_fixes};
pub use keywords::{AreaKeywords, ChangeTypeKeywords, ClassifierKeywords};
pub use policy::{MergeDecision, MergeDecisionPolicy, PolicyLabels};
pub use release::{ReleaseAnalysis, ReleaseAnalyzer};
pub use risk::{RiskAssessment, RiskAssessor};
pub use upgrade::{UpgradeAnalysis, UpgradeAnalysisAggregator, upgrade_recommendations};
