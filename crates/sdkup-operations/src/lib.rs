mod error;
pub mod operations;
pub mod providers;
mod report;
pub mod traits;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use error::{OperationError, Result};
pub use report::{Stage, StageRecord, StageStatus, WorkflowReport, describe_error};
pub use types::{
    AffectedFile, FileMatch, SuiteOutcome, TestReport, UsageEntry, UsageSummary,
};
