mod changelog;
mod code_update;
mod pull_request;
mod scan;
mod version_check;
mod workflow;

pub use changelog::{ChangelogAnalysisOperation, ReleaseListing, ReleaseSummary};
pub use code_update::{
    AppliedFix, CodeUpdateInput, CodeUpdateOperation, CodeUpdateOutput, ManualReviewItem,
    PackageUpdate, commit_message,
};
pub use pull_request::{
    PullRequestInput, PullRequestOperation, PullRequestOutcome, pull_request_body,
    pull_request_title,
};
pub use scan::{find_affected_files, usage_summary};
pub use version_check::{VersionCheckOperation, VersionCheckOutput};
pub use workflow::{UpdateWorkflow, WorkflowOptions};
