pub mod payloads;
pub mod window;

pub use payloads::{
    IssuePayload, IssueRecord, OrgRepoPayload, PullPayload, PullRecord, RepoMetadata,
    ReviewPayload, ReviewRecord, UserRef,
};
pub use window::Window;
