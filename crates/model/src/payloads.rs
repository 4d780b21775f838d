use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::Window;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRef {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullPayload {
    pub number: i64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub user: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl PullPayload {
    pub fn relevant_by_creation(&self, window: &Window) -> bool {
        window.contains(self.created_at)
    }

    pub fn relevant_by_merge(&self, window: &Window) -> bool {
        self.merged_at.is_some_and(|merged| window.contains(merged))
    }

    /// Created in window or merged in window; anything else is out of scope.
    pub fn is_relevant(&self, window: &Window) -> bool {
        self.relevant_by_creation(window) || self.relevant_by_merge(window)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuePayload {
    pub number: i64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub user: Option<UserRef>,
    /// Present when the issues endpoint is actually describing a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl IssuePayload {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn relevant_by_creation(&self, window: &Window) -> bool {
        window.contains(self.created_at)
    }

    pub fn relevant_by_closure(&self, window: &Window) -> bool {
        self.closed_at.is_some_and(|closed| window.contains(closed))
    }

    pub fn is_relevant(&self, window: &Window) -> bool {
        self.relevant_by_creation(window) || self.relevant_by_closure(window)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewPayload {
    pub id: i64,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    pub user: Option<UserRef>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub pull_request_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoMetadata {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrgRepoPayload {
    pub full_name: String,
}

/// A pull request tagged with the `owner/repo` it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRecord {
    pub repo: String,
    pub pull: PullPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueRecord {
    pub repo: String,
    pub issue: IssuePayload,
}

/// A review tagged with its repository and the pull request it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub repo: String,
    pub pull_number: i64,
    pub pull_title: String,
    #[serde(default)]
    pub pull_url: Option<String>,
    pub review: ReviewPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn window() -> Window {
        Window::new(
            "2025-05-01T00:00:00Z".parse().unwrap(),
            "2025-05-10T23:59:59Z".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn pull_relevance_by_either_criterion() {
        let mut pull: PullPayload = serde_json::from_value(json!({
            "number": 7,
            "title": "Fix pagination",
            "state": "closed",
            "user": {"login": "octocat"},
            "created_at": "2025-04-28T10:00:00Z",
            "updated_at": "2025-05-03T10:00:00Z",
            "merged_at": "2025-05-03T10:00:00Z"
        }))
        .unwrap();
        assert!(!pull.relevant_by_creation(&window()));
        assert!(pull.relevant_by_merge(&window()));
        assert!(pull.is_relevant(&window()));

        pull.merged_at = Some("2025-05-12T00:00:00Z".parse().unwrap());
        assert!(!pull.is_relevant(&window()));
    }

    #[test]
    fn issue_detects_pull_request_marker() {
        let issue: IssuePayload = serde_json::from_value(json!({
            "number": 12,
            "title": "Tracking issue",
            "state": "open",
            "user": {"login": "octocat"},
            "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/12"},
            "created_at": "2025-05-02T00:00:00Z",
            "updated_at": "2025-05-02T00:00:00Z"
        }))
        .unwrap();
        assert!(issue.is_pull_request());
    }

    #[test]
    fn review_tolerates_missing_fields() {
        let review: ReviewPayload = serde_json::from_value(json!({
            "id": 99,
            "user": {"login": "reviewer"}
        }))
        .unwrap();
        assert!(review.submitted_at.is_none());
        assert_eq!(review.state, "");
    }
}
