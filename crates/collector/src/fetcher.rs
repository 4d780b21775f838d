use anyhow::Result;
use gh_client::{GithubApiError, GithubClient};
use model::{
    IssuePayload, IssueRecord, OrgRepoPayload, PullPayload, PullRecord, ReviewPayload,
    ReviewRecord, Window,
};
use tracing::{debug, warn};

/// Retrieve every pull request relevant to `(owner, repo, window)`.
///
/// Pages are requested in updated-desc order, so once a whole page is older
/// than the window start by both creation and merge timestamp, no later page
/// can contain anything newer and pagination stops. A request failure aborts
/// only this repository's loop and returns whatever was accumulated.
pub async fn fetch_pull_requests(
    client: &dyn GithubClient,
    owner: &str,
    repo: &str,
    window: &Window,
    page_size: u32,
    max_pages: u32,
) -> Vec<PullRecord> {
    let repo_path = format!("{owner}/{repo}");
    let mut collected = Vec::new();

    for page in 1..=max_pages {
        let items = match client.list_pulls(owner, repo, page, page_size).await {
            Ok(items) => items,
            Err(err) => {
                log_fetch_failure(&repo_path, "pulls", &err);
                return collected;
            }
        };
        if items.is_empty() {
            break;
        }
        let page_len = items.len();
        let mut page_entirely_stale = true;

        for value in items {
            let pull: PullPayload = match serde_json::from_value(value) {
                Ok(pull) => pull,
                Err(err) => {
                    warn!(repo = %repo_path, error = %err, "skipping malformed pull request payload");
                    continue;
                }
            };
            let stale_by_creation = pull.created_at < window.start;
            let stale_by_merge = pull.merged_at.map_or(true, |merged| merged < window.start);
            if !(stale_by_creation && stale_by_merge) {
                page_entirely_stale = false;
            }
            if pull.is_relevant(window) {
                collected.push(PullRecord {
                    repo: repo_path.clone(),
                    pull,
                });
            }
        }

        if page_entirely_stale || page_len < page_size as usize {
            break;
        }
    }

    debug!(repo = %repo_path, count = collected.len(), "pull requests in window");
    collected
}

/// Retrieve every issue relevant to `(owner, repo, window)`. The issues
/// endpoint also returns pull requests; items carrying the PR linkage marker
/// are dropped.
pub async fn fetch_issues(
    client: &dyn GithubClient,
    owner: &str,
    repo: &str,
    window: &Window,
    page_size: u32,
    max_pages: u32,
) -> Vec<IssueRecord> {
    let repo_path = format!("{owner}/{repo}");
    let mut collected = Vec::new();

    for page in 1..=max_pages {
        let items = match client.list_issues(owner, repo, page, page_size).await {
            Ok(items) => items,
            Err(err) => {
                log_fetch_failure(&repo_path, "issues", &err);
                return collected;
            }
        };
        if items.is_empty() {
            break;
        }
        let page_len = items.len();
        let mut page_entirely_stale = true;

        for value in items {
            let issue: IssuePayload = match serde_json::from_value(value) {
                Ok(issue) => issue,
                Err(err) => {
                    warn!(repo = %repo_path, error = %err, "skipping malformed issue payload");
                    continue;
                }
            };
            let stale_by_creation = issue.created_at < window.start;
            let stale_by_closure = issue.closed_at.map_or(true, |closed| closed < window.start);
            if !(stale_by_creation && stale_by_closure) {
                page_entirely_stale = false;
            }
            if issue.is_pull_request() {
                continue;
            }
            if issue.is_relevant(window) {
                collected.push(IssueRecord {
                    repo: repo_path.clone(),
                    issue,
                });
            }
        }

        if page_entirely_stale || page_len < page_size as usize {
            break;
        }
    }

    debug!(repo = %repo_path, count = collected.len(), "issues in window");
    collected
}

/// Fetch the complete review list for one pull request, paging until a
/// short page. No date pre-filter and no early termination here; window
/// filtering happens in the reducer. A failure yields an empty list for
/// this PR only.
pub async fn fetch_reviews_for_pull(
    client: &dyn GithubClient,
    record: &PullRecord,
    page_size: u32,
) -> Vec<ReviewRecord> {
    let Some((owner, repo)) = split_repo_path(&record.repo) else {
        return Vec::new();
    };

    let mut reviews = Vec::new();
    let mut page = 1u32;
    loop {
        let values = match client
            .list_reviews(owner, repo, record.pull.number, page, page_size)
            .await
        {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    repo = %record.repo,
                    pull = record.pull.number,
                    error = %err,
                    "review fetch failed; treating as no reviews"
                );
                return Vec::new();
            }
        };
        let page_len = values.len();

        for value in values {
            let review: ReviewPayload = match serde_json::from_value(value) {
                Ok(review) => review,
                Err(err) => {
                    warn!(repo = %record.repo, pull = record.pull.number, error = %err, "skipping malformed review payload");
                    continue;
                }
            };
            reviews.push(ReviewRecord {
                repo: record.repo.clone(),
                pull_number: record.pull.number,
                pull_title: record.pull.title.clone(),
                pull_url: record.pull.html_url.clone(),
                review,
            });
        }

        if page_len < page_size as usize {
            break;
        }
        page += 1;
    }
    reviews
}

/// List an organization's public repositories as `owner/repo` paths. Unlike
/// the per-repository fetches, a failure here is surfaced so the caller can
/// fall back to its explicit list.
pub async fn fetch_org_repos(
    client: &dyn GithubClient,
    org: &str,
    page_size: u32,
    max_pages: u32,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for page in 1..=max_pages {
        let items = client.list_org_repos(org, page, page_size).await?;
        if items.is_empty() {
            break;
        }
        let page_len = items.len();
        for value in items {
            match serde_json::from_value::<OrgRepoPayload>(value) {
                Ok(repo) => names.push(repo.full_name),
                Err(err) => warn!(org, error = %err, "skipping malformed org repo payload"),
            }
        }
        if page_len < page_size as usize {
            break;
        }
    }
    Ok(names)
}

pub fn split_repo_path(repo_path: &str) -> Option<(&str, &str)> {
    let (owner, repo) = repo_path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner, repo))
}

fn log_fetch_failure(repo_path: &str, kind: &str, err: &anyhow::Error) {
    if let Some(api_err) = err.downcast_ref::<GithubApiError>() {
        if api_err.is_rate_limited() {
            warn!(
                repo = %repo_path,
                kind,
                status = %api_err.status_code(),
                "rate limit exhausted; aborting pagination with partial data"
            );
            return;
        }
    }
    warn!(repo = %repo_path, kind, error = %err, "fetch failed; aborting pagination with partial data");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_path_splitting() {
        assert_eq!(split_repo_path("org/repo"), Some(("org", "repo")));
        assert_eq!(split_repo_path("no-slash"), None);
        assert_eq!(split_repo_path("a/b/c"), None);
        assert_eq!(split_repo_path("/repo"), None);
    }
}
