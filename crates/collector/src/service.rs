use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::config::{CollectorConfig, HackathonConfig};
use futures::future::join_all;
use gh_client::GithubClient;
use model::{IssueRecord, PullRecord, RepoMetadata, ReviewRecord, Window};
use serde::Serialize;
use stats::{
    merge_leaderboard, review_leaderboard, HackathonStats, MergeLeaderboardEntry,
    ReviewLeaderboardEntry, StatsReducer,
};
use tracing::{info, warn};

use crate::fetcher::{
    fetch_issues, fetch_org_repos, fetch_pull_requests, fetch_reviews_for_pull, split_repo_path,
};

/// Everything fetched for one aggregation run, across all repositories.
#[derive(Debug, Default)]
pub struct ActivitySet {
    pub pulls: Vec<PullRecord>,
    pub issues: Vec<IssueRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub repo_metadata: Vec<RepoMetadata>,
}

/// Aggregates plus display-ready leaderboards for one run.
#[derive(Debug, Serialize)]
pub struct Aggregate {
    #[serde(flatten)]
    pub stats: HackathonStats,
    pub leaderboard: Vec<MergeLeaderboardEntry>,
    #[serde(rename = "reviewLeaderboard")]
    pub review_leaderboard: Vec<ReviewLeaderboardEntry>,
    #[serde(rename = "repoData")]
    pub repo_data: Vec<RepoMetadata>,
}

#[derive(Debug, Serialize)]
pub struct HackathonSnapshot {
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
    pub slug: String,
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    pub repositories: Vec<String>,
    pub stats: Aggregate,
}

struct RepoActivity {
    pulls: Vec<PullRecord>,
    issues: Vec<IssueRecord>,
    reviews: Vec<ReviewRecord>,
    metadata: Option<RepoMetadata>,
}

pub struct Collector {
    client: Arc<dyn GithubClient>,
    config: CollectorConfig,
}

impl Collector {
    pub fn new(client: Arc<dyn GithubClient>, config: CollectorConfig) -> Self {
        Self { client, config }
    }

    /// Merge the explicit repository list with an organization's public
    /// repositories, first-mentioned first, deduplicated. An org listing
    /// failure falls back to the explicit list.
    pub async fn resolve_repositories(
        &self,
        explicit: &[String],
        organization: Option<&str>,
    ) -> Vec<String> {
        let mut repositories: Vec<String> = Vec::new();
        for repo in explicit {
            if !repositories.contains(repo) {
                repositories.push(repo.clone());
            }
        }
        if let Some(org) = organization {
            match fetch_org_repos(
                self.client.as_ref(),
                org,
                self.config.page_size,
                self.config.max_pages,
            )
            .await
            {
                Ok(org_repos) => {
                    for repo in org_repos {
                        if !repositories.contains(&repo) {
                            repositories.push(repo);
                        }
                    }
                }
                Err(err) => {
                    warn!(org, error = %err, "org repo listing failed; using explicit list only");
                }
            }
        }
        repositories
    }

    /// Fan the repositories out concurrently and join with settle-all
    /// semantics: a branch that fails contributes nothing and never cancels
    /// its siblings. Within a branch, pull requests are fetched before that
    /// repository's reviews.
    pub async fn collect_activity(&self, repositories: &[String], window: Window) -> ActivitySet {
        let branches = repositories.iter().map(|repo_path| {
            let client = self.client.clone();
            let config = &self.config;
            let repo_path = repo_path.clone();
            async move {
                let Some((owner, repo)) = split_repo_path(&repo_path) else {
                    warn!(repo = %repo_path, "skipping invalid repository path");
                    return None;
                };

                let pulls = fetch_pull_requests(
                    client.as_ref(),
                    owner,
                    repo,
                    &window,
                    config.page_size,
                    config.max_pages,
                )
                .await;

                let mut reviews = Vec::new();
                for pull in &pulls {
                    reviews.extend(
                        fetch_reviews_for_pull(client.as_ref(), pull, config.page_size).await,
                    );
                }

                let issues = fetch_issues(
                    client.as_ref(),
                    owner,
                    repo,
                    &window,
                    config.page_size,
                    config.max_pages,
                )
                .await;

                let metadata = match client.get_repo(owner, repo).await {
                    Ok(value) => match serde_json::from_value::<RepoMetadata>(value) {
                        Ok(metadata) => Some(metadata),
                        Err(err) => {
                            warn!(repo = %repo_path, error = %err, "malformed repository metadata");
                            None
                        }
                    },
                    Err(err) => {
                        warn!(repo = %repo_path, error = %err, "repository metadata fetch failed");
                        None
                    }
                };

                Some(RepoActivity {
                    pulls,
                    issues,
                    reviews,
                    metadata,
                })
            }
        });

        let mut combined = ActivitySet::default();
        for outcome in join_all(branches).await {
            let Some(activity) = outcome else {
                continue;
            };
            combined.pulls.extend(activity.pulls);
            combined.issues.extend(activity.issues);
            combined.reviews.extend(activity.reviews);
            combined.repo_metadata.extend(activity.metadata);
        }
        info!(
            pulls = combined.pulls.len(),
            issues = combined.issues.len(),
            reviews = combined.reviews.len(),
            "collected window activity"
        );
        combined
    }

    /// Full run for one repository set: fetch everything, then reduce. The
    /// reduction starts strictly after every fetch branch has settled.
    pub async fn aggregate(&self, repositories: &[String], window: Window) -> Aggregate {
        let activity = self.collect_activity(repositories, window).await;

        let mut reducer = StatsReducer::new(window, repositories);
        for pull in &activity.pulls {
            reducer.add_pull(pull);
        }
        for review in &activity.reviews {
            reducer.add_review(review);
        }
        for issue in &activity.issues {
            reducer.add_issue(issue);
        }
        let stats = reducer.finish();

        let leaderboard = merge_leaderboard(&stats.participants, self.config.leaderboard_size);
        let reviews = review_leaderboard(&stats.participants, self.config.leaderboard_size);

        Aggregate {
            stats,
            leaderboard,
            review_leaderboard: reviews,
            repo_data: activity.repo_metadata,
        }
    }

    pub async fn run_hackathon(&self, hackathon: &HackathonConfig) -> anyhow::Result<HackathonSnapshot> {
        let window = Window::new(hackathon.start_time, hackathon.end_time)?;
        let repositories = self
            .resolve_repositories(&hackathon.repositories, hackathon.organization.as_deref())
            .await;
        if repositories.is_empty() {
            warn!(slug = %hackathon.slug, "no repositories configured for hackathon");
        }
        info!(
            slug = %hackathon.slug,
            repositories = repositories.len(),
            "aggregating hackathon activity"
        );
        let stats = self.aggregate(&repositories, window).await;
        Ok(HackathonSnapshot {
            last_updated: Utc::now(),
            slug: hackathon.slug.clone(),
            name: hackathon.name.clone(),
            start_time: hackathon.start_time,
            end_time: hackathon.end_time,
            repositories,
            stats,
        })
    }
}
