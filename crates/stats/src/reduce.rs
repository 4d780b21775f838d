use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use model::{IssueRecord, PullRecord, ReviewRecord, UserRef, Window};
use serde::Serialize;

use crate::classify::is_automation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyCounts {
    pub total: u32,
    pub merged: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepoStat {
    pub total: u32,
    pub merged: u32,
    pub issues: u32,
    #[serde(rename = "closedIssues")]
    pub closed_issues: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub username: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(rename = "url")]
    pub html_url: String,
    #[serde(rename = "mergedCount")]
    pub merged_count: u32,
    #[serde(rename = "prCount")]
    pub pr_count: u32,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    #[serde(rename = "pullRequests")]
    pub pulls: Vec<PullRecord>,
    pub reviews: Vec<ReviewRecord>,
}

impl Participant {
    fn new(user: &UserRef) -> Self {
        Self {
            username: user.login.clone(),
            avatar_url: user.avatar_url.clone(),
            html_url: user
                .html_url
                .clone()
                .unwrap_or_else(|| format!("https://github.com/{}", user.login)),
            merged_count: 0,
            pr_count: 0,
            review_count: 0,
            pulls: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HackathonStats {
    #[serde(rename = "totalPRs")]
    pub total_prs: u32,
    #[serde(rename = "mergedPRs")]
    pub merged_prs: u32,
    #[serde(rename = "totalIssues")]
    pub total_issues: u32,
    #[serde(rename = "closedIssues")]
    pub closed_issues: u32,
    #[serde(rename = "participantCount")]
    pub participant_count: usize,
    /// First-seen order; leaderboards rely on this for stable tie-breaks.
    #[serde(skip_serializing)]
    pub participants: Vec<Participant>,
    #[serde(rename = "dailyActivity")]
    pub daily_activity: BTreeMap<NaiveDate, DailyCounts>,
    #[serde(rename = "dailyMergedPRs")]
    pub daily_merged_prs: BTreeMap<NaiveDate, u32>,
    #[serde(rename = "repoStats")]
    pub repo_stats: BTreeMap<String, RepoStat>,
}

/// Folds fetched pull requests, reviews and issues into one shared set of
/// aggregates for a window. All item kinds mutate the same repo-stat map so
/// repository rows merge PR and issue columns.
pub struct StatsReducer {
    window: Window,
    total_prs: u32,
    merged_prs: u32,
    total_issues: u32,
    closed_issues: u32,
    daily: BTreeMap<NaiveDate, DailyCounts>,
    daily_merged_prs: BTreeMap<NaiveDate, u32>,
    repo_stats: BTreeMap<String, RepoStat>,
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl StatsReducer {
    /// The daily map is pre-populated for every date of the window so the
    /// series stays dense even when a day has zero activity; repo stats are
    /// seeded for every configured repository so empty repositories still
    /// get a row.
    pub fn new(window: Window, repositories: &[String]) -> Self {
        let daily = window
            .days()
            .map(|day| (day, DailyCounts::default()))
            .collect();
        let repo_stats = repositories
            .iter()
            .map(|repo| (repo.clone(), RepoStat::default()))
            .collect();
        Self {
            window,
            total_prs: 0,
            merged_prs: 0,
            total_issues: 0,
            closed_issues: 0,
            daily,
            daily_merged_prs: BTreeMap::new(),
            repo_stats,
            participants: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add_pull(&mut self, record: &PullRecord) {
        let pull = &record.pull;
        // Defensive re-filter: the fetcher applies the same predicate, but
        // input is not trusted to have done so.
        if !pull.is_relevant(&self.window) {
            return;
        }

        // Merged-for-this-run requires the merge timestamp itself to land in
        // the window; a PR merged outside it stays non-merged for counting.
        let merged_in_window = pull.relevant_by_merge(&self.window);

        self.total_prs += 1;
        if merged_in_window {
            self.merged_prs += 1;
        }

        let repo_stat = self.repo_stats.entry(record.repo.clone()).or_default();
        repo_stat.total += 1;
        if merged_in_window {
            repo_stat.merged += 1;
        }

        if pull.relevant_by_creation(&self.window) {
            let day = pull.created_at.date_naive();
            if let Some(counts) = self.daily.get_mut(&day) {
                counts.total += 1;
            }
        }
        if merged_in_window {
            if let Some(day) = pull.merged_at.map(|merged| merged.date_naive()) {
                if let Some(counts) = self.daily.get_mut(&day) {
                    counts.merged += 1;
                }
                *self.daily_merged_prs.entry(day).or_default() += 1;
            }
        }

        if let Some(user) = &pull.user {
            if is_automation(&user.login, Some(&pull.title)) {
                return;
            }
            let participant = self.participant_mut(user);
            participant.pr_count += 1;
            // Appended merged or not, for drill-down.
            participant.pulls.push(record.clone());
            if merged_in_window {
                participant.merged_count += 1;
            }
        }
    }

    pub fn add_issue(&mut self, record: &IssueRecord) {
        let repo_stat = self.repo_stats.entry(record.repo.clone()).or_default();
        repo_stat.issues += 1;
        self.total_issues += 1;
        if record.issue.state == "closed" {
            repo_stat.closed_issues += 1;
            self.closed_issues += 1;
        }
    }

    pub fn add_review(&mut self, record: &ReviewRecord) {
        let review = &record.review;
        let Some(user) = &review.user else {
            return;
        };
        if is_automation(&user.login, None) || review.state == "DISMISSED" {
            return;
        }
        // Reviews arrive unfiltered from the fetcher; the window test
        // happens here.
        let Some(submitted_at) = review.submitted_at else {
            return;
        };
        if !self.window.contains(submitted_at) {
            return;
        }

        // A pure reviewer with no merged PRs must still surface.
        let participant = self.participant_mut(user);
        participant.review_count += 1;
        participant.reviews.push(record.clone());
    }

    fn participant_mut(&mut self, user: &UserRef) -> &mut Participant {
        if let Some(&position) = self.index.get(&user.login) {
            return &mut self.participants[position];
        }
        self.index
            .insert(user.login.clone(), self.participants.len());
        self.participants.push(Participant::new(user));
        self.participants.last_mut().expect("just pushed")
    }

    pub fn finish(self) -> HackathonStats {
        HackathonStats {
            total_prs: self.total_prs,
            merged_prs: self.merged_prs,
            total_issues: self.total_issues,
            closed_issues: self.closed_issues,
            participant_count: self.participants.len(),
            participants: self.participants,
            daily_activity: self.daily,
            daily_merged_prs: self.daily_merged_prs,
            repo_stats: self.repo_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use model::{IssuePayload, PullPayload, ReviewPayload};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn window() -> Window {
        Window::new(ts("2025-05-01T00:00:00Z"), ts("2025-05-10T23:59:59Z")).unwrap()
    }

    fn pull(
        login: &str,
        title: &str,
        created: &str,
        merged: Option<&str>,
    ) -> PullRecord {
        PullRecord {
            repo: "org/repo".to_string(),
            pull: PullPayload {
                number: 1,
                title: title.to_string(),
                state: "open".to_string(),
                html_url: None,
                user: Some(UserRef {
                    login: login.to_string(),
                    avatar_url: None,
                    html_url: None,
                }),
                created_at: ts(created),
                updated_at: ts(created),
                merged_at: merged.map(ts),
                closed_at: None,
            },
        }
    }

    fn review(login: &str, state: &str, submitted: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            repo: "org/repo".to_string(),
            pull_number: 1,
            pull_title: "A change".to_string(),
            pull_url: None,
            review: ReviewPayload {
                id: 1,
                state: state.to_string(),
                submitted_at: submitted.map(ts),
                user: Some(UserRef {
                    login: login.to_string(),
                    avatar_url: None,
                    html_url: None,
                }),
                html_url: None,
                pull_request_url: None,
            },
        }
    }

    fn issue(state: &str) -> IssueRecord {
        IssueRecord {
            repo: "org/repo".to_string(),
            issue: IssuePayload {
                number: 5,
                title: "An issue".to_string(),
                state: state.to_string(),
                html_url: None,
                user: None,
                pull_request: None,
                created_at: ts("2025-05-02T00:00:00Z"),
                updated_at: ts("2025-05-02T00:00:00Z"),
                closed_at: None,
            },
        }
    }

    #[test]
    fn daily_series_is_dense_across_the_window() {
        let reducer = StatsReducer::new(window(), &[]);
        let stats = reducer.finish();
        assert_eq!(stats.daily_activity.len(), 10);
        assert!(stats
            .daily_activity
            .values()
            .all(|counts| counts.total == 0 && counts.merged == 0));
    }

    #[test]
    fn pr_outside_window_by_both_criteria_is_skipped() {
        let mut reducer = StatsReducer::new(window(), &[]);
        reducer.add_pull(&pull(
            "alice",
            "Old work",
            "2025-04-20T00:00:00Z",
            Some("2025-05-12T00:00:00Z"),
        ));
        let stats = reducer.finish();
        assert_eq!(stats.total_prs, 0);
        assert!(stats.participants.is_empty());
    }

    #[test]
    fn merged_before_window_counts_total_but_not_merged() {
        let mut reducer = StatsReducer::new(window(), &[]);
        // Created inside, merged after the end: total only, creation bucket
        // only.
        reducer.add_pull(&pull(
            "bob",
            "Late merge",
            "2025-05-05T09:00:00Z",
            Some("2025-05-15T09:00:00Z"),
        ));
        let stats = reducer.finish();
        assert_eq!(stats.total_prs, 1);
        assert_eq!(stats.merged_prs, 0);
        let day = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(stats.daily_activity[&day].total, 1);
        assert_eq!(stats.daily_activity[&day].merged, 0);
        assert_eq!(stats.participants[0].merged_count, 0);
        assert_eq!(stats.participants[0].pr_count, 1);
    }

    #[test]
    fn relevant_by_merge_only_skips_creation_bucket() {
        let mut reducer = StatsReducer::new(window(), &[]);
        // PR A from the worked example: created 04-28, merged 05-03.
        reducer.add_pull(&pull(
            "alice",
            "Early work",
            "2025-04-28T00:00:00Z",
            Some("2025-05-03T12:00:00Z"),
        ));
        // PR B: created 05-05, never merged.
        reducer.add_pull(&pull("bob", "New work", "2025-05-05T08:00:00Z", None));
        let stats = reducer.finish();
        assert_eq!(stats.total_prs, 2);
        assert_eq!(stats.merged_prs, 1);
        let may3 = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let may5 = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(stats.daily_activity[&may3].merged, 1);
        assert_eq!(stats.daily_activity[&may3].total, 0);
        assert_eq!(stats.daily_activity[&may5].total, 1);
        assert_eq!(stats.daily_merged_prs[&may3], 1);
    }

    #[test]
    fn automation_authors_never_become_participants() {
        let mut reducer = StatsReducer::new(window(), &[]);
        reducer.add_pull(&pull(
            "dependabot[bot]",
            "Bump deps",
            "2025-05-02T00:00:00Z",
            Some("2025-05-02T01:00:00Z"),
        ));
        reducer.add_pull(&pull(
            "alice",
            "Copilot generated refactor",
            "2025-05-02T00:00:00Z",
            None,
        ));
        reducer.add_review(&review("copilot", "APPROVED", Some("2025-05-03T00:00:00Z")));
        let stats = reducer.finish();
        // Counted, but not attributed.
        assert_eq!(stats.total_prs, 2);
        assert_eq!(stats.merged_prs, 1);
        assert!(stats.participants.is_empty());
    }

    #[test]
    fn pure_reviewer_gets_a_participant_entry() {
        let mut reducer = StatsReducer::new(window(), &[]);
        reducer.add_review(&review("carol", "APPROVED", Some("2025-05-04T10:00:00Z")));
        let stats = reducer.finish();
        assert_eq!(stats.participants.len(), 1);
        assert_eq!(stats.participants[0].review_count, 1);
        assert_eq!(stats.participants[0].merged_count, 0);
    }

    #[test]
    fn dismissed_and_out_of_window_reviews_dropped() {
        let mut reducer = StatsReducer::new(window(), &[]);
        reducer.add_review(&review("carol", "DISMISSED", Some("2025-05-04T10:00:00Z")));
        reducer.add_review(&review("carol", "APPROVED", Some("2025-05-20T10:00:00Z")));
        reducer.add_review(&review("carol", "APPROVED", None));
        let stats = reducer.finish();
        assert!(stats.participants.is_empty());
    }

    #[test]
    fn issues_merge_into_the_shared_repo_stats() {
        let repos = vec!["org/repo".to_string()];
        let mut reducer = StatsReducer::new(window(), &repos);
        reducer.add_pull(&pull(
            "alice",
            "Feature",
            "2025-05-02T00:00:00Z",
            Some("2025-05-03T00:00:00Z"),
        ));
        reducer.add_issue(&issue("open"));
        reducer.add_issue(&issue("closed"));
        let stats = reducer.finish();
        let row = &stats.repo_stats["org/repo"];
        assert_eq!(row.total, 1);
        assert_eq!(row.merged, 1);
        assert_eq!(row.issues, 2);
        assert_eq!(row.closed_issues, 1);
        assert_eq!(stats.total_issues, 2);
        assert_eq!(stats.closed_issues, 1);
    }

    #[test]
    fn configured_repositories_are_seeded_with_empty_rows() {
        let repos = vec!["org/quiet".to_string()];
        let stats = StatsReducer::new(window(), &repos).finish();
        assert_eq!(stats.repo_stats["org/quiet"], RepoStat::default());
    }
}
