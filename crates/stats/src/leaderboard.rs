use model::{PullRecord, ReviewRecord};
use serde::Serialize;

use crate::reduce::Participant;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct MergeLeaderboardEntry {
    pub username: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(rename = "url")]
    pub html_url: String,
    #[serde(rename = "mergedCount")]
    pub merged_count: u32,
    #[serde(rename = "pullRequests")]
    pub pulls: Vec<PullRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewLeaderboardEntry {
    pub username: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(rename = "url")]
    pub html_url: String,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    pub reviews: Vec<ReviewRecord>,
}

/// Contributors with at least one window-merged PR, ranked by merged count.
/// The sort is stable, so first-seen order breaks ties.
pub fn merge_leaderboard(participants: &[Participant], limit: usize) -> Vec<MergeLeaderboardEntry> {
    let mut ranked: Vec<&Participant> = participants
        .iter()
        .filter(|participant| participant.merged_count > 0)
        .collect();
    ranked.sort_by(|a, b| b.merged_count.cmp(&a.merged_count));
    ranked
        .into_iter()
        .take(limit)
        .map(|participant| MergeLeaderboardEntry {
            username: participant.username.clone(),
            avatar_url: participant.avatar_url.clone(),
            html_url: participant.html_url.clone(),
            merged_count: participant.merged_count,
            pulls: participant.pulls.clone(),
        })
        .collect()
}

/// Contributors with at least one counted review, ranked by review count.
pub fn review_leaderboard(
    participants: &[Participant],
    limit: usize,
) -> Vec<ReviewLeaderboardEntry> {
    let mut ranked: Vec<&Participant> = participants
        .iter()
        .filter(|participant| participant.review_count > 0)
        .collect();
    ranked.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    ranked
        .into_iter()
        .take(limit)
        .map(|participant| ReviewLeaderboardEntry {
            username: participant.username.clone(),
            avatar_url: participant.avatar_url.clone(),
            html_url: participant.html_url.clone(),
            review_count: participant.review_count,
            reviews: participant.reviews.clone(),
        })
        .collect()
}
