pub mod classify;
pub mod leaderboard;
pub mod reduce;

pub use classify::{classify_author, is_automation, AuthorKind};
pub use leaderboard::{
    merge_leaderboard, review_leaderboard, MergeLeaderboardEntry, ReviewLeaderboardEntry,
    DEFAULT_LEADERBOARD_SIZE,
};
pub use reduce::{DailyCounts, HackathonStats, Participant, RepoStat, StatsReducer};
