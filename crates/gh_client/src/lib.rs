pub mod cache;
pub mod client;
pub mod error;
pub mod token;

pub use cache::{CachedPayload, ResponseCache};
pub use client::{GithubClient, RestGithubClient};
pub use error::GithubApiError;
