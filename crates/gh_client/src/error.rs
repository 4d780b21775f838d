use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl GithubApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            GithubApiError::Http { status, .. } => status,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            GithubApiError::Http { endpoint, .. } => endpoint.as_str(),
        }
    }

    /// 403 is how the REST API signals an exhausted rate limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self.status_code(),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        )
    }
}
