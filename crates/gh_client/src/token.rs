use tracing::warn;

const RECOGNIZED_PREFIXES: &[&str] = &["ghp_", "github_pat_", "gho_", "ghs_", "ghu_"];

pub fn has_recognized_prefix(token: &str) -> bool {
    RECOGNIZED_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

/// Defensive validation only: an unrecognized prefix warns but the
/// credential is still attached and the request still goes out.
pub fn validate_token(token: &str) {
    if !has_recognized_prefix(token) {
        warn!("GitHub token does not match any recognized prefix; using it as-is");
    }
}
