/// How an authoring identity is treated by contributor-facing aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorKind {
    Human,
    /// Platform automation: `[bot]` marker or a bot-suffixed login.
    Bot,
    /// AI-assistant authored: `copilot` in the login or the item title.
    Copilot,
}

pub fn classify_author(login: &str, title: Option<&str>) -> AuthorKind {
    let login_lower = login.to_lowercase();
    if login.contains("[bot]") || login_lower.ends_with("bot") {
        return AuthorKind::Bot;
    }
    if login_lower.contains("copilot")
        || title.is_some_and(|title| title.to_lowercase().contains("copilot"))
    {
        return AuthorKind::Copilot;
    }
    AuthorKind::Human
}

/// Automation identities never surface in contributor aggregates.
pub fn is_automation(login: &str, title: Option<&str>) -> bool {
    classify_author(login, title) != AuthorKind::Human
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_bot_marker() {
        assert_eq!(classify_author("dependabot[bot]", None), AuthorKind::Bot);
        assert_eq!(classify_author("renovate[bot]", None), AuthorKind::Bot);
    }

    #[test]
    fn bot_suffix_is_case_insensitive() {
        assert_eq!(classify_author("buildBot", None), AuthorKind::Bot);
        assert_eq!(classify_author("greenkeeper-bot", None), AuthorKind::Bot);
    }

    #[test]
    fn copilot_in_login_or_title() {
        assert_eq!(classify_author("Copilot", None), AuthorKind::Copilot);
        assert_eq!(
            classify_author("alice", Some("Copilot: refactor parser")),
            AuthorKind::Copilot
        );
    }

    #[test]
    fn ordinary_contributors_pass() {
        assert_eq!(classify_author("octocat", Some("Fix typo")), AuthorKind::Human);
        // "bot" in the middle of a login is not a marker.
        assert_eq!(classify_author("abbott-smith", None), AuthorKind::Human);
    }
}
