use serde::Serialize;

/// What a chat message is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Search,
    Details,
    Technical,
    Upcoming,
    Default,
}

/// Keyword rules in priority order; the first rule with a matching keyword wins
pub const RULES: &[(Intent, &[&str])] = &[
    (Intent::Search, &["search", "find", "looking for", "show me"]),
    (Intent::Details, &["about", "tell me more", "what is"]),
    (Intent::Technical, &["help", "problem", "issue", "not working"]),
    (Intent::Upcoming, &["upcoming", "new release", "coming soon"]),
];

impl Intent {
    /// Classifies a message by case-insensitive keyword containment
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Default)
    }
}
