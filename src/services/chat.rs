use crate::{
    error::{AppError, AppResult},
    models::SearchOptions,
    services::{
        formatter::{self, Reply},
        gateway::MetadataGateway,
        intent::Intent,
    },
};

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Answers one chat message
///
/// Classifies the message, gathers whatever the intent needs from the gateway
/// and renders the reply. Gateway failures propagate; "nothing found" outcomes
/// become ordinary replies.
pub async fn respond(gateway: &MetadataGateway, message: &str) -> AppResult<String> {
    if message.trim().is_empty() {
        return Err(AppError::InvalidRequest(MESSAGE_REQUIRED.to_string()));
    }

    let intent = Intent::classify(message);
    tracing::debug!(intent = ?intent, "Classified chat message");

    let reply = match intent {
        Intent::Search => {
            let results = gateway.search(message, SearchOptions::default()).await?;
            formatter::format(&Reply::Search(&results))
        }
        Intent::Details => {
            let Some(title) = formatter::extract_title(message) else {
                return Ok(formatter::format(&Reply::AskForTitle));
            };

            let results = gateway.search(&title, SearchOptions::default()).await?;
            match results.results.first() {
                Some(item) => {
                    let record = gateway.get_details(&item.id, item.media_type).await?;
                    formatter::format(&Reply::Details {
                        item,
                        record: &record,
                    })
                }
                None => formatter::format(&Reply::TitleNotFound),
            }
        }
        Intent::Technical => formatter::format(&Reply::Technical),
        Intent::Upcoming => {
            let upcoming = gateway.upcoming().await?;
            formatter::format(&Reply::Upcoming(&upcoming))
        }
        Intent::Default => formatter::format(&Reply::Default),
    };

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, ResponseCache};
    use crate::models::{Credits, MediaItem, MediaType, SearchEntry, TitleDetails};
    use crate::services::formatter::{ASK_FOR_TITLE, FOLLOW_UP, TECHNICAL_MENU, TITLE_NOT_FOUND};
    use crate::services::gateway::CacheTtls;
    use crate::services::providers::MockMetadataProvider;
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn gateway(mock: MockMetadataProvider) -> MetadataGateway {
        MetadataGateway::new(
            Arc::new(mock),
            Arc::new(ResponseCache::new(Arc::new(ManualClock::default()))),
            CacheTtls::default(),
        )
    }

    fn mock_provider() -> MockMetadataProvider {
        let mut mock = MockMetadataProvider::new();
        mock.expect_name().return_const("mock");
        mock
    }

    fn show(id: &str, title: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: title.to_string(),
            media_type: MediaType::Tv,
            release_date: Some("2022-02-18".to_string()),
            vote_average: Some(8.4),
            overview: Some("Office workers with split memories.".to_string()),
            popularity: None,
        }
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let gateway = gateway(MockMetadataProvider::new());
        let result = respond(&gateway, "   ").await;
        assert!(matches!(result, Err(AppError::InvalidRequest(msg)) if msg == MESSAGE_REQUIRED));
    }

    #[tokio::test]
    async fn test_technical_makes_no_upstream_call() {
        let gateway = gateway(MockMetadataProvider::new());
        let reply = respond(&gateway, "my video is not working").await.unwrap();
        assert_eq!(reply, format!("{}{}", TECHNICAL_MENU, FOLLOW_UP));
    }

    #[tokio::test]
    async fn test_search_uses_whole_message_as_query() {
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .with(eq("find severance"))
            .times(1)
            .returning(|_| Ok(vec![SearchEntry::Title(show("95396", "Severance"))]));

        let reply = respond(&gateway(mock), "find severance").await.unwrap();
        assert!(reply.contains("📺 TV Show: Severance (2022)"));
    }

    #[tokio::test]
    async fn test_details_without_title_asks_for_one() {
        let gateway = gateway(MockMetadataProvider::new());
        let reply = respond(&gateway, "tell me more").await.unwrap();
        assert_eq!(reply, format!("{}{}", ASK_FOR_TITLE, FOLLOW_UP));
    }

    #[tokio::test]
    async fn test_details_looks_up_top_hit() {
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .with(eq("Severance"))
            .returning(|_| Ok(vec![SearchEntry::Title(show("95396", "Severance"))]));
        mock.expect_details()
            .with(eq(MediaType::Tv), eq("95396"))
            .times(1)
            .returning(|_, _| {
                Ok(TitleDetails {
                    episode_run_time: vec![55],
                    ..TitleDetails::default()
                })
            });
        mock.expect_credits().returning(|_, _| Ok(Credits::default()));

        let reply = respond(&gateway(mock), "what is \"Severance\"").await.unwrap();
        assert!(reply.starts_with("Here's what I found about \"Severance\""));
        assert!(reply.contains("⏱ Runtime: 55 minutes"));
    }

    #[tokio::test]
    async fn test_details_title_not_found() {
        let mut mock = mock_provider();
        mock.expect_search_multi().returning(|_| Ok(vec![]));

        let reply = respond(&gateway(mock), "tell me about \"Nonexistent\"").await.unwrap();
        assert_eq!(reply, format!("{}{}", TITLE_NOT_FOUND, FOLLOW_UP));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mut mock = mock_provider();
        mock.expect_upcoming()
            .returning(|| Err(AppError::UpstreamUnavailable("status 500".to_string())));

        let result = respond(&gateway(mock), "anything coming soon?").await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }
}
