use futures::future::{try_join_all, BoxFuture};
use std::sync::Arc;

use crate::{
    cache::{CacheKey, CachedValue, ResponseCache},
    cached,
    error::{AppError, AppResult},
    models::{
        dedup_items, CombinedResults, DetailsRecord, MediaItem, MediaType, SearchEntry,
        SearchOptions, SeasonDetails,
    },
    services::providers::{MetadataProvider, TrendingWindow},
};

const DEFAULT_RELATED_LIMIT: usize = 6;
const MAX_RELATED_LIMIT: usize = 20;

/// Lifetimes of the two classes of cached responses, in seconds
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub search: u64,
    pub details: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            search: 300,
            details: 1800,
        }
    }
}

/// Single entry point to the metadata provider
///
/// Fans out to the provider, merges what comes back and caches search results
/// and detail records. Fan-outs are all-or-nothing: if any upstream call fails
/// the whole operation fails.
pub struct MetadataGateway {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<ResponseCache>,
    ttls: CacheTtls,
}

impl MetadataGateway {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        cache: Arc<ResponseCache>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            provider,
            cache,
            ttls,
        }
    }

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    /// Searches titles, optionally blending in trending titles and people's known-for titles
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> AppResult<Arc<CombinedResults>> {
        let key = CacheKey::Search {
            query: query.to_string(),
            options,
        };

        cached!(self.cache, key, self.ttls.search, CachedValue::Search, async {
            let mut calls: Vec<BoxFuture<'_, AppResult<Vec<SearchEntry>>>> =
                vec![self.provider.search_multi(query)];
            if options.include_trending {
                calls.push(self.provider.trending(TrendingWindow::Week));
            }
            if options.search_person {
                calls.push(self.provider.search_person(query));
            }

            let batches = try_join_all(calls).await?;
            let combined = CombinedResults::merge(batches);

            tracing::info!(
                query = %query,
                include_trending = options.include_trending,
                search_person = options.search_person,
                results = combined.results.len(),
                provider = self.provider.name(),
                "Search fan-out completed"
            );

            Ok::<_, AppError>(combined)
        })
    }

    /// Fetches a title's details together with its credits
    pub async fn get_details(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> AppResult<Arc<DetailsRecord>> {
        let key = CacheKey::Details {
            media_type,
            id: id.to_string(),
        };

        cached!(self.cache, key, self.ttls.details, CachedValue::Details, async {
            let (details, credits) = tokio::try_join!(
                self.provider.details(media_type, id),
                self.provider.credits(media_type, id)
            )?;

            tracing::info!(
                id = %id,
                media_type = %media_type,
                cast = credits.cast.len(),
                "Details fetched"
            );

            Ok::<_, AppError>(DetailsRecord { details, credits })
        })
    }

    /// Upcoming releases; always fetched fresh
    pub async fn upcoming(&self) -> AppResult<Vec<MediaItem>> {
        self.provider.upcoming().await
    }

    /// Recommended and similar titles merged, most popular first
    pub async fn related(
        &self,
        media_type: MediaType,
        id: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<MediaItem>> {
        let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT).min(MAX_RELATED_LIMIT);

        let (recommended, similar) = tokio::try_join!(
            self.provider.recommendations(media_type, id),
            self.provider.similar(media_type, id)
        )?;

        let mut related = dedup_items(recommended.into_iter().chain(similar));
        related.sort_by(|a, b| {
            b.popularity
                .unwrap_or(0.0)
                .total_cmp(&a.popularity.unwrap_or(0.0))
        });
        related.truncate(limit);

        Ok(related)
    }

    /// Raw detail payload with videos, credits and similar titles
    pub async fn media_details(
        &self,
        media_type: MediaType,
        id: &str,
    ) -> AppResult<serde_json::Value> {
        self.provider.media_details(media_type, id).await
    }

    pub async fn season_details(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> AppResult<SeasonDetails> {
        self.provider.season_details(series_id, season_number).await
    }

    /// Trending titles as a flat list, for browse rows
    pub async fn trending_titles(&self) -> AppResult<Vec<MediaItem>> {
        let entries = self.provider.trending(TrendingWindow::Week).await?;
        Ok(CombinedResults::merge(vec![entries]).results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::AppError;
    use crate::models::{CastMember, Credits, TitleDetails};
    use crate::services::providers::MockMetadataProvider;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn item(id: &str, media_type: MediaType, popularity: f64) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            media_type,
            release_date: Some("2020-01-01".to_string()),
            vote_average: Some(7.0),
            overview: None,
            popularity: Some(popularity),
        }
    }

    fn mock_provider() -> MockMetadataProvider {
        let mut mock = MockMetadataProvider::new();
        mock.expect_name().return_const("mock");
        mock
    }

    fn gateway(mock: MockMetadataProvider, clock: Arc<ManualClock>) -> MetadataGateway {
        MetadataGateway::new(
            Arc::new(mock),
            Arc::new(ResponseCache::new(clock)),
            CacheTtls::default(),
        )
    }

    #[tokio::test]
    async fn test_search_is_served_from_cache_within_ttl() {
        let clock = Arc::new(ManualClock::default());
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .with(eq("batman"))
            .times(1)
            .returning(|_| Ok(vec![SearchEntry::Title(item("268", MediaType::Movie, 10.0))]));

        let gateway = gateway(mock, clock.clone());

        let first = gateway.search("batman", SearchOptions::default()).await.unwrap();
        clock.advance(Duration::minutes(4));
        let second = gateway.search("batman", SearchOptions::default()).await.unwrap();

        assert_eq!(
            serde_json::to_string(&*first).unwrap(),
            serde_json::to_string(&*second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_search_refetched_after_ttl() {
        let clock = Arc::new(ManualClock::default());
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .times(2)
            .returning(|_| Ok(vec![SearchEntry::Title(item("268", MediaType::Movie, 10.0))]));

        let gateway = gateway(mock, clock.clone());

        gateway.search("batman", SearchOptions::default()).await.unwrap();
        clock.advance(Duration::minutes(5));
        gateway.search("batman", SearchOptions::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_details_outlive_search_ttl_but_not_their_own() {
        let clock = Arc::new(ManualClock::default());
        let mut mock = mock_provider();
        mock.expect_details()
            .with(eq(MediaType::Movie), eq("550"))
            .times(2)
            .returning(|_, _| {
                Ok(TitleDetails {
                    runtime: Some(139),
                    ..TitleDetails::default()
                })
            });
        mock.expect_credits().times(2).returning(|_, _| {
            Ok(Credits {
                cast: vec![CastMember {
                    name: "Brad Pitt".to_string(),
                    character: "Tyler Durden".to_string(),
                }],
            })
        });

        let gateway = gateway(mock, clock.clone());

        let record = gateway.get_details("550", MediaType::Movie).await.unwrap();
        assert_eq!(record.runtime_minutes(), Some(139));
        assert_eq!(record.credits.cast.len(), 1);

        clock.advance(Duration::minutes(6));
        gateway.get_details("550", MediaType::Movie).await.unwrap();

        clock.advance(Duration::minutes(25));
        gateway.get_details("550", MediaType::Movie).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_keeps_movie_and_show_sharing_an_id() {
        let mut mock = mock_provider();
        mock.expect_search_multi().returning(|_| {
            Ok(vec![
                SearchEntry::Title(item("550", MediaType::Movie, 1.0)),
                SearchEntry::Title(item("550", MediaType::Tv, 1.0)),
                SearchEntry::Title(item("550", MediaType::Movie, 1.0)),
            ])
        });

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        let results = gateway.search("fight", SearchOptions::default()).await.unwrap();

        assert_eq!(results.results.len(), 2);
        assert_eq!(results.results[0].media_type, MediaType::Movie);
        assert_eq!(results.results[1].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_person_results_are_flattened() {
        let mut mock = mock_provider();
        mock.expect_search_multi().returning(|_| Ok(vec![]));
        mock.expect_search_person().times(1).returning(|_| {
            Ok(vec![SearchEntry::Person {
                name: "Christian Bale".to_string(),
                known_for: vec![
                    item("155", MediaType::Movie, 1.0),
                    item("272", MediaType::Movie, 1.0),
                ],
            }])
        });

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        let options = SearchOptions {
            include_trending: false,
            search_person: true,
        };
        let results = gateway.search("bale", options).await.unwrap();

        let ids: Vec<&str> = results.results.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["155", "272"]);
    }

    #[tokio::test]
    async fn test_trending_appended_after_search_results() {
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .returning(|_| Ok(vec![SearchEntry::Title(item("1", MediaType::Movie, 1.0))]));
        mock.expect_trending()
            .with(eq(TrendingWindow::Week))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    SearchEntry::Title(item("1", MediaType::Movie, 1.0)),
                    SearchEntry::Title(item("2", MediaType::Tv, 1.0)),
                ])
            });

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        let options = SearchOptions {
            include_trending: true,
            search_person: false,
        };
        let results = gateway.search("anything", options).await.unwrap();

        let keys: Vec<String> = results.results.iter().map(|i| i.key().to_string()).collect();
        assert_eq!(keys, vec!["movie-1", "tv-2"]);
    }

    #[tokio::test]
    async fn test_any_upstream_failure_fails_the_search() {
        let mut mock = mock_provider();
        mock.expect_search_multi()
            .times(2)
            .returning(|_| Ok(vec![SearchEntry::Title(item("1", MediaType::Movie, 1.0))]));
        mock.expect_trending()
            .times(2)
            .returning(|_| Err(AppError::UpstreamUnavailable("status 500".to_string())));

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        let options = SearchOptions {
            include_trending: true,
            search_person: false,
        };

        let result = gateway.search("anything", options).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));

        // Nothing was cached, so the next call goes upstream again
        tokio_test::assert_err!(gateway.search("anything", options).await);
    }

    #[tokio::test]
    async fn test_details_fail_when_credits_fail() {
        let mut mock = mock_provider();
        mock.expect_details()
            .returning(|_, _| Ok(TitleDetails::default()));
        mock.expect_credits()
            .returning(|_, _| Err(AppError::UpstreamUnavailable("timeout".to_string())));

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        tokio_test::assert_err!(gateway.get_details("1399", MediaType::Tv).await);
    }

    #[tokio::test]
    async fn test_related_merges_dedups_and_ranks_by_popularity() {
        let mut mock = mock_provider();
        mock.expect_recommendations()
            .with(eq(MediaType::Movie), eq("550"))
            .returning(|_, _| {
                Ok(vec![
                    item("10", MediaType::Movie, 5.0),
                    item("11", MediaType::Movie, 50.0),
                ])
            });
        mock.expect_similar().returning(|_, _| {
            Ok(vec![
                item("11", MediaType::Movie, 50.0),
                item("12", MediaType::Movie, 20.0),
            ])
        });

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        let related = gateway.related(MediaType::Movie, "550", Some(2)).await.unwrap();

        let ids: Vec<&str> = related.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "12"]);
    }

    #[tokio::test]
    async fn test_upcoming_is_never_cached() {
        let mut mock = mock_provider();
        mock.expect_upcoming()
            .times(2)
            .returning(|| Ok(vec![item("1", MediaType::Movie, 1.0)]));

        let gateway = gateway(mock, Arc::new(ManualClock::default()));
        tokio_test::assert_ok!(gateway.upcoming().await);
        tokio_test::assert_ok!(gateway.upcoming().await);
    }
}
