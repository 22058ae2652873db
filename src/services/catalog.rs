use serde::Serialize;

use crate::{error::AppResult, models::MediaItem, services::gateway::MetadataGateway};

/// Where a browse row gets its titles from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Trending,
    TopRated,
    Genre(u32),
}

/// One row of the browse page
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogRow {
    pub key: &'static str,
    pub title: &'static str,
    #[serde(skip)]
    pub source: RowSource,
}

pub const ROWS: &[CatalogRow] = &[
    CatalogRow { key: "trending", title: "Trending", source: RowSource::Trending },
    CatalogRow { key: "top-rated", title: "Top Rated", source: RowSource::TopRated },
    CatalogRow { key: "action", title: "Action", source: RowSource::Genre(28) },
    CatalogRow { key: "comedy", title: "Comedy", source: RowSource::Genre(35) },
    CatalogRow { key: "horror", title: "Horror", source: RowSource::Genre(27) },
    CatalogRow { key: "romance", title: "Romance", source: RowSource::Genre(10749) },
    CatalogRow { key: "mystery", title: "Mystery", source: RowSource::Genre(9648) },
    CatalogRow { key: "sci-fi", title: "Sci-Fi", source: RowSource::Genre(878) },
    CatalogRow { key: "western", title: "Western", source: RowSource::Genre(37) },
    CatalogRow { key: "animation", title: "Animation", source: RowSource::Genre(16) },
    CatalogRow { key: "tv-movie", title: "TV Movie", source: RowSource::Genre(10770) },
    CatalogRow { key: "adventure", title: "Adventure", source: RowSource::Genre(12) },
    CatalogRow { key: "fantasy", title: "Fantasy", source: RowSource::Genre(14) },
    CatalogRow { key: "documentary", title: "Documentary", source: RowSource::Genre(99) },
    CatalogRow { key: "crime", title: "Crime", source: RowSource::Genre(80) },
    CatalogRow { key: "family", title: "Family", source: RowSource::Genre(10751) },
    CatalogRow { key: "war", title: "War", source: RowSource::Genre(10752) },
    CatalogRow { key: "music", title: "Music", source: RowSource::Genre(10402) },
    CatalogRow { key: "history", title: "History", source: RowSource::Genre(36) },
];

/// Finds a row by key; unknown keys get the trending row
pub fn row(key: &str) -> &'static CatalogRow {
    ROWS.iter()
        .find(|row| row.key.eq_ignore_ascii_case(key))
        .unwrap_or(&ROWS[0])
}

#[derive(Debug, Serialize)]
pub struct RowContents {
    pub key: &'static str,
    pub title: &'static str,
    pub results: Vec<MediaItem>,
}

/// Loads the titles of one browse row
pub async fn load_row(gateway: &MetadataGateway, key: &str) -> AppResult<RowContents> {
    let row = row(key);
    let results = match row.source {
        RowSource::Trending => gateway.trending_titles().await?,
        RowSource::TopRated => gateway.provider().top_rated().await?,
        RowSource::Genre(genre_id) => gateway.provider().discover(genre_id).await?,
    };

    Ok(RowContents {
        key: row.key,
        title: row.title,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::services::gateway::CacheTtls;
    use crate::services::providers::MockMetadataProvider;
    use mockall::predicate::eq;
    use std::sync::Arc;

    #[test]
    fn test_row_lookup() {
        assert_eq!(row("action").source, RowSource::Genre(28));
        assert_eq!(row("Sci-Fi").source, RowSource::Genre(878));
    }

    #[test]
    fn test_unknown_row_falls_back_to_trending() {
        assert_eq!(row("nope").key, "trending");
    }

    #[test]
    fn test_row_keys_unique() {
        let mut keys: Vec<&str> = ROWS.iter().map(|r| r.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), ROWS.len());
    }

    #[tokio::test]
    async fn test_load_genre_row() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_discover()
            .with(eq(27))
            .times(1)
            .returning(|_| Ok(vec![]));

        let gateway = MetadataGateway::new(
            Arc::new(mock),
            Arc::new(ResponseCache::default()),
            CacheTtls::default(),
        );
        let contents = load_row(&gateway, "horror").await.unwrap();
        assert_eq!(contents.title, "Horror");
        assert!(contents.results.is_empty());
    }
}
