use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full detail payload for one movie or show
///
/// Only the fields the chat replies read are typed; everything else the provider
/// sends is kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TitleDetails {
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Details merged with credits, as cached by the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DetailsRecord {
    #[serde(flatten)]
    pub details: TitleDetails,
    pub credits: Credits,
}

impl DetailsRecord {
    /// Movie runtime, or the first episode runtime for a series
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.details
            .runtime
            .filter(|m| *m > 0)
            .or_else(|| self.details.episode_run_time.first().copied().filter(|m| *m > 0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub episode_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub still_path: Option<String>,
}

/// One season of a series with its episodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonDetails {
    pub season_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}
