//! Collaborator interfaces for the two remote catalogues.
//!
//! The title catalogue (AniDB title dump) feeds [`crate::titles::SeriesTitleCache`];
//! the episode-list accessor (TheTVDB series episodes) lets the identity
//! mapper resolve a translated position to a concrete episode id.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a catalogue collaborator.
///
/// These are converted into absent values by the core; they never abort a
/// mapping or a build.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("catalogue unavailable: {0}")]
    Unavailable(String),

    #[error("catalogue parse error: {0}")]
    Parse(String),
}

/// One title catalogue entry: a series id and every known title variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub id: u32,
    pub titles: Vec<String>,
}

/// An enumerable title catalogue.
#[async_trait]
pub trait TitleCatalogue: Send + Sync {
    /// Load every entry. Called at most once per successful cache build.
    async fn entries(&self) -> Result<Vec<TitleEntry>, CatalogueError>;
}

/// One episode of a target-catalogue series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub id: u32,
    pub season: i32,
    pub index: i32,
    pub absolute_index: Option<i32>,
}

/// Access to the target catalogue's per-series episode lists.
#[async_trait]
pub trait EpisodeListAccessor: Send + Sync {
    async fn get_episodes(&self, series_id: u32) -> Result<Vec<EpisodeSummary>, CatalogueError>;
}

/// In-memory episode lists keyed by target series id.
///
/// An unknown series yields an empty list, so translated positions come back
/// without a target id.
#[derive(Debug, Clone, Default)]
pub struct StaticEpisodeLists {
    series: HashMap<u32, Vec<EpisodeSummary>>,
}

impl StaticEpisodeLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series_id: u32, episodes: Vec<EpisodeSummary>) -> Self {
        self.series.insert(series_id, episodes);
        self
    }
}

#[async_trait]
impl EpisodeListAccessor for StaticEpisodeLists {
    async fn get_episodes(&self, series_id: u32) -> Result<Vec<EpisodeSummary>, CatalogueError> {
        Ok(self.series.get(&series_id).cloned().unwrap_or_default())
    }
}
