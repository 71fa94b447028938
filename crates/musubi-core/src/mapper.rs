//! AniDB ↔ TheTVDB episode translation.
//!
//! Forward mapping is the main path: an AniDB series id plus an episode
//! number becomes a TheTVDB season/episode (or an absolute index), with the
//! TheTVDB episode id filled in when the episode list is reachable.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalogue::{EpisodeListAccessor, EpisodeSummary};
use crate::mapping::{DefaultSeason, MappingError, MappingTable, SeriesMapping};
use crate::models::{
    EpisodeNumber, EpisodeType, MappedEpisodeResult, SourceEpisode, TranslatedEpisode,
};

/// Where an episode lands before the target id is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetPosition {
    Seasonal { season: i32, index: i32 },
    Absolute(i32),
}

/// Translates episode positions using a [`MappingTable`] and the target
/// catalogue's episode lists.
#[derive(Clone)]
pub struct IdentityMapper {
    table: Arc<MappingTable>,
    episodes: Arc<dyn EpisodeListAccessor>,
}

impl IdentityMapper {
    pub fn new(table: Arc<MappingTable>, episodes: Arc<dyn EpisodeListAccessor>) -> Self {
        Self { table, episodes }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Map an AniDB episode into TheTVDB numbering.
    ///
    /// Returns `Unmapped` when the series has no mapping entry; that path
    /// never touches the episode-list accessor. Duplicate mapping entries
    /// for the series are returned as an error.
    #[tracing::instrument(name = "map_episode", skip(self), fields(episode = %episode))]
    pub async fn map_episode(
        &self,
        source_series_id: u32,
        episode: EpisodeNumber,
    ) -> Result<MappedEpisodeResult, MappingError> {
        let Some(mapping) = self.table.lookup_by_source_id(source_series_id)? else {
            debug!("No mapping entry");
            return Ok(MappedEpisodeResult::Unmapped);
        };

        let following = match episode.kind {
            EpisodeType::Special => self.following_hint(mapping, episode.index).await,
            _ => None,
        };

        Ok(self.translate(mapping, episode, following).await)
    }

    /// Translation of the standard episode a special airs before, if the
    /// mapping declares one and it translates to a seasonal position.
    async fn following_hint(
        &self,
        mapping: &SeriesMapping,
        special_index: i32,
    ) -> Option<Box<TranslatedEpisode>> {
        let position = mapping.special_position(special_index)?;
        let standard = EpisodeNumber::normal(position.following_standard_index);
        match self.translate(mapping, standard, None).await {
            MappedEpisodeResult::Translated(translated) => Some(Box::new(translated)),
            MappedEpisodeResult::Absolute { .. } | MappedEpisodeResult::Unmapped => None,
        }
    }

    async fn translate(
        &self,
        mapping: &SeriesMapping,
        episode: EpisodeNumber,
        following: Option<Box<TranslatedEpisode>>,
    ) -> MappedEpisodeResult {
        let Some(position) = target_position(mapping, &episode) else {
            debug!(%episode, "Episode offset overflows; leaving unmapped");
            return MappedEpisodeResult::Unmapped;
        };

        match position {
            TargetPosition::Absolute(absolute_index) => {
                let target_id = self
                    .resolve_target_id(mapping.ids.tvdb, |e| {
                        e.absolute_index == Some(absolute_index)
                    })
                    .await;
                debug!(absolute_index, ?target_id, "Mapped to absolute episode");
                MappedEpisodeResult::Absolute {
                    target_id,
                    absolute_index,
                }
            }
            TargetPosition::Seasonal { season, index } => {
                let target_id = self
                    .resolve_target_id(mapping.ids.tvdb, |e| {
                        e.season == season && e.index == index
                    })
                    .await;
                debug!(season, index, ?target_id, "Mapped to seasonal episode");
                MappedEpisodeResult::Translated(TranslatedEpisode {
                    target_id,
                    target_season: season,
                    target_index: index,
                    following,
                })
            }
        }
    }

    /// Look the position up in the target series' episode list.
    ///
    /// An unknown target series, a failed fetch and a missing episode all
    /// leave the id absent.
    async fn resolve_target_id(
        &self,
        tvdb_id: Option<u32>,
        matches: impl Fn(&EpisodeSummary) -> bool,
    ) -> Option<u32> {
        let tvdb_id = tvdb_id?;
        match self.episodes.get_episodes(tvdb_id).await {
            Ok(episodes) => episodes.iter().find(|e| matches(e)).map(|e| e.id),
            Err(e) => {
                warn!(tvdb_id, error = %e, "Failed to fetch target episode list");
                None
            }
        }
    }

    /// Map a TheTVDB season/episode back to the AniDB episode it came from.
    ///
    /// Inversion order: explicit pairs, then group ranges with their offset,
    /// then the default season. Absolute-numbered series cannot be inverted
    /// from a seasonal position and yield `None`.
    pub fn map_target_episode(
        &self,
        target_series_id: u32,
        season: i32,
        index: i32,
    ) -> Result<Option<SourceEpisode>, MappingError> {
        let Some(mapping) = self.table.lookup_by_target_id(target_series_id)? else {
            return Ok(None);
        };
        let found = source_position(mapping, season, index).map(|episode| SourceEpisode {
            series_id: mapping.ids.anidb,
            episode,
        });
        debug!(target_series_id, season, index, ?found, "Reverse mapping");
        Ok(found)
    }
}

impl std::fmt::Debug for IdentityMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityMapper")
            .field("mappings", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// Absolute numbering wins over any group mapping; otherwise the covering
/// group, then the fixed default season. `None` when an offset overflows.
fn target_position(mapping: &SeriesMapping, episode: &EpisodeNumber) -> Option<TargetPosition> {
    let season = match mapping.default_season {
        DefaultSeason::Absolute => return Some(TargetPosition::Absolute(episode.index)),
        DefaultSeason::Fixed(season) => season,
    };

    if let Some(group) = mapping.find_group(episode) {
        return Some(TargetPosition::Seasonal {
            season: group.target_season,
            index: group.target_index(episode.index)?,
        });
    }

    Some(TargetPosition::Seasonal {
        season,
        index: episode.index.checked_add(mapping.default_episode_offset)?,
    })
}

fn source_position(mapping: &SeriesMapping, season: i32, index: i32) -> Option<EpisodeNumber> {
    let DefaultSeason::Fixed(default_season) = mapping.default_season else {
        return None;
    };

    let groups = move || {
        mapping
            .group_mappings
            .iter()
            .filter(move |g| g.target_season == season)
    };

    if let Some((group, source)) =
        groups().find_map(|g| g.explicit_source(index).map(|s| (g, s)))
    {
        return Some(episode_in_section(group.source_section, source));
    }

    for group in groups() {
        let Some(source) = index.checked_sub(group.episode_offset.unwrap_or(0)) else {
            continue;
        };
        if group.in_range(source) && group.explicit_target(source).is_none() {
            return Some(episode_in_section(group.source_section, source));
        }
    }

    if default_season == season {
        let source = EpisodeNumber::normal(index.checked_sub(mapping.default_episode_offset)?);
        if mapping.find_group(&source).is_none() {
            return Some(source);
        }
    }

    None
}

fn episode_in_section(section: u32, index: i32) -> EpisodeNumber {
    match section {
        1 => EpisodeNumber::normal(index),
        _ => EpisodeNumber::special(index),
    }
}
