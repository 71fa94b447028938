use std::collections::HashMap;

use thiserror::Error;

use super::model::SeriesMapping;

/// Data-integrity faults in the mapping table.
///
/// These are configuration errors, not lookup misses: callers must not treat
/// them as "no mapping".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("{count} mapping entries share AniDB id {id}")]
    DuplicateSourceId { id: u32, count: usize },

    #[error("{count} mapping entries share TheTVDB id {id}")]
    DuplicateTargetId { id: u32, count: usize },
}

/// Read-only set of [`SeriesMapping`] entries indexed by both catalogue ids.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<SeriesMapping>,
    by_source: HashMap<u32, Vec<usize>>,
    by_target: HashMap<u32, Vec<usize>>,
}

impl MappingTable {
    pub fn new(entries: Vec<SeriesMapping>) -> Self {
        let mut by_source: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut by_target: HashMap<u32, Vec<usize>> = HashMap::new();

        for (i, mapping) in entries.iter().enumerate() {
            by_source.entry(mapping.ids.anidb).or_default().push(i);
            if let Some(tvdb) = mapping.ids.tvdb {
                by_target.entry(tvdb).or_default().push(i);
            }
        }

        Self {
            entries,
            by_source,
            by_target,
        }
    }

    /// The mapping for an AniDB series id.
    pub fn lookup_by_source_id(
        &self,
        anidb_id: u32,
    ) -> Result<Option<&SeriesMapping>, MappingError> {
        match self.by_source.get(&anidb_id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([i]) => Ok(Some(&self.entries[*i])),
            Some(many) => Err(MappingError::DuplicateSourceId {
                id: anidb_id,
                count: many.len(),
            }),
        }
    }

    /// The mapping for a TheTVDB series id.
    pub fn lookup_by_target_id(
        &self,
        tvdb_id: u32,
    ) -> Result<Option<&SeriesMapping>, MappingError> {
        match self.by_target.get(&tvdb_id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([i]) => Ok(Some(&self.entries[*i])),
            Some(many) => Err(MappingError::DuplicateTargetId {
                id: tvdb_id,
                count: many.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DefaultSeason, SeriesIds};

    fn mapping(anidb: u32, tvdb: Option<u32>) -> SeriesMapping {
        SeriesMapping {
            ids: SeriesIds {
                anidb,
                tvdb,
                tmdb: None,
                imdb: None,
            },
            default_season: DefaultSeason::Fixed(1),
            default_episode_offset: 0,
            group_mappings: vec![],
            special_positions: vec![],
        }
    }

    #[test]
    fn lookup_both_ways() {
        let table = MappingTable::new(vec![mapping(30, Some(100)), mapping(31, None)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup_by_source_id(30).unwrap().unwrap().ids.tvdb, Some(100));
        assert_eq!(table.lookup_by_target_id(100).unwrap().unwrap().ids.anidb, 30);
        assert!(table.lookup_by_source_id(31).unwrap().is_some());
    }

    #[test]
    fn miss_is_none() {
        let table = MappingTable::new(vec![mapping(30, Some(100))]);
        assert_eq!(table.lookup_by_source_id(99), Ok(None));
        assert_eq!(table.lookup_by_target_id(99), Ok(None));
    }

    #[test]
    fn duplicate_source_fails_loudly() {
        let table = MappingTable::new(vec![mapping(30, Some(100)), mapping(30, Some(200))]);
        assert_eq!(
            table.lookup_by_source_id(30),
            Err(MappingError::DuplicateSourceId { id: 30, count: 2 })
        );
        // Unrelated ids still resolve.
        assert!(table.lookup_by_target_id(200).unwrap().is_some());
    }

    #[test]
    fn duplicate_target_fails_loudly() {
        let table = MappingTable::new(vec![mapping(30, Some(100)), mapping(31, Some(100))]);
        assert_eq!(
            table.lookup_by_target_id(100),
            Err(MappingError::DuplicateTargetId { id: 100, count: 2 })
        );
        assert!(table.lookup_by_source_id(31).unwrap().is_some());
    }
}
