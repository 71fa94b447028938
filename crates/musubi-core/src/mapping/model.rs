use serde::{Deserialize, Serialize};

use crate::models::EpisodeNumber;

/// Cross-catalogue identifiers for one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesIds {
    /// AniDB id; primary key of the mapping table.
    pub anidb: u32,
    /// TheTVDB series id, when the series exists there.
    pub tvdb: Option<u32>,
    pub tmdb: Option<u32>,
    /// IMDb title number without the `tt` prefix.
    pub imdb: Option<u32>,
}

/// Season used when no group mapping covers an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSeason {
    Fixed(i32),
    Absolute,
}

impl DefaultSeason {
    /// Parse a `defaulttvdbseason` token: an integer, or `"a"` for absolute numbering.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("a") {
            return Some(Self::Absolute);
        }
        token.parse().ok().map(Self::Fixed)
    }
}

/// An explicit source → target episode pair inside a group mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMapping {
    pub source_index: i32,
    pub target_index: i32,
}

/// A rule translating a range (or explicit pairs) of one source section to a target season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeGroupMapping {
    /// 0 = specials, 1 = normal episodes.
    pub source_section: u32,
    pub target_season: i32,
    pub range_start: Option<i32>,
    pub range_end: Option<i32>,
    pub episode_offset: Option<i32>,
    pub episode_mappings: Vec<EpisodeMapping>,
}

impl EpisodeGroupMapping {
    /// Whether this group applies to `episode`: the section matches and
    /// either an explicit pair names the index or the index is in range.
    /// Absent bounds are open-ended.
    pub fn covers(&self, episode: &EpisodeNumber) -> bool {
        episode.section() == self.source_section
            && (self.explicit_target(episode.index).is_some() || self.in_range(episode.index))
    }

    /// Target index for a covered source index; an explicit pair beats the offset.
    ///
    /// `None` when applying the offset overflows.
    pub fn target_index(&self, source_index: i32) -> Option<i32> {
        match self.explicit_target(source_index) {
            Some(target) => Some(target),
            None => source_index.checked_add(self.episode_offset.unwrap_or(0)),
        }
    }

    pub fn explicit_target(&self, source_index: i32) -> Option<i32> {
        self.episode_mappings
            .iter()
            .find(|m| m.source_index == source_index)
            .map(|m| m.target_index)
    }

    pub fn explicit_source(&self, target_index: i32) -> Option<i32> {
        self.episode_mappings
            .iter()
            .find(|m| m.target_index == target_index)
            .map(|m| m.source_index)
    }

    pub fn in_range(&self, index: i32) -> bool {
        self.range_start.map_or(true, |start| index >= start)
            && self.range_end.map_or(true, |end| index <= end)
    }
}

/// Declares that a special airs immediately before a standard episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialEpisodePosition {
    pub special_index: i32,
    pub following_standard_index: i32,
}

/// Everything the mapping document says about one AniDB series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMapping {
    pub ids: SeriesIds,
    pub default_season: DefaultSeason,
    pub default_episode_offset: i32,
    pub group_mappings: Vec<EpisodeGroupMapping>,
    pub special_positions: Vec<SpecialEpisodePosition>,
}

impl SeriesMapping {
    /// The first group mapping, in document order, that covers `episode`.
    pub fn find_group(&self, episode: &EpisodeNumber) -> Option<&EpisodeGroupMapping> {
        self.group_mappings.iter().find(|group| group.covers(episode))
    }

    pub fn special_position(&self, special_index: i32) -> Option<&SpecialEpisodePosition> {
        self.special_positions
            .iter()
            .find(|p| p.special_index == special_index)
    }
}

/// Parse `";1-5;2-6;"` style pair lists.
///
/// Empty segments and malformed pairs are skipped. A pair may name several
/// targets (`"3-4+5"`); only the first is used.
pub fn parse_pairs(text: &str) -> Vec<(i32, i32)> {
    text.split(';')
        .filter_map(|segment| {
            let (left, right) = segment.trim().split_once('-')?;
            let right = right.split('+').next()?;
            Some((left.trim().parse().ok()?, right.trim().parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(
        section: u32,
        start: Option<i32>,
        end: Option<i32>,
        offset: Option<i32>,
    ) -> EpisodeGroupMapping {
        EpisodeGroupMapping {
            source_section: section,
            target_season: 2,
            range_start: start,
            range_end: end,
            episode_offset: offset,
            episode_mappings: vec![],
        }
    }

    #[test]
    fn default_season_tokens() {
        assert_eq!(DefaultSeason::parse("1"), Some(DefaultSeason::Fixed(1)));
        assert_eq!(DefaultSeason::parse("0"), Some(DefaultSeason::Fixed(0)));
        assert_eq!(DefaultSeason::parse("a"), Some(DefaultSeason::Absolute));
        assert_eq!(DefaultSeason::parse("A"), Some(DefaultSeason::Absolute));
        assert_eq!(DefaultSeason::parse(""), None);
        assert_eq!(DefaultSeason::parse("x"), None);
    }

    #[test]
    fn pairs_parse() {
        assert_eq!(parse_pairs(";1-5;2-6;"), vec![(1, 5), (2, 6)]);
        assert_eq!(parse_pairs("3-4+5"), vec![(3, 4)]);
        assert_eq!(parse_pairs(";;bad;7-;-2;8-9;"), vec![(8, 9)]);
        assert!(parse_pairs("").is_empty());
    }

    #[test]
    fn range_bounds() {
        let g = group(1, Some(13), Some(24), Some(-12));
        assert!(!g.covers(&EpisodeNumber::normal(12)));
        assert!(g.covers(&EpisodeNumber::normal(13)));
        assert!(g.covers(&EpisodeNumber::normal(24)));
        assert!(!g.covers(&EpisodeNumber::normal(25)));
        assert_eq!(g.target_index(13), Some(1));
    }

    #[test]
    fn open_ended_range() {
        let g = group(1, Some(13), None, None);
        assert!(g.covers(&EpisodeNumber::normal(500)));
        assert!(!g.covers(&EpisodeNumber::normal(1)));
    }

    #[test]
    fn section_must_match() {
        let g = group(0, None, None, None);
        assert!(g.covers(&EpisodeNumber::special(4)));
        assert!(!g.covers(&EpisodeNumber::normal(4)));
    }

    #[test]
    fn pairs_without_range_stay_open_ended() {
        let mut g = group(0, None, None, None);
        g.episode_mappings = vec![EpisodeMapping {
            source_index: 1,
            target_index: 5,
        }];
        assert!(g.covers(&EpisodeNumber::special(1)));
        assert!(g.covers(&EpisodeNumber::special(2)));
        assert!(!g.covers(&EpisodeNumber::normal(2)));
        assert_eq!(g.target_index(1), Some(5));
        assert_eq!(g.target_index(2), Some(2));
    }

    #[test]
    fn pair_outside_range_still_covered() {
        let mut g = group(1, Some(13), Some(24), Some(-12));
        g.episode_mappings = vec![EpisodeMapping {
            source_index: 30,
            target_index: 99,
        }];
        assert!(g.covers(&EpisodeNumber::normal(30)));
        assert!(!g.covers(&EpisodeNumber::normal(31)));
    }

    #[test]
    fn offset_overflow_has_no_target() {
        let g = group(1, None, None, Some(1));
        assert_eq!(g.target_index(i32::MAX), None);
        assert_eq!(g.target_index(i32::MAX - 1), Some(i32::MAX));
    }

    #[test]
    fn explicit_pair_beats_offset() {
        let mut g = group(1, Some(1), Some(10), Some(3));
        g.episode_mappings = vec![EpisodeMapping {
            source_index: 4,
            target_index: 100,
        }];
        assert_eq!(g.target_index(4), Some(100));
        assert_eq!(g.target_index(5), Some(8));
    }
}
