use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// AniDB episode sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeType {
    Normal,
    Special,
    OpeningEnding,
    ParodyOrFanDub,
    Trailer,
    Other,
}

impl EpisodeType {
    /// Mapping-document section: 1 for normal episodes, 0 for everything else.
    pub fn section(self) -> u32 {
        match self {
            Self::Normal => 1,
            _ => 0,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Special => "S",
            Self::OpeningEnding => "C",
            Self::ParodyOrFanDub => "P",
            Self::Trailer => "T",
            Self::Other => "O",
        }
    }
}

/// An episode position in the source (AniDB) catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeNumber {
    pub index: i32,
    #[serde(rename = "type")]
    pub kind: EpisodeType,
}

impl EpisodeNumber {
    pub fn new(index: i32, kind: EpisodeType) -> Self {
        Self { index, kind }
    }

    pub fn normal(index: i32) -> Self {
        Self::new(index, EpisodeType::Normal)
    }

    pub fn special(index: i32) -> Self {
        Self::new(index, EpisodeType::Special)
    }

    pub fn section(&self) -> u32 {
        self.kind.section()
    }
}

/// Parses AniDB episode notation: `"5"`, `"S3"`, `"C1"`, `"P2"`, `"T1"`, `"O1"`.
impl FromStr for EpisodeNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let kind = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('S') => EpisodeType::Special,
            Some('C') => EpisodeType::OpeningEnding,
            Some('P') => EpisodeType::ParodyOrFanDub,
            Some('T') => EpisodeType::Trailer,
            Some('O') => EpisodeType::Other,
            Some(c) if c.is_ascii_digit() => EpisodeType::Normal,
            _ => return Err(format!("invalid episode number '{s}'")),
        };
        let digits = match kind {
            EpisodeType::Normal => s,
            _ => chars.as_str(),
        };
        let index = digits
            .parse::<i32>()
            .map_err(|_| format!("invalid episode number '{s}'"))?;
        Ok(Self { index, kind })
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.index)
    }
}

/// A position in the target (TheTVDB) catalogue's seasonal numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedEpisode {
    pub target_id: Option<u32>,
    pub target_season: i32,
    pub target_index: i32,
    /// For specials: the translated standard episode this special airs before.
    pub following: Option<Box<TranslatedEpisode>>,
}

/// Outcome of mapping one source episode into the target catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappedEpisodeResult {
    Translated(TranslatedEpisode),
    Absolute {
        target_id: Option<u32>,
        absolute_index: i32,
    },
    Unmapped,
}

impl MappedEpisodeResult {
    pub fn as_translated(&self) -> Option<&TranslatedEpisode> {
        match self {
            Self::Translated(episode) => Some(episode),
            Self::Absolute { .. } | Self::Unmapped => None,
        }
    }

    pub fn target_id(&self) -> Option<u32> {
        match self {
            Self::Translated(episode) => episode.target_id,
            Self::Absolute { target_id, .. } => *target_id,
            Self::Unmapped => None,
        }
    }
}

/// A source-catalogue episode found by reverse mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEpisode {
    pub series_id: u32,
    pub episode: EpisodeNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normal() {
        assert_eq!("5".parse::<EpisodeNumber>().unwrap(), EpisodeNumber::normal(5));
        assert_eq!(" 12 ".parse::<EpisodeNumber>().unwrap(), EpisodeNumber::normal(12));
    }

    #[test]
    fn parse_prefixed() {
        assert_eq!("S3".parse::<EpisodeNumber>().unwrap(), EpisodeNumber::special(3));
        assert_eq!(
            "c1".parse::<EpisodeNumber>().unwrap(),
            EpisodeNumber::new(1, EpisodeType::OpeningEnding)
        );
        assert_eq!(
            "T2".parse::<EpisodeNumber>().unwrap(),
            EpisodeNumber::new(2, EpisodeType::Trailer)
        );
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<EpisodeNumber>().is_err());
        assert!("S".parse::<EpisodeNumber>().is_err());
        assert!("X4".parse::<EpisodeNumber>().is_err());
        assert!("4a".parse::<EpisodeNumber>().is_err());
    }

    #[test]
    fn display_uses_anidb_notation() {
        assert_eq!(EpisodeNumber::special(3).to_string(), "S3");
        assert_eq!(EpisodeNumber::normal(7).to_string(), "7");
        assert_eq!(EpisodeNumber::new(2, EpisodeType::ParodyOrFanDub).to_string(), "P2");
    }

    #[test]
    fn sections() {
        assert_eq!(EpisodeNumber::normal(1).section(), 1);
        assert_eq!(EpisodeNumber::special(1).section(), 0);
        assert_eq!(EpisodeType::Trailer.section(), 0);
    }

    #[test]
    fn result_serializes_tagged() {
        let result = MappedEpisodeResult::Absolute {
            target_id: None,
            absolute_index: 12,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "absolute");
        assert_eq!(json["absolute_index"], 12);
    }
}
