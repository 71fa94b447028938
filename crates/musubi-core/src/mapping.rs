//! The AniDB → TheTVDB mapping table (`anime-list.xml`).

pub mod document;
pub mod model;
pub mod table;

pub use model::{
    DefaultSeason, EpisodeGroupMapping, EpisodeMapping, SeriesIds, SeriesMapping,
    SpecialEpisodePosition,
};
pub use table::{MappingError, MappingTable};

use crate::error::MusubiError;

impl MappingTable {
    /// Build a table from the text of a mapping document.
    pub fn from_xml(xml: &str) -> Result<Self, MusubiError> {
        Ok(Self::new(document::parse_document(xml)?))
    }
}
