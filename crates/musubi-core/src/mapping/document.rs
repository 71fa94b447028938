//! `anime-list.xml` parsing.
//!
//! The raw document is deserialized into permissive string-typed records,
//! then validated into [`SeriesMapping`] values. Entries without a numeric
//! AniDB id or a usable default season are dropped; everything else
//! degrades to "absent".

use serde::Deserialize;
use tracing::debug;

use super::model::{
    parse_pairs, DefaultSeason, EpisodeGroupMapping, EpisodeMapping, SeriesIds, SeriesMapping,
    SpecialEpisodePosition,
};

#[derive(Debug, Deserialize)]
struct AnimeListXml {
    #[serde(rename = "anime", default)]
    anime: Vec<AnimeXml>,
}

#[derive(Debug, Deserialize)]
struct AnimeXml {
    #[serde(rename = "@anidbid", default)]
    anidbid: Option<String>,
    #[serde(rename = "@tvdbid", default)]
    tvdbid: Option<String>,
    #[serde(rename = "@defaulttvdbseason", default)]
    defaulttvdbseason: Option<String>,
    #[serde(rename = "@episodeoffset", default)]
    episodeoffset: Option<String>,
    #[serde(rename = "@tmdbid", default)]
    tmdbid: Option<String>,
    #[serde(rename = "@imdbid", default)]
    imdbid: Option<String>,
    #[serde(rename = "@before", default)]
    before_attr: Option<String>,
    #[serde(rename = "mapping-list", default)]
    mapping_list: Option<MappingListXml>,
    #[serde(default)]
    before: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MappingListXml {
    #[serde(rename = "mapping", default)]
    mappings: Vec<MappingXml>,
}

#[derive(Debug, Deserialize)]
struct MappingXml {
    #[serde(rename = "@anidbseason", default)]
    anidbseason: Option<String>,
    #[serde(rename = "@tvdbseason", default)]
    tvdbseason: Option<String>,
    #[serde(rename = "@start", default)]
    start: Option<String>,
    #[serde(rename = "@end", default)]
    end: Option<String>,
    #[serde(rename = "@offset", default)]
    offset: Option<String>,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

/// Parse a mapping document into validated series mappings, in document order.
pub fn parse_document(xml: &str) -> Result<Vec<SeriesMapping>, quick_xml::DeError> {
    let doc: AnimeListXml = quick_xml::de::from_str(xml)?;
    let total = doc.anime.len();
    let mappings: Vec<SeriesMapping> =
        doc.anime.into_iter().filter_map(into_series_mapping).collect();
    debug!(total, valid = mappings.len(), "Parsed mapping document");
    Ok(mappings)
}

fn into_series_mapping(raw: AnimeXml) -> Option<SeriesMapping> {
    let Some(anidb) = parse_num::<u32>(raw.anidbid.as_deref()) else {
        debug!(anidbid = ?raw.anidbid, "Dropping mapping entry without a numeric AniDB id");
        return None;
    };
    let Some(default_season) = raw
        .defaulttvdbseason
        .as_deref()
        .and_then(DefaultSeason::parse)
    else {
        debug!(
            anidb,
            season = ?raw.defaulttvdbseason,
            "Dropping mapping entry without a usable default season"
        );
        return None;
    };

    let ids = SeriesIds {
        anidb,
        tvdb: parse_num(raw.tvdbid.as_deref()),
        tmdb: parse_num(raw.tmdbid.as_deref()),
        imdb: parse_imdb(raw.imdbid.as_deref()),
    };

    let group_mappings = raw
        .mapping_list
        .map(|list| list.mappings.into_iter().filter_map(into_group_mapping).collect())
        .unwrap_or_default();

    let special_positions = raw
        .before
        .or(raw.before_attr)
        .map(|text| {
            parse_pairs(&text)
                .into_iter()
                .map(|(special_index, following_standard_index)| SpecialEpisodePosition {
                    special_index,
                    following_standard_index,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(SeriesMapping {
        ids,
        default_season,
        default_episode_offset: parse_num::<i16>(raw.episodeoffset.as_deref())
            .map(i32::from)
            .unwrap_or(0),
        group_mappings,
        special_positions,
    })
}

fn into_group_mapping(raw: MappingXml) -> Option<EpisodeGroupMapping> {
    let source_section = parse_num(raw.anidbseason.as_deref())?;
    let target_season = parse_num(raw.tvdbseason.as_deref())?;

    let episode_mappings = raw
        .text
        .as_deref()
        .map(parse_pairs)
        .unwrap_or_default()
        .into_iter()
        .map(|(source_index, target_index)| EpisodeMapping {
            source_index,
            target_index,
        })
        .collect();

    Some(EpisodeGroupMapping {
        source_section,
        target_season,
        range_start: parse_num(raw.start.as_deref()),
        range_end: parse_num(raw.end.as_deref()),
        episode_offset: parse_num(raw.offset.as_deref()),
        episode_mappings,
    })
}

/// Absent, empty and non-numeric values (`"unknown"`, `"movie"`) are all `None`.
fn parse_num<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value?.trim().parse().ok()
}

fn parse_imdb(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    parse_num(Some(value.strip_prefix("tt").unwrap_or(value)))
}
