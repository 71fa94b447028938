//! The AniDB title dump (`anime-titles.xml`).
//!
//! ```xml
//! <animetitles>
//!   <anime aid="1">
//!     <title xml:lang="x-jat" type="main">Seikai no Monshou</title>
//!     <title xml:lang="en" type="official">Crest of the Stars</title>
//!   </anime>
//! </animetitles>
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use musubi_core::catalogue::{CatalogueError, TitleCatalogue, TitleEntry};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{check_response, ApiError};

#[derive(Debug, Deserialize)]
struct AnimeTitlesXml {
    #[serde(default)]
    anime: Vec<AnimeXml>,
}

#[derive(Debug, Deserialize)]
struct AnimeXml {
    #[serde(rename = "@aid")]
    aid: Option<String>,
    #[serde(default)]
    title: Vec<TitleXml>,
}

#[derive(Debug, Deserialize)]
struct TitleXml {
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Parse a title dump into catalogue entries, in document order.
///
/// Main titles come first within an entry; blank titles and entries without
/// a numeric `aid` are dropped.
pub fn parse_titles(xml: &str) -> Result<Vec<TitleEntry>, ApiError> {
    let doc: AnimeTitlesXml =
        quick_xml::de::from_str(xml).map_err(|e| ApiError::Parse(e.to_string()))?;

    let entries = doc
        .anime
        .into_iter()
        .filter_map(|anime| {
            let Some(id) = anime.aid.as_deref().and_then(|a| a.trim().parse::<u32>().ok()) else {
                debug!(aid = ?anime.aid, "Skipping title entry with invalid aid");
                return None;
            };

            let mut titles: Vec<(bool, String)> = anime
                .title
                .into_iter()
                .filter_map(|t| {
                    let value = t.value?.trim().to_string();
                    (!value.is_empty()).then(|| (t.kind.as_deref() == Some("main"), value))
                })
                .collect();
            // Stable: keeps document order among the rest.
            titles.sort_by_key(|(main, _)| !main);

            Some(TitleEntry {
                id,
                titles: titles.into_iter().map(|(_, t)| t).collect(),
            })
        })
        .collect();

    Ok(entries)
}

/// Fetches the title dump over HTTP on every [`TitleCatalogue::entries`] call.
///
/// The dump must be served uncompressed.
pub struct AnidbTitlesClient {
    url: String,
    http: Client,
}

impl AnidbTitlesClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<TitleEntry>, ApiError> {
        let resp = self.http.get(&self.url).send().await?;
        let resp = check_response(resp).await?;
        let body = resp.text().await?;
        let entries = parse_titles(&body)?;
        info!(url = %self.url, entries = entries.len(), "Fetched title dump");
        Ok(entries)
    }
}

#[async_trait]
impl TitleCatalogue for AnidbTitlesClient {
    async fn entries(&self) -> Result<Vec<TitleEntry>, CatalogueError> {
        Ok(self.fetch().await?)
    }
}

/// A local copy of the title dump.
#[derive(Debug, Clone)]
pub struct FileTitleCatalogue {
    path: PathBuf,
}

impl FileTitleCatalogue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<Vec<TitleEntry>, ApiError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let entries = parse_titles(&body)?;
        info!(path = %self.path.display(), entries = entries.len(), "Loaded title dump");
        Ok(entries)
    }
}

#[async_trait]
impl TitleCatalogue for FileTitleCatalogue {
    async fn entries(&self) -> Result<Vec<TitleEntry>, CatalogueError> {
        Ok(self.load().await?)
    }
}
