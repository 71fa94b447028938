use std::path::Path;

use musubi_core::config::DocumentConfig;
use musubi_core::mapping::MappingTable;
use reqwest::Client;
use tracing::info;

use crate::error::{check_response, ApiError};

pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/Anime-Lists/anime-lists/master/anime-list.xml";

/// Downloads the community AniDB → TheTVDB mapping document.
pub struct AnimeListClient {
    url: String,
    http: Client,
}

impl AnimeListClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    pub async fn fetch_xml(&self) -> Result<String, ApiError> {
        let resp = self.http.get(&self.url).send().await?;
        let resp = check_response(resp).await?;
        Ok(resp.text().await?)
    }

    /// Download and index the mapping document.
    pub async fn fetch_table(&self) -> Result<MappingTable, ApiError> {
        let xml = self.fetch_xml().await?;
        let table = table_from_xml(&xml)?;
        info!(url = %self.url, series = table.len(), "Fetched mapping document");
        Ok(table)
    }
}

impl Default for AnimeListClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Index a local copy of the mapping document.
pub async fn load_table_from_path(path: &Path) -> Result<MappingTable, ApiError> {
    let xml = tokio::fs::read_to_string(path).await?;
    let table = table_from_xml(&xml)?;
    info!(path = %path.display(), series = table.len(), "Loaded mapping document");
    Ok(table)
}

/// Load the table from wherever `config` points. A path wins over a url.
pub async fn load_table(config: &DocumentConfig) -> Result<MappingTable, ApiError> {
    match (&config.path, &config.url) {
        (Some(path), _) => load_table_from_path(path).await,
        (None, Some(url)) => AnimeListClient::new(url.as_str()).fetch_table().await,
        (None, None) => Err(ApiError::NotConfigured("mapping document")),
    }
}

fn table_from_xml(xml: &str) -> Result<MappingTable, ApiError> {
    MappingTable::from_xml(xml).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    const SAMPLE: &str = r#"<anime-list>
  <anime anidbid="23" tvdbid="76885" defaulttvdbseason="1">
    <name>Cowboy Bebop</name>
  </anime>
  <anime anidbid="69" tvdbid="81797" defaulttvdbseason="a">
    <name>One Piece</name>
  </anime>
</anime-list>"#;

    fn write_document(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime-list.xml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn loads_local_copy() {
        let (_dir, path) = write_document(SAMPLE);

        let table = load_table_from_path(&path).await.unwrap();
        assert_eq!(table.len(), 2);
        let bebop = table.lookup_by_source_id(23).unwrap().unwrap();
        assert_eq!(bebop.ids.tvdb, Some(76885));
    }

    #[tokio::test]
    async fn path_wins_over_url() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, SAMPLE.as_bytes()).unwrap();

        let config = DocumentConfig {
            url: Some("http://127.0.0.1:9/unreachable.xml".into()),
            path: Some(file.path().to_path_buf()),
        };
        let table = load_table(&config).await.unwrap();
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn unconfigured_document() {
        let result = load_table(&DocumentConfig::default()).await;
        assert!(matches!(result, Err(ApiError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_table_from_path(&dir.path().join("absent.xml")).await;
        assert!(matches!(result, Err(ApiError::Io(_))));
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() {
        let (_dir, path) = write_document("<anime-list><anime");

        let result = load_table_from_path(&path).await;
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
