use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use musubi_api::anime_list;
use musubi_api::{AnidbTitlesClient, FileTitleCatalogue};
use musubi_core::catalogue::{StaticEpisodeLists, TitleCatalogue};
use musubi_core::config::{AppConfig, DocumentConfig};
use musubi_core::mapper::IdentityMapper;
use musubi_core::models::{EpisodeNumber, MappedEpisodeResult, TranslatedEpisode};
use musubi_core::normalize::normalise;
use musubi_core::titles::SeriesTitleCache;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "musubi", about = "AniDB to TheTVDB episode mapping", version)]
struct Cli {
    /// Config file to use instead of the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the comparison form of a title
    Normalise { title: String },
    /// Look up an AniDB series id by title
    FindTitle { title: String },
    /// Map an AniDB episode into TheTVDB numbering
    Map {
        /// AniDB series id
        #[arg(long)]
        series: u32,
        /// Episode in AniDB notation: 5, S1, C2, ...
        #[arg(long)]
        episode: EpisodeNumber,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Map a TheTVDB season/episode back to AniDB
    Reverse {
        /// TheTVDB series id
        #[arg(long)]
        series: u32,
        #[arg(long)]
        season: i32,
        #[arg(long)]
        episode: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Normalise { title } => println!("{}", normalise(&title)),
        Command::FindTitle { title } => find_title(&config.titles, &title).await?,
        Command::Map {
            series,
            episode,
            json,
        } => map(&config.mapping, series, episode, json).await?,
        Command::Reverse {
            series,
            season,
            episode,
        } => reverse(&config.mapping, series, season, episode).await?,
    }

    Ok(())
}

async fn find_title(titles: &DocumentConfig, title: &str) -> Result<()> {
    let catalogue: Arc<dyn TitleCatalogue> = match (&titles.path, &titles.url) {
        (Some(path), _) => Arc::new(FileTitleCatalogue::new(path)),
        (None, Some(url)) => Arc::new(AnidbTitlesClient::new(url.as_str())),
        (None, None) => bail!("no title dump configured; set [titles] path or url"),
    };

    let cache = SeriesTitleCache::new(catalogue);
    match cache.find_by_title(title).await {
        Some(id) => println!("{id}"),
        None if cache.entries_indexed().is_none() => bail!("title dump could not be loaded"),
        None => bail!("no series found for '{title}'"),
    }
    Ok(())
}

async fn mapper(mapping: &DocumentConfig) -> Result<IdentityMapper> {
    let table = anime_list::load_table(mapping)
        .await
        .context("loading mapping document")?;
    info!(series = table.len(), "Mapping table ready");
    Ok(IdentityMapper::new(
        Arc::new(table),
        Arc::new(StaticEpisodeLists::new()),
    ))
}

#[tracing::instrument(skip(mapping, json), fields(episode = %episode))]
async fn map(
    mapping: &DocumentConfig,
    series: u32,
    episode: EpisodeNumber,
    json: bool,
) -> Result<()> {
    let result = mapper(mapping).await?.map_episode(series, episode).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        MappedEpisodeResult::Translated(t) => println!("{}", describe(&t)),
        MappedEpisodeResult::Absolute { absolute_index, .. } => {
            println!("absolute {absolute_index}")
        }
        MappedEpisodeResult::Unmapped => println!("unmapped"),
    }
    Ok(())
}

#[tracing::instrument(skip(mapping))]
async fn reverse(mapping: &DocumentConfig, series: u32, season: i32, episode: i32) -> Result<()> {
    match mapper(mapping)
        .await?
        .map_target_episode(series, season, episode)?
    {
        Some(source) => println!("anidb {} episode {}", source.series_id, source.episode),
        None => println!("unmapped"),
    }
    Ok(())
}

fn describe(episode: &TranslatedEpisode) -> String {
    let mut out = format!("S{:02}E{:02}", episode.target_season, episode.target_index);
    if let Some(following) = &episode.following {
        out.push_str(&format!(
            " (before S{:02}E{:02})",
            following.target_season, following.target_index
        ));
    }
    out
}
