pub mod anidb_titles;
pub mod anime_list;
pub mod error;

pub use anidb_titles::{AnidbTitlesClient, FileTitleCatalogue};
pub use anime_list::AnimeListClient;
pub use error::ApiError;
