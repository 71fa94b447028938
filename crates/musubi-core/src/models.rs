mod episode;

pub use episode::{
    EpisodeNumber, EpisodeType, MappedEpisodeResult, SourceEpisode, TranslatedEpisode,
};
