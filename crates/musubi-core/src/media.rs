mod builder;
mod item;
mod source;

pub use builder::MediaItemBuilder;
pub use item::{ItemIdentifier, ItemType, MediaItem, MediaItemError, SourceData};
pub use source::{IdentifySource, ItemInput, ProcessFailure, Source};
