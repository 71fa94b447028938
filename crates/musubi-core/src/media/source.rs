use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::item::{ItemType, MediaItem, SourceData};

/// A lookup failure for one item, as surfaced to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source_name} failed for {item_type} '{item_name}': {reason}")]
pub struct ProcessFailure {
    pub source_name: String,
    pub item_name: String,
    pub item_type: ItemType,
    pub reason: String,
}

impl ProcessFailure {
    pub fn new(
        source_name: impl Into<String>,
        item_name: impl Into<String>,
        item_type: ItemType,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            item_name: item_name.into(),
            item_type,
            reason: reason.into(),
        }
    }

    /// A failure against an item already under construction.
    pub fn for_item(
        source_name: impl Into<String>,
        item: &MediaItem,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(source_name, item.identity().name.clone(), item.item_type(), reason)
    }
}

/// Raw host input for an item before any source has seen it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub index: Option<i32>,
    pub parent_index: Option<i32>,
    pub path: Option<PathBuf>,
}

/// A source that can contribute data to an item already identified.
///
/// Lookups read the item as it stands, so a source may depend on data
/// another source attached earlier. Missing dependencies are reported as
/// a [`ProcessFailure`]; the builder retries on the next sweep.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, item: &MediaItem) -> Result<SourceData, ProcessFailure>;
}

/// A source that turns raw input into the seed data of a new item.
#[async_trait]
pub trait IdentifySource: Send + Sync {
    fn name(&self) -> &str;

    async fn identify(
        &self,
        input: &ItemInput,
        item_type: ItemType,
    ) -> Result<SourceData, ProcessFailure>;
}
