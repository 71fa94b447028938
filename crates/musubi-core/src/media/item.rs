use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of library item being identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Series,
    Season,
    Episode,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => write!(f, "series"),
            Self::Season => write!(f, "season"),
            Self::Episode => write!(f, "episode"),
        }
    }
}

/// Position and name of an item as one source sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIdentifier {
    pub index: Option<i32>,
    pub parent_index: Option<i32>,
    pub name: String,
}

impl ItemIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_parent_index(mut self, parent_index: i32) -> Self {
        self.parent_index = Some(parent_index);
        self
    }
}

/// The fragment of a media item contributed by one named source.
///
/// The payload type is owned by the source; readers downcast with
/// [`SourceData::payload`].
#[derive(Clone)]
pub struct SourceData {
    source_name: String,
    external_id: Option<u32>,
    identifier: ItemIdentifier,
    payload: Arc<dyn Any + Send + Sync>,
}

impl SourceData {
    pub fn new<T: Any + Send + Sync>(
        source_name: impl Into<String>,
        identifier: ItemIdentifier,
        payload: T,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            external_id: None,
            identifier,
            payload: Arc::new(payload),
        }
    }

    pub fn with_external_id(mut self, id: u32) -> Self {
        self.external_id = Some(id);
        self
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn external_id(&self) -> Option<u32> {
        self.external_id
    }

    pub fn identifier(&self) -> &ItemIdentifier {
        &self.identifier
    }

    /// The payload, if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for SourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceData")
            .field("source_name", &self.source_name)
            .field("external_id", &self.external_id)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaItemError {
    #[error("item already has data from source '{0}'")]
    DuplicateSource(String),
}

/// An immutable record of everything known about one library item.
///
/// Every addition produces a new item; the receiver is never changed.
#[derive(Debug, Clone)]
pub struct MediaItem {
    item_type: ItemType,
    identity: ItemIdentifier,
    source_data: Arc<BTreeMap<String, SourceData>>,
}

impl MediaItem {
    pub fn new(item_type: ItemType, identity: ItemIdentifier) -> Self {
        Self {
            item_type,
            identity,
            source_data: Arc::new(BTreeMap::new()),
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn identity(&self) -> &ItemIdentifier {
        &self.identity
    }

    pub fn data(&self, source_name: &str) -> Option<&SourceData> {
        self.source_data.get(source_name)
    }

    pub fn has_data(&self, source_name: &str) -> bool {
        self.source_data.contains_key(source_name)
    }

    /// Names of the sources that contributed, in name order.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.source_data.keys().map(String::as_str)
    }

    pub fn all_data(&self) -> impl Iterator<Item = &SourceData> {
        self.source_data.values()
    }

    /// A copy of this item with `data` attached.
    pub fn add_data(&self, data: SourceData) -> Result<MediaItem, MediaItemError> {
        if self.has_data(data.source_name()) {
            return Err(MediaItemError::DuplicateSource(data.source_name().to_string()));
        }
        let mut source_data = (*self.source_data).clone();
        source_data.insert(data.source_name().to_string(), data);
        Ok(Self {
            item_type: self.item_type,
            identity: self.identity.clone(),
            source_data: Arc::new(source_data),
        })
    }
}
