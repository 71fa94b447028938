use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::item::{ItemType, MediaItem};
use super::source::{IdentifySource, ItemInput, ProcessFailure, Source};
use crate::config::ItemStructure;

/// Assembles a [`MediaItem`] from a fixed, ordered list of sources.
pub struct MediaItemBuilder {
    structure: ItemStructure,
    file_source: Arc<dyn IdentifySource>,
    library_source: Arc<dyn IdentifySource>,
    sources: Vec<Arc<dyn Source>>,
}

impl MediaItemBuilder {
    pub fn new(
        structure: ItemStructure,
        file_source: Arc<dyn IdentifySource>,
        library_source: Arc<dyn IdentifySource>,
        sources: Vec<Arc<dyn Source>>,
    ) -> Self {
        Self {
            structure,
            file_source,
            library_source,
            sources,
        }
    }

    /// Seed a new item from raw input using the configured identify source.
    #[tracing::instrument(name = "identify", skip(self, input), fields(name = %input.name))]
    pub async fn identify(
        &self,
        input: &ItemInput,
        item_type: ItemType,
    ) -> Result<MediaItem, ProcessFailure> {
        let source = match self.structure {
            ItemStructure::File => &self.file_source,
            ItemStructure::Library => &self.library_source,
        };

        let data = source.identify(input, item_type).await?;
        let item = MediaItem::new(item_type, data.identifier().clone());
        debug!(source = source.name(), "Identified item");

        item.add_data(data)
            .map_err(|e| ProcessFailure::for_item(source.name(), &item, e.to_string()))
    }

    /// Pull every source's contribution into `seed`.
    ///
    /// Sweeps the source list until a sweep adds nothing. Within a sweep all
    /// pending sources look at the same snapshot concurrently; the next sweep
    /// sees their results. A source failure only skips that source for the
    /// sweep. There can be at most one productive sweep per source.
    #[tracing::instrument(
        name = "build",
        skip(self, seed),
        fields(name = %seed.identity().name, item_type = %seed.item_type())
    )]
    pub async fn build(&self, seed: MediaItem) -> Result<MediaItem, ProcessFailure> {
        let mut item = seed;
        let max_sweeps = self.sources.len();
        let mut last_sweep_added = false;

        for sweep in 1..=max_sweeps {
            let pending: Vec<&Arc<dyn Source>> = self
                .sources
                .iter()
                .filter(|source| !item.has_data(source.name()))
                .collect();
            if pending.is_empty() {
                break;
            }

            let snapshot = &item;
            let results = join_all(pending.iter().map(|source| async move {
                (*source, source.lookup(snapshot).await)
            }))
            .await;

            let mut next = item.clone();
            let mut added = Vec::new();
            for (source, result) in results {
                match result {
                    Ok(data) if data.source_name() != source.name() => {
                        warn!(
                            source = source.name(),
                            returned = data.source_name(),
                            "Source returned data under another name, ignoring"
                        );
                    }
                    Ok(data) => {
                        next = next.add_data(data).map_err(|e| {
                            ProcessFailure::for_item(source.name(), &next, e.to_string())
                        })?;
                        added.push(source.name());
                    }
                    Err(failure) => {
                        debug!(
                            source = source.name(),
                            reason = %failure.reason,
                            "Source lookup failed"
                        );
                    }
                }
            }

            debug!(sweep, pending = pending.len(), ?added, "Sweep finished");
            last_sweep_added = !added.is_empty();
            item = next;

            if !last_sweep_added {
                break;
            }
        }

        if last_sweep_added && self.sources.iter().any(|s| !item.has_data(s.name())) {
            warn!(max_sweeps, "Sweep limit reached before a fixed point");
        }

        Ok(item)
    }

    /// Identify then build.
    pub async fn identify_and_build(
        &self,
        input: &ItemInput,
        item_type: ItemType,
    ) -> Result<MediaItem, ProcessFailure> {
        let seed = self.identify(input, item_type).await?;
        self.build(seed).await
    }
}

impl std::fmt::Debug for MediaItemBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaItemBuilder")
            .field("structure", &self.structure)
            .field("file_source", &self.file_source.name())
            .field("library_source", &self.library_source.name())
            .field("sources", &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}
