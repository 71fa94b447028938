use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::catalogue::TitleCatalogue;
use crate::normalize::normalise;

/// Title → series id index over a [`TitleCatalogue`].
///
/// Built on the first lookup, exactly once even under concurrent callers.
/// A failed build is not cached; the next lookup retries it.
pub struct SeriesTitleCache {
    catalogue: Arc<dyn TitleCatalogue>,
    index: OnceCell<TitleIndex>,
}

/// Literal titles are keyed lower-cased; normalised keys are upper-case
/// by construction, so both share one map.
#[derive(Debug, Default)]
struct TitleIndex {
    keys: HashMap<String, u32>,
    entries_indexed: usize,
}

impl TitleIndex {
    /// First writer wins: a title already claimed by an earlier entry is
    /// shadowed silently.
    fn insert(&mut self, key: String, id: u32) {
        self.keys.entry(key).or_insert(id);
    }

    fn get(&self, key: &str) -> Option<u32> {
        self.keys.get(key).copied()
    }
}

impl SeriesTitleCache {
    pub fn new(catalogue: Arc<dyn TitleCatalogue>) -> Self {
        Self {
            catalogue,
            index: OnceCell::new(),
        }
    }

    /// Resolve a free-text series name to a catalogue id.
    ///
    /// Flow: exact (case-insensitive) title → normalised title → `None`.
    #[tracing::instrument(name = "find_by_title", skip(self), fields(title = %title))]
    pub async fn find_by_title(&self, title: &str) -> Option<u32> {
        if title.trim().is_empty() {
            return None;
        }

        let index = self.index().await?;

        if let Some(id) = index.get(&title.to_lowercase()) {
            tracing::debug!(method = "exact", id, "Title hit");
            return Some(id);
        }

        let normalised = normalise(title);
        if let Some(id) = index.get(&normalised) {
            tracing::debug!(method = "normalised", id, key = %normalised, "Title hit");
            return Some(id);
        }

        tracing::debug!(key = %normalised, "Title miss");
        None
    }

    /// Number of catalogue entries indexed, or `None` before the first build.
    pub fn entries_indexed(&self) -> Option<usize> {
        self.index.get().map(|index| index.entries_indexed)
    }

    async fn index(&self) -> Option<&TitleIndex> {
        let result = self
            .index
            .get_or_try_init(|| async {
                let entries = self.catalogue.entries().await?;
                let mut index = TitleIndex::default();
                for entry in &entries {
                    for title in &entry.titles {
                        index.insert(title.to_lowercase(), entry.id);
                        index.insert(normalise(title), entry.id);
                    }
                }
                index.entries_indexed = entries.len();
                tracing::debug!(
                    entries = index.entries_indexed,
                    keys = index.keys.len(),
                    "Title cache populated"
                );
                Ok::<_, crate::catalogue::CatalogueError>(index)
            })
            .await;

        match result {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::error!(error = %e, "Failed to populate title cache");
                None
            }
        }
    }
}

impl std::fmt::Debug for SeriesTitleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesTitleCache")
            .field("entries_indexed", &self.entries_indexed())
            .finish_non_exhaustive()
    }
}
