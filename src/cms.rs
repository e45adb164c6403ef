//! The CMS the materializer writes into.
//!
//! [`DocumentStore`] is the persistence seam: insert a draft, attach
//! key/value metadata, and build admin/public URLs. [`SeoMirror`]s name the
//! meta keys of third-party SEO plugins that should receive copies of the
//! generated SEO fields; which mirrors are active is decided by the caller.
//!
//! [`InMemoryStore`] is a complete store kept in process memory, useful for
//! previews, demos and tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail};
use async_trait::async_trait;

use crate::materialize::Document;

/// Metadata keys written by the materializer.
pub mod meta_keys {
    pub const GENERATED: &str = "ai_pagegen_generated";
    pub const VERSION: &str = "ai_pagegen_version";
    pub const GENERATED_DATE: &str = "ai_pagegen_generated_date";

    pub const SEO_TITLE: &str = "_ai_pagegen_seo_title";
    pub const META_DESCRIPTION: &str = "_ai_pagegen_meta_description";
    pub const SEO_KEYWORDS: &str = "_ai_pagegen_seo_keywords";
    pub const CUSTOM_CSS: &str = "_ai_pagegen_custom_css";

    pub const ELEMENTOR_DATA: &str = "_elementor_data";
    pub const ELEMENTOR_EDIT_MODE: &str = "_elementor_edit_mode";
}

/// Persistence for generated documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `document` and return its new id.
    async fn insert_draft(&self, document: &Document) -> anyhow::Result<u64>;

    /// Set one metadata value on an existing document.
    async fn set_meta(&self, id: u64, key: &str, value: &str) -> anyhow::Result<()>;

    /// Ids of documents carrying the [`meta_keys::GENERATED`] marker, ascending.
    async fn generated_ids(&self) -> anyhow::Result<Vec<u64>>;

    fn edit_url(&self, id: u64) -> String;

    fn view_url(&self, id: u64) -> String;
}

/// Meta keys of an SEO plugin that mirrors the generated SEO fields.
pub trait SeoMirror: Send + Sync {
    fn name(&self) -> &'static str;
    fn title_key(&self) -> &'static str;
    fn description_key(&self) -> &'static str;
    fn keyword_key(&self) -> &'static str;
}

/// Yoast SEO.
#[derive(Debug, Clone, Copy, Default)]
pub struct YoastMirror;

impl SeoMirror for YoastMirror {
    fn name(&self) -> &'static str {
        "yoast"
    }
    fn title_key(&self) -> &'static str {
        "_yoast_wpseo_title"
    }
    fn description_key(&self) -> &'static str {
        "_yoast_wpseo_metadesc"
    }
    fn keyword_key(&self) -> &'static str {
        "_yoast_wpseo_focuskw"
    }
}

/// Rank Math.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankMathMirror;

impl SeoMirror for RankMathMirror {
    fn name(&self) -> &'static str {
        "rankmath"
    }
    fn title_key(&self) -> &'static str {
        "rank_math_title"
    }
    fn description_key(&self) -> &'static str {
        "rank_math_description"
    }
    fn keyword_key(&self) -> &'static str {
        "rank_math_focus_keyword"
    }
}

/// A stored document plus its metadata.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub document: Document,
    pub meta: BTreeMap<String, String>,
}

/// Process-local [`DocumentStore`].
///
/// Ids start at 1. Insert and metadata failures can be injected to
/// exercise error paths.
#[derive(Debug)]
pub struct InMemoryStore {
    site_url: String,
    next_id: AtomicU64,
    documents: Mutex<BTreeMap<u64, StoredDocument>>,
    fail_inserts: bool,
    failing_meta_keys: HashSet<String>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

impl InMemoryStore {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
            documents: Mutex::new(BTreeMap::new()),
            fail_inserts: false,
            failing_meta_keys: HashSet::new(),
        }
    }

    /// Reject every insert.
    pub fn with_failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    /// Reject writes of the metadata key `key`.
    pub fn with_failing_meta(mut self, key: impl Into<String>) -> Self {
        self.failing_meta_keys.insert(key.into());
        self
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u64) -> Option<StoredDocument> {
        self.documents.lock().ok()?.get(&id).cloned()
    }

    pub fn meta(&self, id: u64, key: &str) -> Option<String> {
        self.documents.lock().ok()?.get(&id)?.meta.get(key).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_draft(&self, document: &Document) -> anyhow::Result<u64> {
        if self.fail_inserts {
            bail!("store rejected the insert");
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut documents = self.documents.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        documents.insert(
            id,
            StoredDocument {
                document: document.clone(),
                meta: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    async fn set_meta(&self, id: u64, key: &str, value: &str) -> anyhow::Result<()> {
        if self.failing_meta_keys.contains(key) {
            bail!("store rejected meta key {}", key);
        }
        let mut documents = self.documents.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        let stored = documents
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no document with id {}", id))?;
        stored.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn generated_ids(&self) -> anyhow::Result<Vec<u64>> {
        let documents = self.documents.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(documents
            .iter()
            .filter(|(_, stored)| stored.meta.get(meta_keys::GENERATED).is_some_and(|v| v == "1"))
            .map(|(id, _)| *id)
            .collect())
    }

    fn edit_url(&self, id: u64) -> String {
        format!("{}/wp-admin/post.php?post={}&action=edit", self.site_url, id)
    }

    fn view_url(&self, id: u64) -> String {
        format!("{}/?p={}", self.site_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::Materializer;
    use crate::types::ContentRecord;
    use std::sync::Arc;

    fn document() -> Document {
        let record = ContentRecord {
            title: "T".into(),
            content: "<p>C</p>".into(),
            ..Default::default()
        };
        Materializer::new(Arc::new(InMemoryStore::default()))
            .build_document(&record, &Default::default())
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryStore::default();
        let first = store.insert_draft(&document()).await.unwrap();
        let second = store.insert_draft(&document()).await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().document.title, "T");
    }

    #[tokio::test]
    async fn test_meta_roundtrip_and_missing_document() {
        let store = InMemoryStore::default();
        let id = store.insert_draft(&document()).await.unwrap();
        store.set_meta(id, "k", "v").await.unwrap();
        assert_eq!(store.meta(id, "k").as_deref(), Some("v"));
        assert!(store.set_meta(99, "k", "v").await.is_err());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryStore::default().with_failing_inserts();
        assert!(store.insert_draft(&document()).await.is_err());
        assert!(store.is_empty());

        let store = InMemoryStore::default().with_failing_meta(meta_keys::CUSTOM_CSS);
        let id = store.insert_draft(&document()).await.unwrap();
        assert!(store.set_meta(id, meta_keys::CUSTOM_CSS, "x").await.is_err());
        assert!(store.set_meta(id, meta_keys::SEO_TITLE, "x").await.is_ok());
    }

    #[tokio::test]
    async fn test_generated_ids_filters_on_marker() {
        let store = Arc::new(InMemoryStore::default());
        let materializer = Materializer::new(store.clone());
        let record = ContentRecord {
            title: "Generated".into(),
            content: "<p>C</p>".into(),
            ..Default::default()
        };
        let first = materializer.materialize(&record, &Default::default()).await.unwrap();
        let manual = store.insert_draft(&document()).await.unwrap();
        let second = materializer.materialize(&record, &Default::default()).await.unwrap();

        let ids = store.generated_ids().await.unwrap();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(!ids.contains(&manual));
    }

    #[tokio::test]
    async fn test_generated_ids_empty_store() {
        assert!(InMemoryStore::default().generated_ids().await.unwrap().is_empty());
    }

    #[test]
    fn test_urls() {
        let store = InMemoryStore::new("https://example.com/");
        assert_eq!(store.edit_url(7), "https://example.com/wp-admin/post.php?post=7&action=edit");
        assert_eq!(store.view_url(7), "https://example.com/?p=7");
    }

    #[test]
    fn test_mirror_keys() {
        let mirrors: Vec<Box<dyn SeoMirror>> = vec![Box::new(YoastMirror), Box::new(RankMathMirror)];
        let keys: Vec<_> = mirrors.iter().map(|m| m.description_key()).collect();
        assert_eq!(keys, vec!["_yoast_wpseo_metadesc", "rank_math_description"]);
        assert_eq!(mirrors[1].keyword_key(), "rank_math_focus_keyword");
    }
}
