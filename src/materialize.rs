//! [`ContentRecord`] → persisted draft document.
//!
//! [`Materializer::build_document`] is the pure mapping: body conversion
//! (Gutenberg blocks, or an Elementor tree when requested), generator
//! metadata, SEO fields and the optional stylesheet. [`Materializer::materialize`]
//! then inserts the draft and writes its metadata through a [`DocumentStore`].
//!
//! Only the insert is fatal. Metadata writes are best-effort: a failure is
//! logged and the remaining writes still run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::{html_to_blocks, serialize_blocks, ElementorTree};
use crate::cms::{meta_keys, DocumentStore, SeoMirror};
use crate::error::{PageGenError, Result};
use crate::styling::{generate_css, resolve_color_scheme};
use crate::types::{ContentRecord, GenerationOptions, PostType};

/// Creation options: the subset of [`GenerationOptions`] that shapes the
/// stored document, plus the author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeOptions {
    pub post_type: PostType,
    pub author_id: u64,
    pub elementor_compatible: bool,
    pub color_scheme: Vec<String>,
    pub seo_keywords: Vec<String>,
}

impl MaterializeOptions {
    /// Carry over the document-shaping fields of a generation request.
    pub fn from_generation(options: &GenerationOptions, author_id: u64) -> Self {
        Self {
            post_type: options.post_type,
            author_id,
            elementor_compatible: options.elementor_compatible,
            color_scheme: options.color_scheme.clone(),
            seo_keywords: options.seo_keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
}

/// Document body in one of the two editor formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentBody {
    /// Gutenberg block markup.
    Blocks(String),
    /// Elementor element tree, plus the unmodified HTML as post content.
    Elementor { tree: ElementorTree, html: String },
}

impl DocumentBody {
    /// What goes into the CMS's main content field.
    pub fn post_content(&self) -> &str {
        match self {
            DocumentBody::Blocks(markup) => markup,
            DocumentBody::Elementor { html, .. } => html,
        }
    }
}

/// Marks a document as produced by this generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorMetadata {
    pub generated: bool,
    pub version: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

/// A document ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub body: DocumentBody,
    pub excerpt: Option<String>,
    pub status: DocumentStatus,
    pub doc_type: PostType,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
    pub generator: GeneratorMetadata,
    pub seo: Option<SeoMeta>,
    pub custom_css: Option<String>,
}

/// Where a created document can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub id: u64,
    pub edit_url: String,
    pub view_url: String,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Writes [`ContentRecord`]s into a [`DocumentStore`] as drafts.
pub struct Materializer {
    store: Arc<dyn DocumentStore>,
    mirrors: Vec<Arc<dyn SeoMirror>>,
    generator_version: String,
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("mirrors", &self.mirrors.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("generator_version", &self.generator_version)
            .finish_non_exhaustive()
    }
}

impl Materializer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            mirrors: Vec::new(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Also copy SEO fields into `mirror`'s meta keys.
    pub fn with_mirror(mut self, mirror: Arc<dyn SeoMirror>) -> Self {
        self.mirrors.push(mirror);
        self
    }

    pub fn with_generator_version(mut self, version: impl Into<String>) -> Self {
        self.generator_version = version.into();
        self
    }

    /// Map a record to a document without touching the store.
    pub fn build_document(&self, record: &ContentRecord, options: &MaterializeOptions) -> Document {
        let body = if options.elementor_compatible {
            DocumentBody::Elementor {
                tree: ElementorTree::wrap_html(&record.content),
                html: record.content.clone(),
            }
        } else {
            DocumentBody::Blocks(serialize_blocks(&html_to_blocks(&record.content)))
        };

        let seo_title = non_empty(&record.seo_title);
        let description = non_empty(&record.meta_description);
        let seo = if seo_title.is_some() || description.is_some() {
            Some(SeoMeta {
                title: seo_title,
                description,
                keywords: options.seo_keywords.clone(),
            })
        } else {
            None
        };

        let custom_css = resolve_color_scheme(&options.color_scheme).map(|colors| generate_css(&colors));

        let now = Utc::now();
        Document {
            title: record.title.clone(),
            body,
            excerpt: non_empty(&record.excerpt),
            status: DocumentStatus::Draft,
            doc_type: options.post_type,
            author_id: options.author_id,
            created_at: now,
            generator: GeneratorMetadata {
                generated: true,
                version: self.generator_version.clone(),
                generated_at: now,
            },
            seo,
            custom_css,
        }
    }

    /// Insert `record` as a draft and attach its metadata.
    pub async fn materialize(&self, record: &ContentRecord, options: &MaterializeOptions) -> Result<DocumentHandle> {
        let document = self.build_document(record, options);

        let id = self.store.insert_draft(&document).await.map_err(|e| {
            tracing::error!(error = %e, doc_type = document.doc_type.as_str(), "document insert failed");
            PageGenError::Persistence(format!("{:#}", e))
        })?;

        let failed = self
            .write_meta_entries(id, meta_entries(&document, &self.mirrors))
            .await;

        tracing::info!(
            document_id = id,
            doc_type = document.doc_type.as_str(),
            elementor = options.elementor_compatible,
            failed_meta_writes = failed,
            "document created"
        );

        Ok(DocumentHandle {
            id,
            edit_url: self.store.edit_url(id),
            view_url: self.store.view_url(id),
        })
    }

    /// Write every entry, returning how many failed.
    async fn write_meta_entries(&self, id: u64, entries: Vec<(&'static str, String)>) -> usize {
        let mut failed = 0;
        for (key, value) in entries {
            if let Err(e) = self.store.set_meta(id, key, &value).await {
                failed += 1;
                tracing::warn!(document_id = id, key, error = %e, "metadata write failed");
            }
        }
        failed
    }
}

/// Metadata for `document`, in write order.
fn meta_entries(document: &Document, mirrors: &[Arc<dyn SeoMirror>]) -> Vec<(&'static str, String)> {
    let mut entries = vec![
        (meta_keys::GENERATED, "1".to_string()),
        (meta_keys::VERSION, document.generator.version.clone()),
        (
            meta_keys::GENERATED_DATE,
            document.generator.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    ];

    if let DocumentBody::Elementor { tree, .. } = &document.body {
        match tree.to_json() {
            Ok(json) => {
                entries.push((meta_keys::ELEMENTOR_DATA, json));
                entries.push((meta_keys::ELEMENTOR_EDIT_MODE, "builder".to_string()));
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize Elementor tree"),
        }
    }

    if let Some(seo) = &document.seo {
        let keywords = (!seo.keywords.is_empty()).then(|| seo.keywords.join(", "));
        let mut push_seo = |title_key: &'static str, description_key: &'static str, keyword_key: &'static str| {
            if let Some(title) = &seo.title {
                entries.push((title_key, title.clone()));
            }
            if let Some(description) = &seo.description {
                entries.push((description_key, description.clone()));
            }
            if let Some(keywords) = &keywords {
                entries.push((keyword_key, keywords.clone()));
            }
        };
        push_seo(meta_keys::SEO_TITLE, meta_keys::META_DESCRIPTION, meta_keys::SEO_KEYWORDS);
        for mirror in mirrors {
            push_seo(mirror.title_key(), mirror.description_key(), mirror.keyword_key());
        }
    }

    if let Some(css) = &document.custom_css {
        entries.push((meta_keys::CUSTOM_CSS, css.clone()));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{InMemoryStore, RankMathMirror, YoastMirror};

    fn record() -> ContentRecord {
        ContentRecord {
            title: "Fitness App".into(),
            content: "<h1>Fitness App</h1><p>Get fit.</p>".into(),
            excerpt: Some("Get fit.".into()),
            seo_title: None,
            meta_description: None,
        }
    }

    fn seo_record() -> ContentRecord {
        ContentRecord {
            seo_title: Some("Fitness App | Train Smarter".into()),
            meta_description: Some("Track workouts.".into()),
            ..record()
        }
    }

    fn materializer(store: &Arc<InMemoryStore>) -> Materializer {
        Materializer::new(store.clone()).with_generator_version("9.9.9")
    }

    #[test]
    fn test_build_document_gutenberg() {
        let store = Arc::new(InMemoryStore::default());
        let doc = materializer(&store).build_document(&record(), &MaterializeOptions::default());
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.doc_type, PostType::Post);
        assert_eq!(doc.title, "Fitness App");
        assert_eq!(
            doc.body.post_content(),
            "<!-- wp:heading {\"level\":1} -->\n<h1 class=\"wp-block-heading\">Fitness App</h1>\n<!-- /wp:heading -->\n\n<!-- wp:paragraph -->\n<p>Get fit.</p>\n<!-- /wp:paragraph -->"
        );
        assert!(doc.generator.generated);
        assert_eq!(doc.generator.version, "9.9.9");
        assert!(doc.seo.is_none());
        assert!(doc.custom_css.is_none());
    }

    #[test]
    fn test_build_document_elementor_keeps_content_verbatim() {
        let store = Arc::new(InMemoryStore::default());
        let options = MaterializeOptions {
            elementor_compatible: true,
            post_type: PostType::Page,
            ..Default::default()
        };
        let doc = materializer(&store).build_document(&record(), &options);
        let DocumentBody::Elementor { tree, html } = &doc.body else {
            panic!("expected Elementor body");
        };
        assert_eq!(html, &record().content);
        let widgets = tree.widgets();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].settings["editor"], record().content.as_str());
    }

    #[test]
    fn test_blank_excerpt_dropped() {
        let store = Arc::new(InMemoryStore::default());
        let mut rec = record();
        rec.excerpt = Some("   ".into());
        let doc = materializer(&store).build_document(&rec, &MaterializeOptions::default());
        assert!(doc.excerpt.is_none());
    }

    #[tokio::test]
    async fn test_materialize_writes_generator_and_seo_meta() {
        let store = Arc::new(InMemoryStore::new("https://site.test"));
        let materializer = materializer(&store)
            .with_mirror(Arc::new(YoastMirror))
            .with_mirror(Arc::new(RankMathMirror));
        let options = MaterializeOptions {
            seo_keywords: vec!["fitness".into(), "workouts".into()],
            ..Default::default()
        };

        let handle = materializer.materialize(&seo_record(), &options).await.unwrap();
        assert_eq!(handle.id, 1);
        assert_eq!(handle.edit_url, "https://site.test/wp-admin/post.php?post=1&action=edit");
        assert_eq!(handle.view_url, "https://site.test/?p=1");

        let meta = |key: &str| store.meta(handle.id, key);
        assert_eq!(meta(meta_keys::GENERATED).as_deref(), Some("1"));
        assert_eq!(meta(meta_keys::VERSION).as_deref(), Some("9.9.9"));
        assert!(meta(meta_keys::GENERATED_DATE).is_some());
        assert_eq!(meta(meta_keys::SEO_TITLE).as_deref(), Some("Fitness App | Train Smarter"));
        assert_eq!(meta("_yoast_wpseo_metadesc").as_deref(), Some("Track workouts."));
        assert_eq!(meta("rank_math_title").as_deref(), Some("Fitness App | Train Smarter"));
        assert_eq!(meta("rank_math_focus_keyword").as_deref(), Some("fitness, workouts"));
        assert!(meta(meta_keys::ELEMENTOR_DATA).is_none());
    }

    #[tokio::test]
    async fn test_no_mirrors_means_only_own_seo_keys() {
        let store = Arc::new(InMemoryStore::default());
        let handle = materializer(&store)
            .materialize(&seo_record(), &MaterializeOptions::default())
            .await
            .unwrap();
        assert!(store.meta(handle.id, meta_keys::META_DESCRIPTION).is_some());
        assert!(store.meta(handle.id, meta_keys::SEO_KEYWORDS).is_none());
        assert!(store.meta(handle.id, "_yoast_wpseo_title").is_none());
    }

    #[tokio::test]
    async fn test_color_scheme_stored_as_custom_css() {
        let store = Arc::new(InMemoryStore::default());
        let options = MaterializeOptions {
            color_scheme: vec!["blue".into(), "dark theme".into()],
            ..Default::default()
        };
        let handle = materializer(&store).materialize(&record(), &options).await.unwrap();
        let css = store.meta(handle.id, meta_keys::CUSTOM_CSS).unwrap();
        assert!(css.contains("--primary-color: #2271b1;"));
        assert!(css.contains("--accent-color: #000000;"));
    }

    #[tokio::test]
    async fn test_elementor_meta_written() {
        let store = Arc::new(InMemoryStore::default());
        let options = MaterializeOptions {
            elementor_compatible: true,
            ..Default::default()
        };
        let handle = materializer(&store).materialize(&record(), &options).await.unwrap();
        let data = store.meta(handle.id, meta_keys::ELEMENTOR_DATA).unwrap();
        let tree: ElementorTree = serde_json::from_str(&data).unwrap();
        assert_eq!(tree.widgets()[0].settings["editor"], record().content.as_str());
        assert_eq!(store.meta(handle.id, meta_keys::ELEMENTOR_EDIT_MODE).as_deref(), Some("builder"));
    }

    #[tokio::test]
    async fn test_insert_failure_is_persistence_error() {
        let store = Arc::new(InMemoryStore::default().with_failing_inserts());
        let err = materializer(&store)
            .materialize(&record(), &MaterializeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Persistence);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_meta_failure_does_not_undo_insert() {
        let store = Arc::new(InMemoryStore::default().with_failing_meta(meta_keys::SEO_TITLE));
        let handle = materializer(&store)
            .materialize(&seo_record(), &MaterializeOptions::default())
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.meta(handle.id, meta_keys::SEO_TITLE).is_none());
        assert!(store.meta(handle.id, meta_keys::META_DESCRIPTION).is_some());
    }
}
