//! Structured document bodies.
//!
//! - [`html_to_blocks`] converts generated HTML into Gutenberg block markup,
//!   one block per heading, non-empty paragraph and list. When nothing
//!   matches, the whole HTML becomes a single `wp:html` block.
//! - [`ElementorTree`] wraps HTML verbatim in one
//!   section → column → text-editor widget, the layout Elementor expects
//!   in `_elementor_data`.

use crate::html::element_text;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One Gutenberg block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, inner_html: String },
    Paragraph { inner_html: String },
    List { ordered: bool, inner_html: String },
    /// Raw HTML block, used when no structure was recognized.
    Html { html: String },
}

impl Block {
    /// Block name as written in the comment delimiter.
    pub fn name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::Html { .. } => "html",
        }
    }

    /// Serialize to Gutenberg comment-delimited markup.
    pub fn serialize(&self) -> String {
        match self {
            Block::Heading { level, inner_html } => {
                let attrs = if *level == 2 {
                    String::new()
                } else {
                    format!(" {{\"level\":{}}}", level)
                };
                format!(
                    "<!-- wp:heading{attrs} -->\n<h{level} class=\"wp-block-heading\">{inner_html}</h{level}>\n<!-- /wp:heading -->"
                )
            }
            Block::Paragraph { inner_html } => {
                format!("<!-- wp:paragraph -->\n<p>{}</p>\n<!-- /wp:paragraph -->", inner_html)
            }
            Block::List { ordered, inner_html } => {
                let (attrs, tag) = if *ordered {
                    (" {\"ordered\":true}", "ol")
                } else {
                    ("", "ul")
                };
                format!(
                    "<!-- wp:list{attrs} -->\n<{tag} class=\"wp-block-list\">{inner_html}</{tag}>\n<!-- /wp:list -->"
                )
            }
            Block::Html { html } => format!("<!-- wp:html -->\n{}\n<!-- /wp:html -->", html),
        }
    }
}

/// Convert HTML into blocks, in document order. Never returns an empty list.
///
/// Only headings, non-empty paragraphs and lists become blocks. Once any of
/// them matches, everything else (bare text, `<img>`, `<table>`,
/// `<blockquote>`, ...) is dropped; the whole input becomes one `wp:html`
/// block only when nothing matches.
pub fn html_to_blocks(html: &str) -> Vec<Block> {
    let fragment = Html::parse_fragment(html);
    let mut blocks = Vec::new();
    collect_blocks(fragment.root_element(), &mut blocks);

    if blocks.is_empty() {
        blocks.push(Block::Html {
            html: html.to_string(),
        });
    }
    blocks
}

fn collect_blocks(parent: ElementRef<'_>, out: &mut Vec<Block>) {
    for child in parent.children() {
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };
        match element.value().name() {
            name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let level = name[1..].parse::<u8>().unwrap_or(2);
                out.push(Block::Heading {
                    level,
                    inner_html: element.inner_html(),
                });
            }
            "p" => {
                if !element_text(&element).trim().is_empty() {
                    out.push(Block::Paragraph {
                        inner_html: element.inner_html(),
                    });
                }
            }
            tag @ ("ul" | "ol") => out.push(Block::List {
                ordered: tag == "ol",
                inner_html: element.inner_html(),
            }),
            _ => collect_blocks(element, out),
        }
    }
}

/// Join serialized blocks into a post body.
pub fn serialize_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::serialize)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Elementor element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Section,
    Column,
    Widget,
}

/// One node of Elementor's element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementorNode {
    pub id: String,
    pub el_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub elements: Vec<ElementorNode>,
    #[serde(default)]
    pub is_inner: bool,
}

impl ElementorNode {
    fn new(el_type: ElementType, settings: Map<String, Value>, elements: Vec<ElementorNode>) -> Self {
        Self {
            id: element_id(),
            el_type,
            widget_type: None,
            settings,
            elements,
            is_inner: false,
        }
    }
}

/// Elementor page data: a list of top-level sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementorTree {
    pub sections: Vec<ElementorNode>,
}

impl ElementorTree {
    /// Wrap `html` verbatim in section → full-width column → text widget.
    pub fn wrap_html(html: &str) -> Self {
        let mut widget_settings = Map::new();
        widget_settings.insert("editor".into(), Value::String(html.to_string()));
        let mut widget = ElementorNode::new(ElementType::Widget, widget_settings, Vec::new());
        widget.widget_type = Some("text-editor".into());

        let mut column_settings = Map::new();
        column_settings.insert("_column_size".into(), Value::from(100));
        let column = ElementorNode::new(ElementType::Column, column_settings, vec![widget]);

        let section = ElementorNode::new(ElementType::Section, Map::new(), vec![column]);
        Self {
            sections: vec![section],
        }
    }

    /// All widget nodes, depth-first.
    pub fn widgets(&self) -> Vec<&ElementorNode> {
        fn walk<'a>(nodes: &'a [ElementorNode], out: &mut Vec<&'a ElementorNode>) {
            for node in nodes {
                if node.el_type == ElementType::Widget {
                    out.push(node);
                }
                walk(&node.elements, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.sections, &mut out);
        out
    }

    /// JSON for the `_elementor_data` meta value.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Elementor-style element id: 7 lowercase hex digits.
fn element_id() -> String {
    format!("{:07x}", fastrand::u32(..0x1000_0000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_paragraphs_lists_in_order() {
        let html = "<h1>Title</h1><p>Intro</p><h3>Sub</h3><ul><li>a</li></ul><ol><li>b</li></ol>";
        let blocks = html_to_blocks(html);
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, inner_html: "Title".into() },
                Block::Paragraph { inner_html: "Intro".into() },
                Block::Heading { level: 3, inner_html: "Sub".into() },
                Block::List { ordered: false, inner_html: "<li>a</li>".into() },
                Block::List { ordered: true, inner_html: "<li>b</li>".into() },
            ]
        );
    }

    #[test]
    fn test_empty_paragraphs_skipped() {
        let blocks = html_to_blocks("<p>  </p><p><br></p><p>Real</p>");
        assert_eq!(blocks, vec![Block::Paragraph { inner_html: "Real".into() }]);
    }

    #[test]
    fn test_containers_are_descended() {
        let html = "<section class=\"hero\"><div><h2>Hero</h2><p>Copy</p></div></section>";
        let names: Vec<_> = html_to_blocks(html).iter().map(Block::name).collect();
        assert_eq!(names, vec!["heading", "paragraph"]);
    }

    #[test]
    fn test_nested_list_is_one_block() {
        let html = "<ul><li>a<ul><li>nested</li></ul></li></ul>";
        let blocks = html_to_blocks(html);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::List { ordered: false, inner_html } if inner_html.contains("nested")));
    }

    #[test]
    fn test_unmatched_siblings_are_dropped() {
        let html = "Loose text<h2>Kept</h2><table><tr><td>cell</td></tr></table><blockquote>q</blockquote>";
        let blocks = html_to_blocks(html);
        assert_eq!(blocks, vec![Block::Heading { level: 2, inner_html: "Kept".into() }]);
    }

    #[test]
    fn test_unstructured_html_falls_back_to_html_block() {
        let html = "<div><img src=\"a.png\"></div>";
        assert_eq!(html_to_blocks(html), vec![Block::Html { html: html.into() }]);
        assert_eq!(html_to_blocks(""), vec![Block::Html { html: String::new() }]);
    }

    #[test]
    fn test_block_serialization() {
        assert_eq!(
            Block::Heading { level: 2, inner_html: "Hi".into() }.serialize(),
            "<!-- wp:heading -->\n<h2 class=\"wp-block-heading\">Hi</h2>\n<!-- /wp:heading -->"
        );
        assert_eq!(
            Block::Heading { level: 4, inner_html: "Hi".into() }.serialize(),
            "<!-- wp:heading {\"level\":4} -->\n<h4 class=\"wp-block-heading\">Hi</h4>\n<!-- /wp:heading -->"
        );
        assert_eq!(
            Block::List { ordered: true, inner_html: "<li>x</li>".into() }.serialize(),
            "<!-- wp:list {\"ordered\":true} -->\n<ol class=\"wp-block-list\"><li>x</li></ol>\n<!-- /wp:list -->"
        );
        assert_eq!(
            serialize_blocks(&[
                Block::Paragraph { inner_html: "a".into() },
                Block::Html { html: "<hr>".into() },
            ]),
            "<!-- wp:paragraph -->\n<p>a</p>\n<!-- /wp:paragraph -->\n\n<!-- wp:html -->\n<hr>\n<!-- /wp:html -->"
        );
    }

    #[test]
    fn test_elementor_wraps_content_verbatim() {
        let html = "<h1>Fitness App</h1><p>Get fit.</p><script>x()</script>";
        let tree = ElementorTree::wrap_html(html);
        let widgets = tree.widgets();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].widget_type.as_deref(), Some("text-editor"));
        assert_eq!(widgets[0].settings["editor"], html);

        let section = &tree.sections[0];
        assert_eq!(section.el_type, ElementType::Section);
        assert_eq!(section.elements[0].el_type, ElementType::Column);
        assert_eq!(section.elements[0].settings["_column_size"], 100);
    }

    #[test]
    fn test_elementor_json_shape() {
        let tree = ElementorTree::wrap_html("<p>x</p>");
        let json: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        let section = &json[0];
        assert_eq!(section["elType"], "section");
        assert_eq!(section["isInner"], false);
        assert_eq!(section["id"].as_str().unwrap().len(), 7);
        assert_eq!(section["elements"][0]["elements"][0]["widgetType"], "text-editor");

        let back: ElementorTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
