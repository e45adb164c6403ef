use serde::{Deserialize, Serialize};

/// Minimum prompt length, in characters, accepted by the orchestrator.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Conventional upper bound for prompts. Not enforced by the pipeline.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Kind of document to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Post => "post",
            PostType::Page => "page",
        }
    }
}

/// Whether the generated page keeps the theme's header/footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterStyle {
    #[default]
    Theme,
    Custom,
}

/// Feature-access level of the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entitlement {
    #[default]
    Free,
    Pro,
}

/// Style and structure options for one generation.
///
/// `Default` is the free-tier option set; any field that differs from it
/// requires [`Entitlement::Pro`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub post_type: PostType,
    pub header_footer: HeaderFooterStyle,
    pub seo_enabled: bool,
    /// Keywords in input order. May be empty even when SEO is enabled.
    pub seo_keywords: Vec<String>,
    /// Section labels in input order.
    pub page_sections: Vec<String>,
    /// Hex codes (`#2271b1`) or free-form color names (`"dark theme"`).
    pub color_scheme: Vec<String>,
    pub elementor_compatible: bool,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post_type(mut self, post_type: PostType) -> Self {
        self.post_type = post_type;
        self
    }

    pub fn with_header_footer(mut self, style: HeaderFooterStyle) -> Self {
        self.header_footer = style;
        self
    }

    /// Enable SEO output with the given keywords (an empty list is fine).
    pub fn with_seo(mut self, keywords: Vec<String>) -> Self {
        self.seo_enabled = true;
        self.seo_keywords = keywords;
        self
    }

    pub fn with_page_sections(mut self, sections: Vec<String>) -> Self {
        self.page_sections = sections;
        self
    }

    pub fn with_color_scheme(mut self, colors: Vec<String>) -> Self {
        self.color_scheme = colors;
        self
    }

    pub fn with_elementor(mut self, enabled: bool) -> Self {
        self.elementor_compatible = enabled;
        self
    }

    /// Split comma-separated form input into trimmed, non-empty tokens.
    ///
    /// ```
    /// use pagegen::types::GenerationOptions;
    ///
    /// let sections = GenerationOptions::split_list("Header, Features,, Footer ");
    /// assert_eq!(sections, vec!["Header", "Features", "Footer"]);
    /// ```
    pub fn split_list(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Names of every field that differs from the free default set.
    pub fn pro_features_in_use(&self) -> Vec<&'static str> {
        let defaults = Self::default();
        let mut used = Vec::new();
        if self.post_type != defaults.post_type {
            used.push("post_type");
        }
        if self.header_footer != defaults.header_footer {
            used.push("header_footer");
        }
        if self.seo_enabled != defaults.seo_enabled {
            used.push("seo_enabled");
        }
        if self.seo_keywords != defaults.seo_keywords {
            used.push("seo_keywords");
        }
        if self.page_sections != defaults.page_sections {
            used.push("page_sections");
        }
        if self.color_scheme != defaults.color_scheme {
            used.push("color_scheme");
        }
        if self.elementor_compatible != defaults.elementor_compatible {
            used.push("elementor_compatible");
        }
        used
    }
}

/// One user submission: the prompt plus its options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Canonical result of normalizing provider output.
///
/// `title` and `content` are always present. The SEO fields are only set
/// when SEO output was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

impl ContentRecord {
    pub fn has_seo(&self) -> bool {
        self.seo_title.is_some() || self.meta_description.is_some()
    }
}
