//! System prompt assembly.
//!
//! The system prompt is built from a fixed base instruction plus clauses
//! appended in a fixed order: post-type framing, SEO, page sections,
//! Elementor, color scheme, and the closing JSON-shape instruction.

use crate::types::{GenerationOptions, PostType};

const BASE_INSTRUCTION: &str = "You are a professional content creator for WordPress. ";

/// Separator between the system prompt and the user text for
/// single-prompt providers.
pub const USER_REQUEST_SEPARATOR: &str = "\n\nUser Request: ";

/// Build the model-directed instruction string for `options`.
///
/// Pure: the same options always produce the same string. Options are not
/// validated here.
///
/// ```
/// use pagegen::prompt::build_system_prompt;
/// use pagegen::types::GenerationOptions;
///
/// let prompt = build_system_prompt(&GenerationOptions::default());
/// assert!(prompt.starts_with("You are a professional content creator"));
/// assert!(!prompt.contains("seo_title"));
/// ```
pub fn build_system_prompt(options: &GenerationOptions) -> String {
    let mut prompt = String::from(BASE_INSTRUCTION);

    match options.post_type {
        PostType::Page => prompt.push_str("Create a complete webpage with proper HTML structure. "),
        PostType::Post => prompt.push_str("Create a blog post with engaging content. "),
    }

    if options.seo_enabled {
        prompt.push_str("Include SEO-optimized content with proper heading structure (H1, H2, H3), ");
        prompt.push_str("meta description, and incorporate the keywords: ");
        prompt.push_str(&options.seo_keywords.join(", "));
        prompt.push_str(". ");
    }

    if !options.page_sections.is_empty() {
        prompt.push_str("Structure the content with these sections: ");
        prompt.push_str(&options.page_sections.join(", "));
        prompt.push_str(". ");
    }

    if options.elementor_compatible {
        prompt.push_str(
            "Make the content compatible with Elementor page builder using proper HTML structure and CSS classes. ",
        );
    }

    if !options.color_scheme.is_empty() {
        prompt.push_str("Consider this color scheme: ");
        prompt.push_str(&options.color_scheme.join(","));
        prompt.push_str(" when suggesting design elements. ");
    }

    prompt.push_str("Return the response as JSON with the following structure: ");
    prompt.push_str(r#"{"title": "Page/Post Title", "content": "HTML content", "excerpt": "Brief excerpt""#);
    if options.seo_enabled {
        prompt.push_str(
            r#", "seo_title": "SEO optimized title", "meta_description": "Meta description under 160 characters""#,
        );
    }
    prompt.push_str("}. Ensure all HTML is valid and properly formatted for WordPress.");

    prompt
}

/// The user-authored prompt, passed through unchanged.
pub fn build_user_prompt(prompt: &str) -> &str {
    prompt
}

/// Join system and user prompts for providers that take a single prompt.
pub fn combine_for_generate(system_prompt: &str, user_prompt: &str) -> String {
    format!("{}{}{}", system_prompt, USER_REQUEST_SEPARATOR, user_prompt)
}
