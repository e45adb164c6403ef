//! Color-scheme resolution and the per-document stylesheet.

use serde::{Deserialize, Serialize};

/// Wrapper class the stylesheet is scoped to.
pub const CONTENT_CLASS: &str = "ai-pagegen-content";

/// Primary, secondary and accent colors, as CSS hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTriplet {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ColorTriplet {
    fn new(primary: &str, secondary: &str, accent: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
        }
    }

    pub fn blue() -> Self {
        Self::new("#2271b1", "#ffffff", "#000000")
    }

    pub fn dark() -> Self {
        Self::new("#1a1a1a", "#ffffff", "#333333")
    }

    pub fn green() -> Self {
        Self::new("#00a32a", "#ffffff", "#000000")
    }
}

impl Default for ColorTriplet {
    fn default() -> Self {
        Self::blue()
    }
}

fn is_hex_color(token: &str) -> bool {
    let Some(digits) = token.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolve user color tokens to a triplet.
///
/// With any `#` in the input, valid hex tokens are taken in order and
/// missing slots are padded from the default scheme; `None` if none are
/// valid. Otherwise the text is matched against named schemes (blue, dark,
/// green) and anything unrecognized resolves to blue. An empty input means
/// no styling.
pub fn resolve_color_scheme(tokens: &[String]) -> Option<ColorTriplet> {
    if tokens.iter().all(|t| t.trim().is_empty()) {
        return None;
    }
    let joined = tokens.join(",");

    if joined.contains('#') {
        let hex: Vec<&str> = joined
            .split(',')
            .map(str::trim)
            .filter(|t| is_hex_color(t))
            .take(3)
            .collect();
        if hex.is_empty() {
            return None;
        }
        let defaults = ColorTriplet::default();
        return Some(ColorTriplet {
            primary: hex[0].to_string(),
            secondary: hex.get(1).map_or(defaults.secondary, |c| c.to_string()),
            accent: hex.get(2).map_or(defaults.accent, |c| c.to_string()),
        });
    }

    let lower = joined.trim().to_lowercase();
    let triplet = if lower.contains("blue") {
        ColorTriplet::blue()
    } else if lower.contains("dark") {
        ColorTriplet::dark()
    } else if lower.contains("green") {
        ColorTriplet::green()
    } else {
        ColorTriplet::default()
    };
    Some(triplet)
}

/// Stylesheet for one document, scoped to [`CONTENT_CLASS`].
pub fn generate_css(colors: &ColorTriplet) -> String {
    let ColorTriplet {
        primary,
        secondary,
        accent,
    } = colors;
    let scope = format!(".{}", CONTENT_CLASS);
    format!(
        "{scope} {{
    --primary-color: {primary};
    --secondary-color: {secondary};
    --accent-color: {accent};
}}

{scope} h1,
{scope} h2,
{scope} h3 {{
    color: {primary};
}}

{scope} .button,
{scope} .btn {{
    background-color: {primary};
    color: {secondary};
    border: none;
    padding: 10px 20px;
    border-radius: 4px;
    text-decoration: none;
    display: inline-block;
}}

{scope} .button:hover,
{scope} .btn:hover {{
    background-color: {accent};
}}

{scope} .highlight {{
    background-color: {secondary};
    color: {accent};
    padding: 2px 4px;
    border-radius: 2px;
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_scheme_matches_in_priority_order() {
        assert_eq!(resolve_color_scheme(&tokens(&["blue", "dark theme"])), Some(ColorTriplet::blue()));
        assert_eq!(resolve_color_scheme(&tokens(&["Dark Mode"])), Some(ColorTriplet::dark()));
        assert_eq!(resolve_color_scheme(&tokens(&["forest green"])), Some(ColorTriplet::green()));
    }

    #[test]
    fn test_unrecognized_name_defaults_to_blue() {
        assert_eq!(resolve_color_scheme(&tokens(&["sunset orange"])), Some(ColorTriplet::blue()));
    }

    #[test]
    fn test_hex_tokens_taken_in_order_and_padded() {
        let colors = resolve_color_scheme(&tokens(&["#abc", "nope", "#123456"])).unwrap();
        assert_eq!(colors.primary, "#abc");
        assert_eq!(colors.secondary, "#123456");
        assert_eq!(colors.accent, "#000000");

        let four = resolve_color_scheme(&tokens(&["#111", "#222", "#333", "#444"])).unwrap();
        assert_eq!(four.accent, "#333");
    }

    #[test]
    fn test_invalid_hex_means_no_styling() {
        assert_eq!(resolve_color_scheme(&tokens(&["#zzz", "#12345"])), None);
        assert_eq!(resolve_color_scheme(&[]), None);
        assert_eq!(resolve_color_scheme(&tokens(&[" "])), None);
    }

    #[test]
    fn test_css_is_scoped_and_uses_triplet() {
        let css = generate_css(&ColorTriplet::dark());
        assert!(css.starts_with(".ai-pagegen-content {"));
        assert!(css.contains("--primary-color: #1a1a1a;"));
        assert!(css.contains("--accent-color: #333333;"));
        assert!(css.contains(".ai-pagegen-content .btn:hover {\n    background-color: #333333;"));
        assert!(css.contains(".ai-pagegen-content .highlight {\n    background-color: #ffffff;\n    color: #333333;"));
        for rule in css.split("}\n").filter(|r| r.contains('{')) {
            assert!(rule.trim_start().starts_with(".ai-pagegen-content"), "unscoped rule: {}", rule);
        }
    }
}
