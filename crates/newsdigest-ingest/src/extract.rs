//! Description-metadata extraction from article HTML.

use std::sync::LazyLock;

use regex::Regex;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});

/// Keys tried in order; the first non-empty one wins.
const DESCRIPTION_KEYS: [&str; 3] = ["og:description", "twitter:description", "description"];

/// Extract the page's declared description.
///
/// Looks at `og:description`, then `twitter:description`, then
/// `<meta name="description">`, matching on either `property` or `name` and
/// in either attribute order. Entities are decoded. Returns `None` when no
/// key carries non-blank content.
pub fn extract_description(html: &str) -> Option<String> {
    let metas: Vec<(String, String)> = META_TAG_RE
        .find_iter(html)
        .filter_map(|m| meta_key_and_content(m.as_str()))
        .collect();

    DESCRIPTION_KEYS.iter().find_map(|wanted| {
        metas
            .iter()
            .find(|(key, content)| key == wanted && !content.trim().is_empty())
            .map(|(_, content)| {
                html_escape::decode_html_entities(content.trim()).into_owned()
            })
    })
}

/// Returns `(key, content)` for a `<meta>` tag that has both a
/// `property`/`name` key and a `content` attribute.
fn meta_key_and_content(tag: &str) -> Option<(String, String)> {
    let mut key = None;
    let mut content = None;

    for cap in ATTR_RE.captures_iter(tag) {
        let name = cap.get(1)?.as_str().to_ascii_lowercase();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map_or("", |m| m.as_str());
        match name.as_str() {
            "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
            "content" => content = Some(value.to_string()),
            _ => {}
        }
    }

    Some((key?, content?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_og_description() {
        let html = r#"<html><head>
            <meta property="og:title" content="EO plant">
            <meta property="og:description" content="BASF plans a new EO plant in Antwerp.">
        </head></html>"#;
        assert_eq!(
            extract_description(html).as_deref(),
            Some("BASF plans a new EO plant in Antwerp.")
        );
    }

    #[test]
    fn handles_swapped_attribute_order_and_single_quotes() {
        let html = r"<meta content='Capacity doubles by 2026.' property='og:description' />";
        assert_eq!(
            extract_description(html).as_deref(),
            Some("Capacity doubles by 2026.")
        );
    }

    #[test]
    fn prefers_og_over_plain_description() {
        let html = r#"
            <meta name="description" content="Generic site blurb.">
            <meta property="og:description" content="Article-specific summary.">"#;
        assert_eq!(
            extract_description(html).as_deref(),
            Some("Article-specific summary.")
        );
    }

    #[test]
    fn falls_back_to_plain_description() {
        let html = r#"<meta name="description" content="Only the plain description.">"#;
        assert_eq!(
            extract_description(html).as_deref(),
            Some("Only the plain description.")
        );
    }

    #[test]
    fn skips_blank_og_description() {
        let html = r#"
            <meta property="og:description" content="   ">
            <meta name="twitter:description" content="Twitter card text.">"#;
        assert_eq!(extract_description(html).as_deref(), Some("Twitter card text."));
    }

    #[test]
    fn decodes_entities() {
        let html = r#"<meta property="og:description" content="Dow &amp; BASF sign MoU">"#;
        assert_eq!(extract_description(html).as_deref(), Some("Dow & BASF sign MoU"));
    }

    #[test]
    fn missing_metadata_returns_none() {
        assert!(extract_description("<html><head><title>x</title></head></html>").is_none());
    }
}
