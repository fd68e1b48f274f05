use crate::title::ArticleTitle;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

/// Page HTML from the REST endpoint links to other articles by relative path.
pub const ARTICLE_LINK_PREFIX: &str = "./";

/// Namespaces whose pages are not articles.
const NON_ARTICLE_NAMESPACES: &[&str] = &[
    "Book",
    "Category",
    "Draft",
    "File",
    "Help",
    "Image",
    "Media",
    "MediaWiki",
    "Module",
    "Portal",
    "Special",
    "Talk",
    "Template",
    "TimedText",
    "User",
    "Wikipedia",
];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("'a[href]' is a valid selector"));

/// Turns a fetched document into the set of article titles it links to.
///
/// Implementations must be pure and must normalize titles through
/// [`ArticleTitle::parse`]. The returned set is ordered, which fixes the order
/// in which the search evaluates a page's links.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, document: &str) -> BTreeSet<ArticleTitle>;
}

/// Extracts same-site article links from rendered page HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Map one `href` to an article title, or `None` for anything that is not
    /// a same-site article link.
    pub fn article_from_href(href: &str) -> Option<ArticleTitle> {
        let relative = href.strip_prefix(ARTICLE_LINK_PREFIX)?;

        if let Some((_, query)) = relative.split_once('?')
            && query.split('&').any(|pair| pair == "redlink=1")
        {
            return None;
        }

        let title = ArticleTitle::parse(relative).ok()?;
        if title.namespace().is_some_and(is_non_article_namespace) {
            return None;
        }
        Some(title)
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, document: &str) -> BTreeSet<ArticleTitle> {
        let parsed = Html::parse_document(document);

        let links: BTreeSet<ArticleTitle> = parsed
            .select(&ANCHOR_SELECTOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(Self::article_from_href)
            .collect();

        debug!("Extracted {} article links", links.len());
        links
    }
}

fn is_non_article_namespace(namespace: &str) -> bool {
    let namespace = namespace.replace('_', " ");
    namespace.ends_with(" talk")
        || NON_ARTICLE_NAMESPACES
            .iter()
            .any(|ns| ns.eq_ignore_ascii_case(&namespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(links: &BTreeSet<ArticleTitle>) -> Vec<&str> {
        links.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_extracts_relative_article_links() {
        let html = r#"<html><body>
            <a href="./Footloose_(1984_film)" rel="mw:WikiLink">Footloose</a>
            <a href="./Kevin_Bacon">Kevin Bacon</a>
        </body></html>"#;

        let links = HtmlLinkExtractor::new().extract_links(html);
        assert_eq!(titles(&links), vec!["Footloose_(1984_film)", "Kevin_Bacon"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r##"<a href="./Kevin_Bacon">a</a>
            <a href="./Kevin_Bacon#Career">b</a>
            <a href="./Kevin%20Bacon">c</a>"##;

        let links = HtmlLinkExtractor::new().extract_links(html);
        assert_eq!(titles(&links), vec!["Kevin_Bacon"]);
    }

    #[test]
    fn test_ignores_external_and_anchor_links() {
        let html = r##"<a href="https://example.com/Kevin_Bacon">ext</a>
            <a href="#cite_note-1">cite</a>
            <a href="/wiki/Kevin_Bacon">absolute</a>
            <a>no href</a>"##;

        let links = HtmlLinkExtractor::new().extract_links(html);
        assert!(links.is_empty());
    }

    #[test]
    fn test_ignores_non_article_namespaces() {
        let html = r#"<a href="./File:Kevin_Bacon.jpg">file</a>
            <a href="./Special:BookSources/123">special</a>
            <a href="./Category:American_actors">category</a>
            <a href="./Talk:Kevin_Bacon">talk</a>
            <a href="./User_talk:Someone">user talk</a>
            <a href="./Star_Wars:_Episode_IV">film</a>"#;

        let links = HtmlLinkExtractor::new().extract_links(html);
        assert_eq!(titles(&links), vec!["Star_Wars:_Episode_IV"]);
    }

    #[test]
    fn test_ignores_red_links() {
        let html = r#"<a href="./Missing_Page?action=edit&amp;redlink=1">missing</a>
            <a href="./Kevin_Bacon">ok</a>"#;

        let links = HtmlLinkExtractor::new().extract_links(html);
        assert_eq!(titles(&links), vec!["Kevin_Bacon"]);
    }

    #[test]
    fn test_malformed_document_yields_no_links() {
        let links = HtmlLinkExtractor::new().extract_links("<<<not html at all");
        assert!(links.is_empty());

        let links = HtmlLinkExtractor::new().extract_links("");
        assert!(links.is_empty());
    }

    #[test]
    fn test_decodes_percent_encoded_hrefs() {
        let links = HtmlLinkExtractor::new().extract_links(r#"<a href="./Caf%C3%A9">x</a>"#);
        assert_eq!(titles(&links), vec!["Café"]);
    }
}
