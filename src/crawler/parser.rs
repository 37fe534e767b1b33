//! HTML parsing for link extraction
//!
//! Extraction stays deliberately raw: every `<a href>` value comes back
//! in document order, untouched. Resolution, scheme filtering and
//! deduplication are the frontier's job, so the same rules apply to
//! links no matter which fetch path produced the HTML.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the <title> tag)
    pub title: Option<String>,

    /// Raw href values of all anchors, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts the title and anchor hrefs
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
