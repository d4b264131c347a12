//! URL handling module for Ensun-Scout
//!
//! This module builds the search-result URLs for a query and resolves the
//! relative detail links found inside company cards.

use url::{form_urlencoded, Url};

/// Default site origin
pub const DEFAULT_BASE_URL: &str = "https://ensun.io";

/// Path segment that marks a link into a company detail page
pub const COMPANY_PATH_SEGMENT: &str = "/company/";

/// Encodes a search term the way an HTML form would (spaces become `+`)
pub fn encode_query(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Builds the URL of the first result page for a query
///
/// # Examples
///
/// ```
/// use ensun_scout::url::search_url;
///
/// assert_eq!(
///     search_url("https://ensun.io", "green steel"),
///     "https://ensun.io/search?threshold=VERY_LOW&q=green+steel"
/// );
/// ```
pub fn search_url(base_url: &str, query: &str) -> String {
    format!(
        "{}/search?threshold=VERY_LOW&q={}",
        base_url.trim_end_matches('/'),
        encode_query(query)
    )
}

/// Builds the ordered list of result-page URLs for a query
///
/// Page 1 carries no page parameter; pages 2..=N append `&page=N`.
/// `page_count` is clamped to at least one page.
///
/// # Arguments
///
/// * `base_url` - The site origin (e.g. `https://ensun.io`)
/// * `query` - The raw, unencoded search term
/// * `page_count` - Number of result pages to request
pub fn build_page_urls(base_url: &str, query: &str, page_count: u32) -> Vec<String> {
    let first = search_url(base_url, query);
    let total = page_count.max(1);

    let mut urls = Vec::with_capacity(total as usize);
    urls.push(first.clone());
    for page in 2..=total {
        urls.push(format!("{}&page={}", first, page));
    }
    urls
}

/// Resolves a card's detail link against the site origin
///
/// Returns `None` for empty hrefs and hrefs that cannot be joined.
pub fn resolve_detail_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok().map(|absolute| absolute.to_string())
}

/// Returns true if an href points into a company detail page
pub fn is_company_link(href: &str) -> bool {
    href.contains(COMPANY_PATH_SEGMENT)
}
