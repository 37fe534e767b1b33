use url::Url;

/// Query parameters that carry product identity and survive normalization.
/// Everything else (tracking codes, sort orders, session ids) is dropped.
const SIGNIFICANT_PARAMS: &[&str] = &["product_id", "sku", "item", "pid"];

/// Normalizes a URL into the canonical form used for deduplication
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` if a base is given
/// 2. Lowercase the host (the `url` crate does this on parse)
/// 3. Keep scheme + host (+ port) + path
/// 4. Strip trailing slashes from the path
/// 5. Drop the fragment
/// 6. Keep only the significant query parameters, sorted alphabetically,
///    first value wins for repeated keys
///
/// Two raw URLs that differ only in parameter order, irrelevant
/// parameters, or a trailing slash normalize identically.
///
/// # Failure policy
///
/// Normalization never fails: if the URL cannot be parsed, the raw input
/// is returned verbatim so that malformed links still participate in
/// deduplication instead of crashing the crawl. The function is pure and
/// idempotent: `normalize_url(&normalize_url(u, b), None) == normalize_url(u, b)`.
///
/// # Examples
///
/// ```
/// use shopscout::url::normalize_url;
///
/// let n = normalize_url("https://Shop.Example.com/item/?ref=abc&sku=9", None);
/// assert_eq!(n, "https://shop.example.com/item?sku=9");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> String {
    let parsed = match base {
        Some(b) => b.join(raw),
        None => Url::parse(raw),
    };

    let url = match parsed {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("Failed to parse URL {}: {}", raw, e);
            return raw.to_string();
        }
    };

    let host = match url.host_str() {
        Some(h) => h,
        None => return raw.to_string(),
    };

    let mut normalized = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }

    let path = url.path().trim_end_matches('/');
    normalized.push_str(path);

    let query = significant_query(&url);
    if !query.is_empty() {
        normalized.push('?');
        normalized.push_str(&query);
    }

    normalized
}

/// Resolves a raw href to an absolute URL string, or None if it cannot
/// be resolved or uses a non-HTTP scheme.
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    match base.join(href) {
        Ok(abs) if abs.scheme() == "http" || abs.scheme() == "https" => Some(abs.to_string()),
        _ => None,
    }
}

/// Builds the filtered, alphabetically ordered query string
fn significant_query(url: &Url) -> String {
    let mut kept: Vec<(String, String)> = Vec::new();

    for (key, value) in url.query_pairs() {
        if !SIGNIFICANT_PARAMS.contains(&key.as_ref()) {
            continue;
        }
        // First occurrence of a key wins
        if kept.iter().any(|(k, _)| k == key.as_ref()) {
            continue;
        }
        kept.push((key.to_string(), value.to_string()));
    }

    kept.sort_by(|a, b| a.0.cmp(&b.0));

    kept.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
