use url::Url;

/// Multi-part public suffixes that need three labels for the registered
/// domain instead of two. Not an exhaustive public-suffix list; covers
/// the country-code suffixes commonly seen on commerce storefronts.
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "gov.uk", "ac.uk", "me.uk", "co.jp", "ne.jp", "or.jp", "com.au", "net.au",
    "org.au", "co.nz", "com.br", "com.mx", "com.ar", "com.cn", "com.tw", "com.hk", "com.sg",
    "co.in", "co.kr", "co.za",
];

/// Extracts the registered domain (eTLD+1) from a hostname
///
/// `shop.example.com` → `example.com`, `www.store.co.uk` → `store.co.uk`.
/// IP addresses and single-label hosts (e.g. `localhost`) are returned
/// unchanged so that test servers stay addressable.
///
/// # Examples
///
/// ```
/// use shopscout::url::registered_domain;
///
/// assert_eq!(registered_domain("shop.example.com"), "example.com");
/// assert_eq!(registered_domain("www.store.co.uk"), "store.co.uk");
/// assert_eq!(registered_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn registered_domain(host: &str) -> String {
    let host = host.to_lowercase();

    // IP literals have no registrable parts
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let keep = if MULTI_PART_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };

    if labels.len() <= keep {
        host
    } else {
        labels[labels.len() - keep..].join(".")
    }
}

/// Extracts the registered domain from a parsed URL, keeping the port
/// for non-standard-port hosts so that local test servers form distinct
/// crawl targets.
pub fn registered_domain_of_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let domain = registered_domain(host);
    match url.port() {
        Some(port) => Some(format!("{}:{}", domain, port)),
        None => Some(domain),
    }
}
