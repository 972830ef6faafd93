use url::form_urlencoded;
use url::Url;

/// Campaign/click-id/referrer-style query keys that never identify content.
const TRACKING_QUERY_KEYS: &[&str] = &[
    "fbclid",
    "gclid",
    "igshid",
    "mc_cid",
    "mc_eid",
    "ref",
    "ref_src",
    "source",
    "utm_campaign",
    "utm_content",
    "utm_medium",
    "utm_source",
    "utm_term",
];

/// Normalize a raw URL into a comparable key, or `None` if the URL is not a
/// usable http(s) location. Two URLs are the same candidate iff their
/// canonical forms are byte-equal. Idempotent.
pub fn canonicalize(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    let host = parsed.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }
    let mut host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if let Some(port) = parsed.port() {
        host = format!("{host}:{port}");
    }

    let path = parsed.path();
    let path = if path == "/" {
        "/"
    } else {
        path.trim_end_matches('/')
    };

    let query = parsed.query().map(filter_query).unwrap_or_default();

    let mut canonical = format!("{}://{}{}", parsed.scheme(), host, path);
    if !query.is_empty() {
        canonical.push('?');
        canonical.push_str(&query);
    }
    Some(canonical)
}

/// Re-encode a query string keeping pair order, dropping blank values and
/// tracking keys.
fn filter_query(query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        if TRACKING_QUERY_KEYS.contains(&key.to_lowercase().as_str()) {
            continue;
        }
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

/// The last two dot-separated labels of the URL's host (`news.example.com`
/// → `example.com`), or the bare host when it has fewer labels.
pub fn root_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        Some(labels[labels.len() - 2..].join("."))
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_schemes_and_missing_hosts() {
        assert_eq!(canonicalize("ftp://example.com/a"), None);
        assert_eq!(canonicalize("data:image/png;base64,xyz"), None);
        assert_eq!(canonicalize("not a url"), None);
        assert_eq!(canonicalize(""), None);
    }

    #[test]
    fn lowercases_host_and_strips_www() {
        assert_eq!(
            canonicalize("https://WWW.Example.COM/Photo"),
            Some("https://example.com/Photo".to_string())
        );
    }

    #[test]
    fn strips_trailing_slashes_but_keeps_root() {
        assert_eq!(
            canonicalize("https://example.com/a/b/"),
            Some("https://example.com/a/b".to_string())
        );
        assert_eq!(
            canonicalize("https://example.com/a//"),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(
            canonicalize("https://example.com/"),
            Some("https://example.com/".to_string())
        );
        assert_eq!(
            canonicalize("https://example.com"),
            Some("https://example.com/".to_string())
        );
    }

    #[test]
    fn strips_tracking_params_and_fragment_preserving_order() {
        assert_eq!(
            canonicalize("https://example.com/p?utm_source=x&b=2&a=1&fbclid=abc#frag"),
            Some("https://example.com/p?b=2&a=1".to_string())
        );
    }

    #[test]
    fn drops_blank_values() {
        assert_eq!(
            canonicalize("https://example.com/p?a=&b=2"),
            Some("https://example.com/p?b=2".to_string())
        );
    }

    #[test]
    fn tracked_param_only_difference_canonicalizes_identically() {
        let a = canonicalize("https://www.example.com/photo/1?utm_source=x").unwrap();
        let b = canonicalize("https://example.com/photo/1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let inputs = [
            "https://WWW.Example.com/a/b/?utm_source=x&q=dog%20park&ref=tw#x",
            "http://example.com",
            "https://news.site.org/path/?a=1&a=2",
            "https://example.com:8080/a/",
        ];
        for input in inputs {
            let once = canonicalize(input).unwrap();
            let twice = canonicalize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn keeps_explicit_non_default_port() {
        assert_eq!(
            canonicalize("https://example.com:8443/a"),
            Some("https://example.com:8443/a".to_string())
        );
    }

    #[test]
    fn root_domain_takes_last_two_labels() {
        assert_eq!(root_domain("https://news.example.com/a"), Some("example.com".to_string()));
        assert_eq!(root_domain("https://example.com/a"), Some("example.com".to_string()));
        assert_eq!(root_domain("http://localhost/a"), Some("localhost".to_string()));
        assert_eq!(root_domain("nonsense"), None);
    }
}
