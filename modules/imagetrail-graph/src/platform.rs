use url::Url;

/// Label used when no source URL resolves.
pub const UNKNOWN_SOURCE: &str = "unknown source";

/// Platform tag used when the host matches no known platform.
pub const DEFAULT_PLATFORM: &str = "news";

/// Classify a URL's host into a platform tag by substring.
pub fn platform_from_url(url: &str) -> &'static str {
    let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(h) => h,
        None => return DEFAULT_PLATFORM,
    };

    if host.contains("reddit.com") {
        "reddit"
    } else if host.contains("twitter.com") || host.contains("x.com") {
        "twitter"
    } else if host.contains("facebook.com") {
        "facebook"
    } else if host.contains("instagram.com") {
        "instagram"
    } else if host.contains("tiktok.com") {
        "tiktok"
    } else if host.contains("4chan.org") {
        "4chan"
    } else if host.contains("imgur.com") {
        "imgur"
    } else {
        DEFAULT_PLATFORM
    }
}

/// Human-readable label for a URL: `host/first-path-segment`, bare host, or
/// the unknown-source sentinel.
pub fn label_from_url(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return UNKNOWN_SOURCE.to_string(),
    };

    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h.trim_start_matches("www.").to_string(),
        _ => return UNKNOWN_SOURCE.to_string(),
    };

    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()).map(str::to_string));

    match first_segment {
        Some(segment) => format!("{host}/{segment}"),
        None => host,
    }
}
