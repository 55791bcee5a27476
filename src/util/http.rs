use http::{header, HeaderMap, Uri};

/// Get the full url of a request.
///
/// Absolute and authority-form targets already carry everything. Origin-form targets are completed
/// with the `Host` header and the scheme announced by a proxy in front of us, falling back to
/// `http`. Without a `Host` header only the path is known.
pub fn http_full_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.authority().is_some() {
        return uri.to_string();
    }

    let path = uri.path_and_query().map_or("/", |path| path.as_str());
    match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => {
            let scheme = http_url_scheme(headers).unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path.to_owned(),
    }
}

/// Get the url scheme forwarded by a proxy.
pub fn http_url_scheme(headers: &HeaderMap) -> Option<&'static str> {
    // Comments in this function are quoted from MDN.
    //
    // See: https://developer.mozilla.org/en-US/docs/Web/HTTP/Reference/Headers/X-Forwarded-Proto

    // The HTTP X-Forwarded-Proto (XFP) request header is a de-facto standard header
    // for identifying the protocol (HTTP or HTTPS) that a client used to connect to a proxy or
    // load balancer.
    let x_forwarded_proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| match v.to_str() {
            Ok(value) if value.eq_ignore_ascii_case("http") => Some("http"),
            Ok(value) if value.eq_ignore_ascii_case("https") => Some("https"),
            _ => None,
        });
    if let Some(x_forwarded_proto) = x_forwarded_proto {
        return Some(x_forwarded_proto);
    }

    // A standardized version of this header is the HTTP Forwarded header, although it's much less
    // frequently used.
    headers
        .get(header::FORWARDED)
        .and_then(|v| extract_proto_from_forwarded_header(v.as_bytes()))
}

fn extract_proto_from_forwarded_header(header_value: &[u8]) -> Option<&'static str> {
    for value_per_proxy in header_value.split(|c| *c == b',') {
        for directive in value_per_proxy.split(|c| *c == b';') {
            let directive = directive.trim_ascii().to_ascii_lowercase();

            if let Some(proto) = directive.strip_prefix(b"proto=") {
                return match proto {
                    b"http" => Some("http"),
                    b"https" => Some("https"),
                    _ => None,
                };
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn check_forwarded_parser() {
        assert_eq!(
            extract_proto_from_forwarded_header(b"for=192.0.2.60;proto=http;by=203.0.113.43"),
            Some("http")
        );

        // Case insensitive
        assert_eq!(
            extract_proto_from_forwarded_header(b"Proto=httpS;by=203.0.113.43"),
            Some("https")
        );
    }

    #[test]
    fn absolute_target_is_kept() {
        let uri = Uri::from_static("https://tunnel.local:8443/api/v1/proxy/forward-to?id=7");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("other.local"));

        assert_eq!(
            http_full_url(&uri, &headers),
            "https://tunnel.local:8443/api/v1/proxy/forward-to?id=7"
        );
    }

    #[test]
    fn origin_form_uses_host_and_forwarded_scheme() {
        let uri = Uri::from_static("/api/v1/proxy/forward-to");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("tunnel.local"));
        assert_eq!(
            http_full_url(&uri, &headers),
            "http://tunnel.local/api/v1/proxy/forward-to"
        );

        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS"));
        assert_eq!(
            http_full_url(&uri, &headers),
            "https://tunnel.local/api/v1/proxy/forward-to"
        );

        headers.remove("x-forwarded-proto");
        headers.insert(
            header::FORWARDED,
            HeaderValue::from_static("for=192.0.2.60;proto=https"),
        );
        assert_eq!(
            http_full_url(&uri, &headers),
            "https://tunnel.local/api/v1/proxy/forward-to"
        );
    }

    #[test]
    fn origin_form_without_host() {
        let uri = Uri::from_static("/health");

        assert_eq!(http_full_url(&uri, &HeaderMap::new()), "/health");
    }
}
