use http::{request::Parts, HeaderMap, Uri};

use crate::util;

/// Borrowed view of one request in flight through the host.
///
/// The request target is read-only, the header map is mutable.
#[derive(Debug)]
pub struct Intercepted<'a> {
    uri: &'a Uri,
    headers: &'a mut HeaderMap,
}

impl<'a> Intercepted<'a> {
    pub fn new(uri: &'a Uri, headers: &'a mut HeaderMap) -> Self {
        Self { uri, headers }
    }

    pub fn from_parts(parts: &'a mut Parts) -> Self {
        Self::new(&parts.uri, &mut parts.headers)
    }

    /// The request target.
    pub fn uri(&self) -> &Uri {
        self.uri
    }

    /// Path of the request target, query string included.
    ///
    /// Returns `None` when the target has no path at all, as for the authority-form used by
    /// `CONNECT`.
    pub fn path(&self) -> Option<&str> {
        self.uri.path_and_query().map(|path| path.as_str())
    }

    /// Full URL of the request.
    ///
    /// Origin-form targets are completed with the `Host` header and the forwarded scheme.
    pub fn url(&self) -> String {
        util::http_full_url(self.uri, self.headers)
    }

    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.headers
    }
}
