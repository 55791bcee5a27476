use std::borrow::Cow;

use http::{HeaderName, HeaderValue};
use tracing::Level;

use crate::{request::Intercepted, rule::Rule, sink::Sink, Error};

/// Header asking the tunnel in front of the upstream to skip its reminder page.
#[allow(clippy::declare_interior_mutable_const)]
pub const BYPASS_TUNNEL_REMINDER: HeaderName = HeaderName::from_static("bypass-tunnel-reminder");

/// Path suffix of the requests forwarded through the tunnel.
pub const FORWARD_TO_SUFFIX: &str = "proxy/forward-to";

/// Sets a header on every request whose path ends with a given suffix.
///
/// The suffix is compared byte for byte against the end of the request path, query string
/// included, so `/proxy/forward-to/` and `/Proxy/Forward-To` do not match `proxy/forward-to`.
/// Requests without a path never match. On a match every previous value of the header is
/// replaced, and one [`INFO`] record carrying the request url is sent to the sink.
///
/// [`INFO`]: tracing::Level::INFO
#[derive(Clone, Debug)]
pub struct HeaderInjectionRule {
    suffix: Cow<'static, str>,
    name: HeaderName,
    value: HeaderValue,
    message: String,
}

impl HeaderInjectionRule {
    pub fn new(suffix: impl Into<Cow<'static, str>>, name: HeaderName, value: HeaderValue) -> Self {
        let message = format!("Added {} header to: {{}}", name);
        Self {
            suffix: suffix.into(),
            name,
            value,
            message,
        }
    }

    /// Same as [`new`], parsing the header name and value.
    ///
    /// [`new`]: Self::new
    pub fn try_new(
        suffix: impl Into<Cow<'static, str>>,
        name: &str,
        value: &str,
    ) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        Ok(Self::new(suffix, name, value))
    }

    /// `bypass-tunnel-reminder: ok` on paths ending with `proxy/forward-to`.
    pub fn bypass_tunnel_reminder() -> Self {
        Self::new(
            FORWARD_TO_SUFFIX,
            BYPASS_TUNNEL_REMINDER,
            HeaderValue::from_static("ok"),
        )
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.name
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.value
    }

    /// Whether the request path ends with the suffix.
    pub fn matches(&self, request: &Intercepted<'_>) -> bool {
        request
            .path()
            .is_some_and(|path| path.ends_with(&*self.suffix))
    }
}

impl Default for HeaderInjectionRule {
    fn default() -> Self {
        Self::bypass_tunnel_reminder()
    }
}

impl Rule for HeaderInjectionRule {
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        if !self.matches(request) {
            return;
        }

        request
            .headers_mut()
            .insert(self.name.clone(), self.value.clone());
        sink.record(Level::INFO, &self.message, &[&request.url()]);
    }
}
