//! Request interception for HTTP services.
//!
//! A [`Rule`] inspects one in-flight request and may rewrite its headers. Rules are grouped in an
//! ordered [`Rules`] list and evaluated by the host before the request is forwarded, either through
//! the [`InjectLayer`] middleware or directly with [`rule::apply`]. What a rule wants to report goes
//! to an explicit [`Sink`], by default [`TracingSink`].
//!
//! The bundled [`HeaderInjectionRule`] sets `bypass-tunnel-reminder: ok` on every request whose path
//! ends with `proxy/forward-to`:
//!
//! ```
//! use tower_header_inject::{rule, HeaderInjectionRule, NoopSink};
//!
//! let mut request = http::Request::get("http://tunnel.local/api/v1/proxy/forward-to")
//!     .body(())
//!     .unwrap();
//! rule::apply(&HeaderInjectionRule::default(), &mut request, &NoopSink);
//!
//! assert_eq!(request.headers()["bypass-tunnel-reminder"], "ok");
//! ```
//!
//! [`Rule`]: crate::rule::Rule
//! [`Rules`]: crate::rule::Rules

#[doc(inline)]
pub use self::{
    error::Error,
    inject::{Inject, InjectLayer},
    request::Intercepted,
    rule::{HeaderInjectionRule, Rule, Rules},
    sink::{NoopSink, Sink, TracingSink},
};

mod error;
pub mod inject;
mod request;
pub mod rule;
pub mod sink;
mod util;
