//! Rules evaluated on each intercepted request.

use std::{fmt, mem, sync::Arc};

use http::Request;

use crate::{request::Intercepted, sink::Sink};

#[doc(inline)]
pub use self::header::{HeaderInjectionRule, BYPASS_TUNNEL_REMINDER, FORWARD_TO_SUFFIX};

mod header;

/// A rule applied to every request before it is forwarded upstream.
///
/// A rule may only rewrite the headers of the request it is given. It has no error path: a request
/// the rule does not understand is left untouched.
pub trait Rule: Send + Sync {
    /// Apply the rule to the request, reporting to `sink`.
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink);
}

impl<R> Rule for &R
where
    R: Rule + ?Sized,
{
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        (**self).apply(request, sink)
    }
}

impl<R> Rule for Box<R>
where
    R: Rule + ?Sized,
{
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        (**self).apply(request, sink)
    }
}

impl<R> Rule for Arc<R>
where
    R: Rule + ?Sized,
{
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        (**self).apply(request, sink)
    }
}

/// Apply a rule to a whole [`Request`].
pub fn apply<R, B>(rule: &R, request: &mut Request<B>, sink: &dyn Sink)
where
    R: Rule + ?Sized,
{
    let mut headers = mem::take(request.headers_mut());
    rule.apply(&mut Intercepted::new(request.uri(), &mut headers), sink);
    *request.headers_mut() = headers;
}

/// Returns a [`Rule`] calling `f` on each request.
pub fn rule_fn<F>(f: F) -> RuleFn<F>
where
    F: Fn(&mut Intercepted<'_>, &dyn Sink) + Send + Sync,
{
    RuleFn { f }
}

/// [`Rule`] returned by [`rule_fn`].
#[derive(Clone, Copy)]
pub struct RuleFn<F> {
    f: F,
}

impl<F> Rule for RuleFn<F>
where
    F: Fn(&mut Intercepted<'_>, &dyn Sink) + Send + Sync,
{
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        (self.f)(request, sink)
    }
}

impl<F> fmt::Debug for RuleFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// Ordered list of rules, applied one after the other to the same request.
#[derive(Clone, Default)]
pub struct Rules {
    rules: Vec<Arc<dyn Rule>>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, evaluated after the ones already registered.
    pub fn push<R>(mut self, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Rule + 'static)> + '_ {
        self.rules.iter().map(|rule| rule.as_ref())
    }
}

impl Rule for Rules {
    fn apply(&self, request: &mut Intercepted<'_>, sink: &dyn Sink) {
        for rule in &self.rules {
            rule.apply(request, sink);
        }
    }
}

impl From<HeaderInjectionRule> for Rules {
    fn from(rule: HeaderInjectionRule) -> Self {
        Self::new().push(rule)
    }
}

impl<R> FromIterator<R> for Rules
where
    R: Rule + 'static,
{
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let rules = iter
            .into_iter()
            .map(|rule| Arc::new(rule) as Arc<dyn Rule>)
            .collect();
        Self { rules }
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("len", &self.rules.len())
            .finish()
    }
}
