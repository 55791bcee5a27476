//! Middleware that applies [`Rules`] to the requests handled by a [`Service`].
//!
//! [`Service`]: tower_service::Service

use std::{
    fmt,
    sync::Arc,
    task::{Context, Poll},
};

use http::Request;
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    rule::{self, HeaderInjectionRule, Rule, Rules},
    sink::{Sink, TracingSink},
};

/// [`Layer`] that applies [`Rules`] to every request before handing it to a [`Service`].
#[derive(Clone)]
pub struct InjectLayer {
    rules: Rules,
    sink: Arc<dyn Sink>,
}

impl InjectLayer {
    /// Rules report to a [`TracingSink`].
    pub fn new(rules: impl Into<Rules>) -> Self {
        Self {
            rules: rules.into(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Layer applying only [`HeaderInjectionRule::bypass_tunnel_reminder`].
    pub fn bypass_tunnel_reminder() -> Self {
        Self::new(HeaderInjectionRule::bypass_tunnel_reminder())
    }

    /// Append a rule, evaluated after the ones already registered.
    pub fn rule<R>(mut self, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.rules = self.rules.push(rule);
        self
    }

    /// Replace the [`Sink`] rules report to.
    pub fn sink<K>(mut self, sink: K) -> Self
    where
        K: Sink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }
}

impl fmt::Debug for InjectLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectLayer")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for InjectLayer {
    type Service = Inject<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Inject {
            inner,
            rules: self.rules.clone(),
            sink: self.sink.clone(),
        }
    }
}

/// Middleware that applies [`Rules`] to every request before handing it to a [`Service`].
///
/// Responses and errors of the inner service are passed through untouched.
#[derive(Clone)]
pub struct Inject<S> {
    inner: S,
    rules: Rules,
    sink: Arc<dyn Sink>,
}

impl<S> Inject<S> {
    pub fn new(inner: S, rules: impl Into<Rules>, sink: Arc<dyn Sink>) -> Self {
        Self {
            inner,
            rules: rules.into(),
            sink,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: fmt::Debug> fmt::Debug for Inject<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("inner", &self.inner)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<S, ReqBody> Service<Request<ReqBody>> for Inject<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        rule::apply(&self.rules, &mut req, &*self.sink);
        self.inner.call(req)
    }
}
