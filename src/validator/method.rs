//! Predicate and generator shapes.

use crate::core::error::{RuntimeError, Verdict};
use crate::core::types::Value;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a predicate.
pub type PredicateFuture = BoxFuture<'static, Verdict>;

/// A fully bound rule: value in, eventual verdict out.
pub type Predicate = Arc<dyn Fn(Value) -> PredicateFuture + Send + Sync>;

/// A curried rule: init parameters in, predicate out.
pub type Generator = Arc<dyn Fn(&[Value]) -> Result<Predicate, RuntimeError> + Send + Sync>;

/// The callable carried by a validator descriptor.
#[derive(Clone)]
pub enum Method {
    /// Ready-to-run predicate, for non-initable rules.
    Predicate(Predicate),
    /// Predicate generator, for initable rules.
    Generator(Generator),
}

impl Method {
    /// Wrap a synchronous predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Verdict + Send + Sync + 'static,
    {
        Method::Predicate(predicate(f))
    }

    /// Wrap an asynchronous predicate.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Verdict> + Send + 'static,
    {
        Method::Predicate(future_predicate(f))
    }

    /// Wrap a generator producing synchronous predicates.
    pub fn generator<G, P>(g: G) -> Self
    where
        G: Fn(&[Value]) -> Result<P, RuntimeError> + Send + Sync + 'static,
        P: Fn(&Value) -> Verdict + Send + Sync + 'static,
    {
        Method::Generator(Arc::new(move |params: &[Value]| g(params).map(predicate)))
    }

    /// Wrap a generator producing asynchronous predicates.
    pub fn future_generator<G, F, Fut>(g: G) -> Self
    where
        G: Fn(&[Value]) -> Result<F, RuntimeError> + Send + Sync + 'static,
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Verdict> + Send + 'static,
    {
        Method::Generator(Arc::new(move |params: &[Value]| g(params).map(future_predicate)))
    }

    /// Whether this method needs init parameters.
    pub fn is_generator(&self) -> bool {
        matches!(self, Method::Generator(_))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Predicate(_) => f.write_str("Method::Predicate(<fn>)"),
            Method::Generator(_) => f.write_str("Method::Generator(<fn>)"),
        }
    }
}

/// Turn a synchronous closure into a [`Predicate`].
///
/// The closure runs when the predicate is called; the returned future is
/// already resolved.
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(&Value) -> Verdict + Send + Sync + 'static,
{
    Arc::new(move |value: Value| futures::future::ready(f(&value)).boxed())
}

/// Turn an async closure into a [`Predicate`].
pub fn future_predicate<F, Fut>(f: F) -> Predicate
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Verdict> + Send + 'static,
{
    Arc::new(move |value: Value| f(value).boxed())
}
