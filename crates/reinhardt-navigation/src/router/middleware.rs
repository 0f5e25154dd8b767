//! Middleware and route guards.

use super::params::Params;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, ready};
use std::future::Future;
use std::rc::Rc;

/// The navigation being decided on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
	/// Normalized target path.
	pub to_path: String,
	/// Parameters captured for the target route.
	pub to_params: Params,
	/// Path of the current route, if any.
	pub from_path: Option<String>,
}

/// What a middleware or guard wants to happen next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
	/// Proceed to the next step.
	Continue,
	/// Abandon this navigation and start a new one to the given path.
	RedirectTo(String),
	/// Abandon this navigation silently.
	Abort,
}

impl From<bool> for NavigationDecision {
	fn from(allowed: bool) -> Self {
		if allowed { Self::Continue } else { Self::Abort }
	}
}

/// A hook invoked on every navigation, in registration order.
///
/// Returning anything other than [`NavigationDecision::Continue`] stops the
/// chain. A middleware whose future never resolves stalls the navigation.
pub type Middleware = Rc<dyn Fn(NavigationContext) -> LocalBoxFuture<'static, NavigationDecision>>;

/// A hook invoked before entering a single route.
pub type Guard = Rc<dyn Fn(NavigationContext) -> LocalBoxFuture<'static, NavigationDecision>>;

/// Builds a [`Middleware`] from a synchronous function.
///
/// ```
/// use reinhardt_navigation::router::{NavigationDecision, middleware_fn};
///
/// let require_login = middleware_fn(|ctx| {
///     if ctx.to_path.starts_with("/admin") {
///         NavigationDecision::RedirectTo("/login".to_string())
///     } else {
///         NavigationDecision::Continue
///     }
/// });
/// ```
pub fn middleware_fn<F>(f: F) -> Middleware
where
	F: Fn(&NavigationContext) -> NavigationDecision + 'static,
{
	Rc::new(move |ctx: NavigationContext| ready(f(&ctx)).boxed_local())
}

/// Builds a [`Middleware`] from an async function.
pub fn async_middleware<F, Fut>(f: F) -> Middleware
where
	F: Fn(NavigationContext) -> Fut + 'static,
	Fut: Future<Output = NavigationDecision> + 'static,
{
	Rc::new(move |ctx: NavigationContext| f(ctx).boxed_local())
}

/// Builds a [`Guard`] from a synchronous function.
///
/// A plain `bool` converts into [`NavigationDecision`]: `false` aborts.
pub fn guard_fn<F, D>(f: F) -> Guard
where
	F: Fn(&NavigationContext) -> D + 'static,
	D: Into<NavigationDecision>,
{
	Rc::new(move |ctx: NavigationContext| ready(f(&ctx).into()).boxed_local())
}

/// Builds a [`Guard`] from an async function.
pub fn async_guard<F, Fut, D>(f: F) -> Guard
where
	F: Fn(NavigationContext) -> Fut + 'static,
	Fut: Future<Output = D> + 'static,
	D: Into<NavigationDecision> + 'static,
{
	Rc::new(move |ctx: NavigationContext| f(ctx).map(Into::into).boxed_local())
}
