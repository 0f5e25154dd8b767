//! Client-side routing.
//!
//! This module provides:
//! - Path patterns with `:name` placeholders and first-registered-wins
//!   resolution
//! - Link interception for same-origin anchors
//! - Middleware and per-route guards
//! - The [`Router`] state machine driving the transition and renderer

mod components;
mod core;
pub(crate) mod link;
mod middleware;
mod params;
mod pattern;
mod route;

pub use components::{Link, RouterOutlet};
pub use self::core::{ErrorHandler, NavigationOutcome, Router, RouterState};
pub use link::{find_anchor, intercepted_href, should_intercept};
pub use middleware::{
	Guard, Middleware, NavigationContext, NavigationDecision, async_guard, async_middleware,
	guard_fn, middleware_fn,
};
pub use params::{FromParams, Params, PathParams};
pub use pattern::{PathMatcher, extract, normalize_path, strip_query};
pub use route::{
	AfterRenderFn, ComponentDescriptor, ComponentLoader, RenderFn, ResolvedRoute, RouteDefinition,
	RouteView,
};
