//! Core Router Implementation.
//!
//! A navigation runs through these steps:
//!
//! ```text
//! normalize -> push history -> concurrency check -> BeforeNavigate
//!   -> resolve -> middleware chain -> beforeEnter guard
//!   -> view -> layout -> transition -> currentRoute -> afterRender
//!   -> RouteChanged
//! ```
//!
//! The first four steps run synchronously when [`Router::navigate`] is
//! called; the rest run when the returned future is polled.

use super::link::{intercepted_href, resolve_href};
use super::middleware::{Middleware, NavigationContext, NavigationDecision};
use super::params::Params;
use super::pattern::{PathMatcher, normalize_path, strip_query};
use super::route::{ResolvedRoute, Route, RouteDefinition};
use crate::config::RouterConfig;
use crate::dom::Dom;
use crate::dom::html::escape_html;
use crate::env::{BrowserEnvironment, ClickEvent, NodeOf};
use crate::error::NavigationError;
use crate::integ::{LayoutWrapper, Localizer};
use crate::render::{Content, ContentRenderer};
use crate::signals::{NavigateOptions, RouterSignal, SignalBus};
use crate::transition::{Transition, TransitionContext, build_transition, run_transition, schedule_sweep};
use futures::FutureExt;
use futures::future::{LocalBoxFuture, ready};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const LOG_TARGET: &str = "reinhardt::navigation::router";

/// Produces the 404 page for a path, as given to `navigate`.
pub type ErrorHandler = Rc<dyn Fn(&str) -> Content>;

/// Where the router is in its navigation cycle.
///
/// Anything other than `Idle` means a navigation is in flight, and further
/// `navigate` calls are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
	/// Ready for a navigation.
	#[default]
	Idle,
	/// Resolving the route and running middleware and guards.
	Navigating,
	/// Rendering a matched route.
	Rendering,
	/// Rendering the 404 page.
	NotFound,
	/// Rendering the inline error after a failure.
	Error,
}

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
	/// The route rendered.
	Rendered,
	/// No route matched and the 404 page rendered.
	NotFound,
	/// A middleware or guard redirected. Carries the final path and how the
	/// navigation to it ended, which is never itself a redirect.
	Redirected {
		/// Normalized path of the last navigation in the chain.
		to: String,
		/// Outcome of that navigation.
		outcome: Box<NavigationOutcome>,
	},
	/// A middleware or guard stopped the navigation.
	Aborted,
	/// Another navigation was in flight; nothing happened beyond the
	/// history push.
	Dropped,
	/// Rendering failed and the inline error message was shown.
	Failed(NavigationError),
}

fn default_error_handler(path: &str) -> Content {
	Content::Html(format!(
		"<div class=\"not-found\"><h1>404</h1><p>Page not found: {}</p></div>",
		escape_html(path)
	))
}

struct RouterInner<E: BrowserEnvironment> {
	env: Rc<E>,
	config: RouterConfig,
	renderer: ContentRenderer,
	routes: RefCell<IndexMap<String, Route>>,
	middleware: RefCell<Vec<Middleware>>,
	transition: RefCell<Rc<dyn Transition<E>>>,
	error_handler: RefCell<ErrorHandler>,
	layout_wrapper: RefCell<Option<LayoutWrapper>>,
	localizer: RefCell<Option<Rc<dyn Localizer<E::Dom>>>>,
	current: RefCell<Option<ResolvedRoute>>,
	state: Cell<RouterState>,
	signals: SignalBus,
	mounted: Cell<bool>,
}

impl<E: BrowserEnvironment> RouterInner<E> {
	fn root(&self) -> NodeOf<E> {
		let dom = self.env.dom();
		dom.element_by_id(&self.config.root_id).unwrap_or_else(|| {
			tracing::warn!(
				target: LOG_TARGET,
				"Root element #{} not found, rendering into <body>",
				self.config.root_id
			);
			dom.body()
		})
	}

	fn emit(&self, signal: &RouterSignal) {
		self.signals.send(signal);
		self.env.dispatch_signal(signal);
	}

	fn localize(&self) {
		let localizer = self.localizer.borrow().clone();
		if let Some(localizer) = localizer {
			let dom = self.env.dom();
			localizer.translate_container(dom, &self.root());
			localizer.apply_rtl_to_document(dom);
		}
	}
}

/// Holds the router out of `Idle` for the lifetime of one navigation.
struct NavigationGuard<E: BrowserEnvironment> {
	inner: Rc<RouterInner<E>>,
}

impl<E: BrowserEnvironment> NavigationGuard<E> {
	fn acquire(inner: &Rc<RouterInner<E>>) -> Self {
		inner.state.set(RouterState::Navigating);
		Self {
			inner: Rc::clone(inner),
		}
	}

	fn set(&self, state: RouterState) {
		self.inner.state.set(state);
	}
}

impl<E: BrowserEnvironment> Drop for NavigationGuard<E> {
	fn drop(&mut self) {
		self.inner.state.set(RouterState::Idle);
	}
}

/// Client-side router for one application root.
///
/// `Router` is a cheap handle; clones share the same route table and state.
///
/// # Example
///
/// ```
/// use reinhardt_navigation::config::{RouterConfig, TransitionConfig};
/// use reinhardt_navigation::env::MemoryEnvironment;
/// use reinhardt_navigation::router::{NavigationOutcome, RouteDefinition, Router};
/// use std::rc::Rc;
///
/// let env = Rc::new(MemoryEnvironment::new());
/// let router = Router::new(
///     Rc::clone(&env),
///     RouterConfig::default().with_transition(TransitionConfig::None),
/// );
/// router.add_route("/", RouteDefinition::html("<h1>Home</h1>")).unwrap();
///
/// let outcome = env.block_on(router.navigate("/"));
/// assert_eq!(outcome, Some(NavigationOutcome::Rendered));
/// assert_eq!(router.current_route().unwrap().pattern, "/");
/// ```
pub struct Router<E: BrowserEnvironment> {
	inner: Rc<RouterInner<E>>,
}

impl<E: BrowserEnvironment> Clone for Router<E> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<E: BrowserEnvironment> std::fmt::Debug for Router<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("patterns", &self.patterns())
			.field("state", &self.state())
			.field("current", &self.inner.current.borrow())
			.finish()
	}
}

impl<E: BrowserEnvironment> Router<E> {
	/// Creates a router. Nothing is wired to the page until [`Router::mount`].
	pub fn new(env: Rc<E>, config: RouterConfig) -> Self {
		let renderer = ContentRenderer::new(config.scripts).with_base_url(config.base_url.clone());
		let transition = build_transition::<E>(&config.transition);
		let inner = Rc::new(RouterInner {
			env,
			config,
			renderer,
			routes: RefCell::new(IndexMap::new()),
			middleware: RefCell::new(Vec::new()),
			transition: RefCell::new(transition),
			error_handler: RefCell::new(Rc::new(default_error_handler)),
			layout_wrapper: RefCell::new(None),
			localizer: RefCell::new(None),
			current: RefCell::new(None),
			state: Cell::new(RouterState::Idle),
			signals: SignalBus::new(),
			mounted: Cell::new(false),
		});

		let weak: Weak<RouterInner<E>> = Rc::downgrade(&inner);
		inner.signals.connect(
			move |signal: &RouterSignal| {
				if matches!(signal, RouterSignal::TransitionComplete)
					&& let Some(inner) = weak.upgrade()
				{
					inner.localize();
				}
			},
			Some("reinhardt::navigation::i18n"),
		);

		Self { inner }
	}

	/// The environment.
	pub fn env(&self) -> &Rc<E> {
		&self.inner.env
	}

	/// The configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.inner.config
	}

	/// Registers a route. A pattern registered twice keeps its original
	/// position and takes the new definition.
	pub fn add_route(&self, pattern: &str, definition: RouteDefinition) -> Result<(), NavigationError> {
		let pattern = normalize_path(Some(pattern));
		let matcher = PathMatcher::compile(&pattern)?;
		self.inner
			.routes
			.borrow_mut()
			.insert(pattern, Route { matcher, definition });
		Ok(())
	}

	/// Registers several routes in order.
	pub fn register_routes<P, I>(&self, routes: I) -> Result<(), NavigationError>
	where
		P: AsRef<str>,
		I: IntoIterator<Item = (P, RouteDefinition)>,
	{
		for (pattern, definition) in routes {
			self.add_route(pattern.as_ref(), definition)?;
		}
		Ok(())
	}

	/// Removes a route. Returns whether it existed.
	pub fn remove_route(&self, pattern: &str) -> bool {
		self.inner
			.routes
			.borrow_mut()
			.shift_remove(&normalize_path(Some(pattern)))
			.is_some()
	}

	/// Whether a route is registered under `pattern`.
	pub fn has_route(&self, pattern: &str) -> bool {
		self.inner
			.routes
			.borrow()
			.contains_key(&normalize_path(Some(pattern)))
	}

	/// Number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.routes.borrow().len()
	}

	/// Registered patterns, in registration order.
	pub fn patterns(&self) -> Vec<String> {
		self.inner.routes.borrow().keys().cloned().collect()
	}

	/// Appends a middleware to the chain.
	pub fn use_middleware(&self, middleware: Middleware) {
		self.inner.middleware.borrow_mut().push(middleware);
	}

	/// Replaces the transition.
	pub fn set_transition(&self, transition: impl Transition<E>) {
		*self.inner.transition.borrow_mut() = Rc::new(transition);
	}

	/// Replaces the 404 handler.
	pub fn set_error_handler(&self, handler: impl Fn(&str) -> Content + 'static) {
		*self.inner.error_handler.borrow_mut() = Rc::new(handler);
	}

	/// Sets the function wrapping routes that name a layout.
	pub fn set_layout_wrapper(&self, wrapper: LayoutWrapper) {
		*self.inner.layout_wrapper.borrow_mut() = Some(wrapper);
	}

	/// Sets the localizer run after every transition.
	pub fn set_localizer(&self, localizer: impl Localizer<E::Dom>) {
		*self.inner.localizer.borrow_mut() = Some(Rc::new(localizer));
	}

	/// Signals emitted by this router.
	pub fn signals(&self) -> &SignalBus {
		&self.inner.signals
	}

	/// The last successfully rendered route.
	pub fn current_route(&self) -> Option<ResolvedRoute> {
		self.inner.current.borrow().clone()
	}

	/// The navigation state.
	pub fn state(&self) -> RouterState {
		self.inner.state.get()
	}

	/// Whether a navigation is in flight.
	pub fn is_navigating(&self) -> bool {
		self.state() != RouterState::Idle
	}

	/// Resolves `path` without side effects.
	///
	/// The query string and fragment are ignored. An exactly matching static
	/// route is used unless a dynamic route registered before it matches too;
	/// among dynamic routes the first registered match wins.
	pub fn find_route(&self, path: &str) -> Option<ResolvedRoute> {
		self.lookup(path).map(|(route, params)| ResolvedRoute {
			path: normalize_path(Some(path)),
			pattern: route.matcher.pattern().to_string(),
			params,
			layout: route.definition.layout.clone(),
		})
	}

	fn lookup(&self, path: &str) -> Option<(Route, Params)> {
		let path = normalize_path(Some(strip_query(path)));
		let routes = self.inner.routes.borrow();
		let exact = routes
			.get_full(&path)
			.filter(|(_, _, route)| route.matcher.is_static())
			.map(|(index, _, _)| index);

		let scan_limit = exact.unwrap_or(routes.len());
		let dynamic = routes
			.values()
			.take(scan_limit)
			.filter(|route| !route.matcher.is_static())
			.find_map(|route| route.matcher.extract(&path).map(|params| (route.clone(), params)));

		dynamic.or_else(|| {
			exact
				.and_then(|index| routes.get_index(index))
				.map(|(_, route)| (route.clone(), Params::new()))
		})
	}

	/// Navigates to `path`, pushing it to session history.
	pub fn navigate(&self, path: &str) -> LocalBoxFuture<'static, NavigationOutcome> {
		self.navigate_with(path, true)
	}

	/// Navigates to `path`.
	///
	/// The path is normalized and, when `push_history` is set, pushed to
	/// session history before anything else; this happens even if the
	/// navigation is then dropped or rejected. If another navigation is in
	/// flight the returned future resolves to
	/// [`NavigationOutcome::Dropped`] immediately.
	pub fn navigate_with(&self, path: &str, push_history: bool) -> LocalBoxFuture<'static, NavigationOutcome> {
		self.begin(path, push_history, 0)
	}

	fn begin(&self, raw_path: &str, push_history: bool, redirects: usize) -> LocalBoxFuture<'static, NavigationOutcome> {
		let path = normalize_path(Some(raw_path));
		if push_history {
			self.inner.env.push_state(&path);
		}
		if self.is_navigating() {
			tracing::debug!(target: LOG_TARGET, "Navigation to '{path}' dropped: another navigation is in flight");
			return ready(NavigationOutcome::Dropped).boxed_local();
		}
		let guard = NavigationGuard::acquire(&self.inner);
		tracing::debug!(target: LOG_TARGET, path = %path, push_history, "navigating");

		let router = self.clone();
		let raw_path = raw_path.to_string();
		async move {
			router
				.run(guard, raw_path, path, push_history, redirects)
				.await
		}
		.boxed_local()
	}

	async fn run(
		self,
		guard: NavigationGuard<E>,
		raw_path: String,
		path: String,
		push_history: bool,
		redirects: usize,
	) -> NavigationOutcome {
		let from_path = self.inner.current.borrow().as_ref().map(|r| r.path.clone());
		self.inner.emit(&RouterSignal::BeforeNavigate {
			from_path: from_path.clone(),
			to_path: path.clone(),
			options: NavigateOptions { push_history },
		});

		let Some((route, params)) = self.lookup(&path) else {
			return self.render_not_found(guard, &raw_path).await;
		};

		let ctx = NavigationContext {
			to_path: path.clone(),
			to_params: params.clone(),
			from_path,
		};
		let chain: Vec<Middleware> = self.inner.middleware.borrow().clone();
		for middleware in chain {
			match middleware(ctx.clone()).await {
				NavigationDecision::Continue => {}
				NavigationDecision::RedirectTo(target) => {
					return self.redirect(guard, target, redirects).await;
				}
				NavigationDecision::Abort => {
					tracing::debug!(target: LOG_TARGET, "Navigation to '{path}' aborted by middleware");
					return NavigationOutcome::Aborted;
				}
			}
		}

		if let Some(before_enter) = route.definition.before_enter.clone() {
			match before_enter(ctx).await {
				NavigationDecision::Continue => {}
				NavigationDecision::RedirectTo(target) => {
					return self.redirect(guard, target, redirects).await;
				}
				NavigationDecision::Abort => {
					tracing::debug!(target: LOG_TARGET, "Navigation to '{path}' rejected by guard");
					return NavigationOutcome::Aborted;
				}
			}
		}

		guard.set(RouterState::Rendering);
		match self.render_route(&route, path, params).await {
			Ok(()) => NavigationOutcome::Rendered,
			Err(err) => {
				guard.set(RouterState::Error);
				self.render_failure(&err);
				NavigationOutcome::Failed(err)
			}
		}
	}

	async fn redirect(&self, guard: NavigationGuard<E>, target: String, redirects: usize) -> NavigationOutcome {
		drop(guard);
		let limit = self.inner.config.max_redirects;
		if redirects >= limit {
			let err = NavigationError::TooManyRedirects { limit, path: target };
			self.render_failure(&err);
			return NavigationOutcome::Failed(err);
		}
		tracing::debug!(target: LOG_TARGET, "Redirecting to '{target}'");
		match self.begin(&target, true, redirects + 1).await {
			NavigationOutcome::Failed(err) => NavigationOutcome::Failed(err),
			redirected @ NavigationOutcome::Redirected { .. } => redirected,
			outcome => NavigationOutcome::Redirected {
				to: normalize_path(Some(&target)),
				outcome: Box::new(outcome),
			},
		}
	}

	async fn render_route(&self, route: &Route, path: String, params: Params) -> Result<(), NavigationError> {
		let definition = &route.definition;
		let mut content = definition.view.resolve(&params).await?;
		if let Some(layout) = &definition.layout {
			let wrapper = self.inner.layout_wrapper.borrow().clone();
			if let Some(wrapper) = wrapper {
				content = wrapper(content, layout);
			}
		}

		self.transition_to(content).await?;

		let resolved = ResolvedRoute {
			path: path.clone(),
			pattern: route.matcher.pattern().to_string(),
			params,
			layout: definition.layout.clone(),
		};
		*self.inner.current.borrow_mut() = Some(resolved.clone());

		if let Some(after_render) = &definition.after_render
			&& let Err(err) = after_render(&resolved.params)
		{
			tracing::warn!(target: LOG_TARGET, "afterRender hook for '{path}' failed: {err}");
		}

		self.inner.emit(&RouterSignal::RouteChanged { path, route: resolved });
		Ok(())
	}

	async fn render_not_found(&self, guard: NavigationGuard<E>, raw_path: &str) -> NavigationOutcome {
		guard.set(RouterState::NotFound);
		let handler = self.inner.error_handler.borrow().clone();
		let content = handler(raw_path);
		let result = self.transition_to(content).await;
		schedule_sweep(&self.inner.env);
		match result {
			Ok(()) => {
				self.inner.emit(&RouterSignal::ErrorPageRendered {
					path: raw_path.to_string(),
				});
				NavigationOutcome::NotFound
			}
			Err(err) => {
				guard.set(RouterState::Error);
				self.render_failure(&err);
				NavigationOutcome::Failed(err)
			}
		}
	}

	async fn transition_to(&self, content: Content) -> Result<(), NavigationError> {
		let transition = self.inner.transition.borrow().clone();
		let ctx = TransitionContext::new(
			Rc::clone(&self.inner.env),
			self.inner.renderer.clone(),
			self.inner.root(),
			content,
		);
		let inner = Rc::clone(&self.inner);
		run_transition(transition.as_ref(), ctx, &move |signal: &RouterSignal| inner.emit(signal)).await
	}

	fn render_failure(&self, err: &NavigationError) {
		tracing::error!(target: LOG_TARGET, "Navigation failed: {err}");
		let html = format!(
			"<div class=\"router-error\"><h2>Navigation error</h2><p>{}</p></div>",
			escape_html(&err.to_string())
		);
		if let Err(dom_err) = self.inner.env.dom().set_inner_html(&self.inner.root(), &html) {
			tracing::error!(target: LOG_TARGET, "Failed to render error message: {dom_err}");
		}
	}

	/// Goes back one history entry.
	pub fn back(&self) {
		self.inner.env.back();
	}

	/// Goes forward one history entry.
	pub fn forward(&self) {
		self.inner.env.forward();
	}

	/// Wires the router to the page.
	///
	/// Performs the initial navigation if the document is already loaded,
	/// navigates on `DOMContentLoaded` and `popstate` without pushing
	/// history, and (unless disabled in the config) installs a capturing
	/// click listener that takes over intercepted links. The listeners keep
	/// the router alive. Mounting twice has no effect.
	pub fn mount(&self) {
		if self.inner.mounted.replace(true) {
			tracing::warn!(target: LOG_TARGET, "Router already mounted");
			return;
		}
		let env = Rc::clone(&self.inner.env);

		let router = self.clone();
		let on_location: Rc<dyn Fn()> = Rc::new(move || {
			let path = router.inner.env.current_path();
			router.spawn(router.navigate_with(&path, false));
		});
		env.on_dom_content_loaded(Rc::clone(&on_location));
		env.on_popstate(on_location);

		if self.inner.config.intercept_links {
			let router = self.clone();
			env.on_click_capture(Rc::new(move |event: &mut ClickEvent| {
				let Some(href) = intercepted_href(event) else {
					return;
				};
				event.prevent_default();
				let target = resolve_href(&href, &router.inner.env.current_path());
				router.spawn(router.navigate(&target));
			}));
		}

		if env.is_document_loaded() {
			let path = env.current_path();
			self.spawn(self.navigate_with(&path, false));
		}
	}

	fn spawn(&self, navigation: LocalBoxFuture<'static, NavigationOutcome>) {
		self.inner
			.env
			.spawn_local(navigation.map(|_| ()).boxed_local());
	}
}
