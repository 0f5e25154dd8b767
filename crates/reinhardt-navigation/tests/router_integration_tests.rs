//! Integration tests for the Router
//!
//! These tests drive the router on a `MemoryEnvironment`:
//! 1. Route resolution order and path normalization
//! 2. Middleware, guards and redirects
//! 3. The concurrency guard and the history push that precedes it
//! 4. 404 pages, view failures and hook failures
//! 5. Mount wiring: initial load, DOMContentLoaded, popstate and clicks
//! 6. Layout and localization hooks

use reinhardt_navigation::config::{RouterConfig, TransitionConfig};
use reinhardt_navigation::dom::{Dom, MemoryDom, NodeId};
use reinhardt_navigation::env::{BrowserEnvironment, ClickEvent, ElementSnapshot, MemoryEnvironment, Modifiers, sleep};
use reinhardt_navigation::error::NavigationError;
use reinhardt_navigation::integ::{LayoutRegistry, Localizer};
use reinhardt_navigation::render::Content;
use reinhardt_navigation::router::{
	ComponentDescriptor, NavigationDecision, NavigationOutcome, RouteDefinition, Router, RouterState,
	async_guard, async_middleware, guard_fn, middleware_fn,
};
use reinhardt_navigation::signals::{RouterSignal, SignalSpy};
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

fn setup_with(env: MemoryEnvironment) -> (Rc<MemoryEnvironment>, Router<MemoryEnvironment>) {
	let env = Rc::new(env);
	let router = Router::new(
		Rc::clone(&env),
		RouterConfig::default().with_transition(TransitionConfig::None),
	);
	(env, router)
}

fn setup() -> (Rc<MemoryEnvironment>, Router<MemoryEnvironment>) {
	setup_with(MemoryEnvironment::new())
}

fn root_html(env: &MemoryEnvironment) -> String {
	let dom = env.dom();
	dom.element_by_id("app")
		.map(|root| dom.inner_html(&root))
		.unwrap_or_default()
}

fn root_text(env: &MemoryEnvironment) -> String {
	let dom = env.dom();
	dom.element_by_id("app")
		.map(|root| dom.text_content(&root))
		.unwrap_or_default()
}

fn element(env: &MemoryEnvironment, id: &str) -> NodeId {
	env.dom().element_by_id(id).unwrap()
}

fn add_html(router: &Router<MemoryEnvironment>, pattern: &str, html: &str) {
	router.add_route(pattern, RouteDefinition::html(html)).unwrap();
}

/// Resolution: a dynamic route registered first shadows a later static one
#[test]
fn test_first_registered_route_wins() {
	let (_env, router) = setup();
	add_html(&router, "/users/:id", "<p>user</p>");
	add_html(&router, "/users/special", "<p>special</p>");

	let resolved = router.find_route("/users/special").unwrap();
	assert_eq!(resolved.pattern, "/users/:id");
	assert_eq!(resolved.params.get("id"), Some("special"));
}

/// Resolution: a static route registered first takes its path
#[test]
fn test_static_route_registered_first_wins() {
	let (_env, router) = setup();
	add_html(&router, "/users/special", "<p>special</p>");
	add_html(&router, "/users/:id", "<p>user</p>");

	assert_eq!(router.find_route("/users/special").unwrap().pattern, "/users/special");
	assert_eq!(router.find_route("/users/7").unwrap().pattern, "/users/:id");
}

#[rstest]
#[case("/users/5?tab=posts", Some("5"))]
#[case("/users/5#bio", Some("5"))]
#[case("/users/5/", Some("5"))]
#[case("/users/5/edit", None)]
#[case("/users", None)]
fn test_find_route_ignores_query_and_trailing_slash(#[case] path: &str, #[case] id: Option<&str>) {
	let (_env, router) = setup();
	add_html(&router, "/users/:id", "<p>user</p>");

	let resolved = router.find_route(path);
	assert_eq!(resolved.as_ref().and_then(|r| r.params.get("id")), id);
}

#[test]
fn test_route_table_management() {
	let (_env, router) = setup();
	router
		.register_routes([
			("/", RouteDefinition::html("home")),
			("/about/", RouteDefinition::html("about")),
			("/users/:id", RouteDefinition::html("user")),
		])
		.unwrap();

	assert_eq!(router.route_count(), 3);
	assert_eq!(router.patterns(), ["/", "/about", "/users/:id"]);
	assert!(router.has_route("/about"));
	assert!(router.remove_route("/about/"));
	assert!(!router.remove_route("/about"));
	assert_eq!(router.patterns(), ["/", "/users/:id"]);
}

#[test]
fn test_reregistering_pattern_keeps_position() {
	let (env, router) = setup();
	add_html(&router, "/a/:x", "first");
	add_html(&router, "/a/fixed", "fixed");
	add_html(&router, "/a/:x", "second");

	assert_eq!(router.patterns(), ["/a/:x", "/a/fixed"]);
	env.block_on(router.navigate("/a/fixed")).unwrap();
	assert_eq!(root_text(&env), "second");
}

#[test]
fn test_navigate_renders_and_updates_current_route() {
	let (env, router) = setup();
	router
		.add_route(
			"/users/:id",
			RouteDefinition::view(|params| format!("<h1>User {}</h1>", params.get("id").unwrap_or("?"))),
		)
		.unwrap();

	let outcome = env.block_on(router.navigate("/users/42"));

	assert_eq!(outcome, Some(NavigationOutcome::Rendered));
	assert_eq!(root_text(&env), "User 42");
	let current = router.current_route().unwrap();
	assert_eq!(current.path, "/users/42");
	assert_eq!(current.pattern, "/users/:id");
	assert_eq!(router.state(), RouterState::Idle);
	assert_eq!(env.history_entries(), ["/", "/users/42"]);
}

#[rstest]
#[case("/about/", "/about")]
#[case("/about///", "/about")]
#[case("", "/")]
#[case("/", "/")]
fn test_navigate_normalizes_path(#[case] requested: &str, #[case] pushed: &str) {
	let (env, router) = setup();
	add_html(&router, "/", "home");
	add_html(&router, "/about", "about");

	let outcome = env.block_on(router.navigate(requested)).unwrap();

	assert_eq!(outcome, NavigationOutcome::Rendered);
	assert_eq!(env.history_entries().last().map(String::as_str), Some(pushed));
	assert_eq!(router.current_route().unwrap().path, pushed);
}

#[test]
fn test_navigate_without_history_push() {
	let (env, router) = setup();
	add_html(&router, "/a", "a");

	env.block_on(router.navigate_with("/a", false)).unwrap();

	assert_eq!(env.history_entries(), ["/"]);
	assert_eq!(router.current_route().unwrap().path, "/a");
}

/// Signals: success path order
#[test]
fn test_signal_order_on_success() {
	let (env, router) = setup();
	add_html(&router, "/a", "a");
	let spy = SignalSpy::attach(router.signals());

	env.block_on(router.navigate("/a")).unwrap();

	let expected = ["spa:before-navigate", "spa:transition-complete", "spa:route-changed"];
	assert_eq!(env.signal_names(), expected);
	assert_eq!(spy.names(), expected);
	assert!(matches!(
		&env.signals()[0],
		RouterSignal::BeforeNavigate { from_path: None, to_path, options } if to_path == "/a" && options.push_history
	));
}

#[test]
fn test_before_navigate_carries_previous_path() {
	let (env, router) = setup();
	add_html(&router, "/a", "a");
	add_html(&router, "/b", "b");
	env.block_on(router.navigate("/a")).unwrap();
	let spy = SignalSpy::attach(router.signals());

	env.block_on(router.navigate_with("/b", false)).unwrap();

	assert!(matches!(
		&spy.signals()[0],
		RouterSignal::BeforeNavigate { from_path: Some(from), options, .. }
			if from == "/a" && !options.push_history
	));
}

/// Middleware: registration order, redirect restarts with a history push
#[test]
fn test_middleware_redirect_skips_rest_of_chain() {
	let (env, router) = setup();
	let log = Rc::new(RefCell::new(Vec::new()));
	let a_log = Rc::clone(&log);
	router.use_middleware(middleware_fn(move |ctx| {
		a_log.borrow_mut().push(format!("a:{}", ctx.to_path));
		if ctx.to_path == "/admin" {
			NavigationDecision::RedirectTo("/login".to_string())
		} else {
			NavigationDecision::Continue
		}
	}));
	let b_log = Rc::clone(&log);
	router.use_middleware(middleware_fn(move |ctx| {
		b_log.borrow_mut().push(format!("b:{}", ctx.to_path));
		NavigationDecision::Continue
	}));
	let admin_views = Rc::new(Cell::new(0));
	let views = Rc::clone(&admin_views);
	router
		.add_route(
			"/admin",
			RouteDefinition::view(move |_| {
				views.set(views.get() + 1);
				"<h1>Admin</h1>"
			}),
		)
		.unwrap();
	add_html(&router, "/login", "<h1>Login</h1>");

	let outcome = env.block_on(router.navigate("/admin"));

	assert_eq!(
		outcome,
		Some(NavigationOutcome::Redirected {
			to: "/login".to_string(),
			outcome: Box::new(NavigationOutcome::Rendered),
		})
	);
	assert_eq!(*log.borrow(), ["a:/admin", "a:/login", "b:/login"]);
	assert_eq!(admin_views.get(), 0);
	assert_eq!(root_text(&env), "Login");
	assert_eq!(env.history_entries(), ["/", "/admin", "/login"]);
	assert_eq!(router.state(), RouterState::Idle);
}

/// Middleware: abort keeps the history entry that was pushed
#[test]
fn test_middleware_abort_keeps_history_push() {
	let (env, router) = setup();
	add_html(&router, "/", "home");
	add_html(&router, "/secret", "secret");
	env.block_on(router.navigate_with("/", false)).unwrap();
	router.use_middleware(middleware_fn(|ctx| {
		if ctx.to_path == "/secret" {
			NavigationDecision::Abort
		} else {
			NavigationDecision::Continue
		}
	}));

	let outcome = env.block_on(router.navigate("/secret"));

	assert_eq!(outcome, Some(NavigationOutcome::Aborted));
	assert_eq!(env.history_entries(), ["/", "/secret"]);
	assert_eq!(router.current_route().unwrap().path, "/");
	assert_eq!(root_text(&env), "home");
	assert!(!router.is_navigating());
}

#[test]
fn test_middleware_sees_params() {
	let (env, router) = setup();
	let seen = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&seen);
	router.use_middleware(middleware_fn(move |ctx| {
		*sink.borrow_mut() = ctx.to_params.get("id").map(str::to_string);
		NavigationDecision::Continue
	}));
	add_html(&router, "/users/:id", "user");

	env.block_on(router.navigate("/users/9")).unwrap();

	assert_eq!(seen.borrow().as_deref(), Some("9"));
}

#[test]
fn test_async_middleware_waits_on_timer() {
	let (env, router) = setup();
	let timer_env = Rc::clone(&env);
	router.use_middleware(async_middleware(move |_| {
		let delay = sleep(timer_env.as_ref(), Duration::from_millis(500));
		async move {
			delay.await;
			NavigationDecision::Continue
		}
	}));
	add_html(&router, "/slow", "slow");

	let outcome = env.block_on(router.navigate("/slow"));

	assert_eq!(outcome, Some(NavigationOutcome::Rendered));
	assert!(env.now() >= Duration::from_millis(500));
}

/// Middleware: one that never resolves stalls the router
#[test]
fn test_pending_middleware_blocks_later_navigations() {
	let (env, router) = setup();
	router.use_middleware(async_middleware(|_| futures::future::pending::<NavigationDecision>()));
	add_html(&router, "/a", "a");
	add_html(&router, "/b", "b");

	assert_eq!(env.block_on(router.navigate("/a")), None);
	assert!(router.is_navigating());
	assert_eq!(env.block_on(router.navigate("/b")), Some(NavigationOutcome::Dropped));
	assert_eq!(env.history_entries(), ["/", "/a", "/b"]);
}

/// Concurrency: a second navigation while one is in flight is dropped
#[test]
fn test_concurrent_navigation_is_dropped_after_history_push() {
	let (env, router) = setup();
	add_html(&router, "/a", "a");
	add_html(&router, "/b", "b");

	let first = router.navigate("/a");
	assert_eq!(router.state(), RouterState::Navigating);
	let second = router.navigate("/b");

	assert_eq!(env.block_on(second), Some(NavigationOutcome::Dropped));
	assert_eq!(env.block_on(first), Some(NavigationOutcome::Rendered));
	assert_eq!(router.current_route().unwrap().path, "/a");
	assert_eq!(env.history_entries(), ["/", "/a", "/b"]);
	assert_eq!(env.signal_names().iter().filter(|n| **n == "spa:before-navigate").count(), 1);
}

/// Guards: beforeEnter runs after middleware and may reject
#[test]
fn test_before_enter_guard_rejects() {
	let (env, router) = setup();
	let allowed = Rc::new(Cell::new(false));
	let flag = Rc::clone(&allowed);
	router
		.add_route(
			"/dashboard",
			RouteDefinition::html("dashboard").guard(move |_| flag.get()),
		)
		.unwrap();

	assert_eq!(env.block_on(router.navigate("/dashboard")), Some(NavigationOutcome::Aborted));
	assert!(router.current_route().is_none());

	allowed.set(true);
	assert_eq!(env.block_on(router.navigate("/dashboard")), Some(NavigationOutcome::Rendered));
}

#[test]
fn test_before_enter_guard_redirects() {
	let (env, router) = setup();
	router
		.add_route(
			"/old/:id",
			RouteDefinition::html("old").before_enter(guard_fn(|ctx| {
				NavigationDecision::RedirectTo(format!("/new/{}", ctx.to_params.get("id").unwrap_or("0")))
			})),
		)
		.unwrap();
	add_html(&router, "/new/:id", "new");

	let outcome = env.block_on(router.navigate("/old/3"));

	assert_eq!(
		outcome,
		Some(NavigationOutcome::Redirected {
			to: "/new/3".to_string(),
			outcome: Box::new(NavigationOutcome::Rendered),
		})
	);
	assert_eq!(router.current_route().unwrap().params.get("id"), Some("3"));
}

#[test]
fn test_redirect_to_missing_route_reports_not_found() {
	let (env, router) = setup();
	router
		.add_route(
			"/legacy",
			RouteDefinition::html("legacy")
				.before_enter(guard_fn(|_| NavigationDecision::RedirectTo("/gone".to_string()))),
		)
		.unwrap();

	let outcome = env.block_on(router.navigate("/legacy"));

	assert_eq!(
		outcome,
		Some(NavigationOutcome::Redirected {
			to: "/gone".to_string(),
			outcome: Box::new(NavigationOutcome::NotFound),
		})
	);
	assert!(root_text(&env).contains("/gone"));
	assert!(router.current_route().is_none());
}

#[rstest]
#[case::allowed(true, NavigationOutcome::Rendered)]
#[case::rejected(false, NavigationOutcome::Aborted)]
fn test_async_before_enter_guard(#[case] allowed: bool, #[case] expected: NavigationOutcome) {
	let (env, router) = setup();
	router
		.add_route(
			"/reports",
			RouteDefinition::html("<h1>Reports</h1>").before_enter(async_guard(move |ctx| async move {
				ctx.to_path == "/reports" && allowed
			})),
		)
		.unwrap();

	let outcome = env.block_on(router.navigate("/reports"));

	assert_eq!(outcome, Some(expected));
	assert_eq!(root_text(&env) == "Reports", allowed);
	assert_eq!(router.state(), RouterState::Idle);
}

#[test]
fn test_redirect_loop_is_bounded() {
	let env = Rc::new(MemoryEnvironment::new());
	let router = Router::new(
		Rc::clone(&env),
		RouterConfig::default()
			.with_transition(TransitionConfig::None)
			.with_max_redirects(3),
	);
	router.use_middleware(middleware_fn(|ctx| {
		NavigationDecision::RedirectTo(format!("{}/x", ctx.to_path))
	}));
	add_html(&router, "/loop", "never");
	add_html(&router, "/loop/x", "never");
	add_html(&router, "/loop/x/x", "never");
	add_html(&router, "/loop/x/x/x", "never");

	let outcome = env.block_on(router.navigate("/loop")).unwrap();

	assert!(matches!(
		outcome,
		NavigationOutcome::Failed(NavigationError::TooManyRedirects { limit: 3, .. })
	));
	assert!(root_html(&env).contains("router-error"));
	assert_eq!(router.state(), RouterState::Idle);
}

/// 404: custom handler receives the raw path, currentRoute is kept
#[test]
fn test_not_found_renders_error_handler_with_raw_path() {
	let (env, router) = setup();
	add_html(&router, "/", "home");
	env.block_on(router.navigate("/")).unwrap();
	let calls = Rc::new(RefCell::new(Vec::new()));
	let recorded = Rc::clone(&calls);
	router.set_error_handler(move |path: &str| {
		recorded.borrow_mut().push(path.to_string());
		Content::Html(format!("<p>missing {path}</p>"))
	});

	let outcome = env.block_on(router.navigate("/nope/"));
	env.settle();

	assert_eq!(outcome, Some(NavigationOutcome::NotFound));
	assert_eq!(*calls.borrow(), ["/nope/"]);
	assert_eq!(root_text(&env), "missing /nope/");
	assert_eq!(router.current_route().unwrap().path, "/");
	assert_eq!(env.history_entries().last().map(String::as_str), Some("/nope"));
	assert_eq!(
		env.signals().last(),
		Some(&RouterSignal::ErrorPageRendered {
			path: "/nope/".to_string()
		})
	);
}

#[test]
fn test_default_not_found_page_escapes_path() {
	let (env, router) = setup();

	env.block_on(router.navigate("/<script>")).unwrap();

	let html = root_html(&env);
	assert!(html.contains("404"));
	assert!(html.contains("&lt;script&gt;"));
	assert!(env.dom().elements_by_tag(&env.dom().body(), "script").is_empty());
}

#[test]
fn test_not_found_signal_order() {
	let (env, router) = setup();

	env.block_on(router.navigate("/missing")).unwrap();

	assert_eq!(
		env.signal_names(),
		["spa:before-navigate", "spa:transition-complete", "spa:error-page-rendered"]
	);
}

/// Failures: a view error shows the inline message and leaves the router usable
#[test]
fn test_view_failure_renders_inline_error() {
	let (env, router) = setup();
	router
		.add_route(
			"/broken",
			RouteDefinition::render(|_| async { Err(NavigationError::view("/broken", "backend <down>")) }),
		)
		.unwrap();
	add_html(&router, "/ok", "ok");

	let outcome = env.block_on(router.navigate("/broken")).unwrap();

	assert!(matches!(outcome, NavigationOutcome::Failed(NavigationError::View { .. })));
	let html = root_html(&env);
	assert!(html.contains("class=\"router-error\""));
	assert!(html.contains("backend &lt;down&gt;"));
	assert!(router.current_route().is_none());
	assert!(!env.signal_names().contains(&"spa:route-changed"));

	assert_eq!(env.block_on(router.navigate("/ok")), Some(NavigationOutcome::Rendered));
	assert_eq!(root_text(&env), "ok");
}

#[test]
fn test_after_render_failure_is_ignored() {
	let (env, router) = setup();
	let calls = Rc::new(Cell::new(0));
	let counter = Rc::clone(&calls);
	router
		.add_route(
			"/a",
			RouteDefinition::html("a").after_render(move |_| {
				counter.set(counter.get() + 1);
				Err(NavigationError::hook("analytics offline"))
			}),
		)
		.unwrap();

	let outcome = env.block_on(router.navigate("/a"));

	assert_eq!(outcome, Some(NavigationOutcome::Rendered));
	assert_eq!(calls.get(), 1);
	assert_eq!(env.signal_names().last(), Some(&"spa:route-changed"));
}

#[test]
fn test_component_route_receives_params() {
	let (env, router) = setup();
	router
		.add_route(
			"/users/:id",
			RouteDefinition::component(ComponentDescriptor::new("user-profile").with_prop("mode", "full")),
		)
		.unwrap();

	env.block_on(router.navigate("/users/42")).unwrap();

	let dom = env.dom();
	let profiles = dom.elements_by_tag(&dom.body(), "user-profile");
	assert_eq!(profiles.len(), 1);
	assert_eq!(dom.attribute(&profiles[0], "id").as_deref(), Some("42"));
	assert_eq!(dom.attribute(&profiles[0], "mode").as_deref(), Some("full"));
}

#[test]
fn test_invalid_component_tag_fails_navigation() {
	let (env, router) = setup();
	router
		.add_route("/bad", RouteDefinition::component(ComponentDescriptor::new("nohyphen")))
		.unwrap();

	let outcome = env.block_on(router.navigate("/bad")).unwrap();

	assert!(matches!(outcome, NavigationOutcome::Failed(NavigationError::Component { .. })));
}

#[test]
fn test_missing_root_falls_back_to_body() {
	let (env, router) = setup_with(MemoryEnvironment::new().with_body_html("<p>static</p>"));
	add_html(&router, "/", "<h1>Home</h1>");

	env.block_on(router.navigate("/")).unwrap();

	let dom = env.dom();
	assert_eq!(dom.text_content(&dom.body()), "Home");
}

#[test]
fn test_custom_root_id() {
	let env = Rc::new(MemoryEnvironment::new().with_body_html("<div id=\"main\"></div><div id=\"app\">untouched</div>"));
	let router = Router::new(
		Rc::clone(&env),
		RouterConfig::default()
			.with_transition(TransitionConfig::None)
			.with_root_id("main"),
	);
	add_html(&router, "/", "home");

	env.block_on(router.navigate("/")).unwrap();

	let dom = env.dom();
	assert_eq!(dom.text_content(&element(&env, "main")), "home");
	assert_eq!(dom.text_content(&element(&env, "app")), "untouched");
}

/// Mount: initial navigation replaces nothing in history
#[test]
fn test_mount_renders_current_location() {
	let (env, router) = setup_with(MemoryEnvironment::new().with_path("/users/7"));
	add_html(&router, "/users/:id", "user");

	router.mount();
	env.settle();

	assert_eq!(router.current_route().unwrap().params.get("id"), Some("7"));
	assert_eq!(env.history_entries(), ["/users/7"]);
}

#[test]
fn test_mount_waits_for_dom_content_loaded() {
	let (env, router) = setup_with(MemoryEnvironment::new().loading());
	add_html(&router, "/", "home");

	router.mount();
	env.settle();
	assert!(router.current_route().is_none());

	env.fire_dom_content_loaded();
	env.settle();
	assert_eq!(root_text(&env), "home");
}

#[test]
fn test_popstate_navigates_without_push() {
	let (env, router) = setup();
	add_html(&router, "/", "home");
	add_html(&router, "/a", "a");
	add_html(&router, "/b", "b");
	router.mount();
	env.settle();
	env.block_on(router.navigate("/a")).unwrap();
	env.block_on(router.navigate("/b")).unwrap();

	router.back();
	env.settle();

	assert_eq!(router.current_route().unwrap().path, "/a");
	assert_eq!(env.history_entries(), ["/", "/a", "/b"]);
	assert_eq!(env.history_index(), 1);

	router.forward();
	env.settle();
	assert_eq!(root_text(&env), "b");
}

const LINKS: &str = concat!(
	"<a id=\"about\" href=\"/about\"><span id=\"label\">About</span></a>",
	"<a id=\"external\" href=\"https://example.com/\">Example</a>",
	"<a id=\"report\" href=\"/report.pdf\">Report</a>",
	"<a id=\"blank\" href=\"/about\" target=\"_blank\">New tab</a>",
	"<a id=\"mail\" href=\"mailto:team@example.com\">Mail</a>",
);

#[test]
fn test_click_on_internal_link_navigates() {
	let (env, router) = setup();
	add_html(&router, "/", LINKS);
	add_html(&router, "/about", "<h1>About</h1>");
	router.mount();
	env.settle();

	let event = env.click(&element(&env, "label"));
	assert!(event.is_default_prevented());
	env.settle();

	assert_eq!(router.current_route().unwrap().path, "/about");
	assert_eq!(env.history_entries(), ["/", "/about"]);
}

#[test]
fn test_click_on_relative_link_resolves_against_current_path() {
	let (env, router) = setup_with(MemoryEnvironment::new().with_path("/docs/intro"));
	add_html(&router, "/docs/intro", "<a id=\"next\" href=\"setup\">Next</a>");
	add_html(&router, "/docs/setup", "<h1>Setup</h1>");
	router.mount();
	env.settle();

	let event = env.click(&element(&env, "next"));
	env.settle();

	assert!(event.is_default_prevented());
	assert_eq!(router.current_route().unwrap().path, "/docs/setup");
	assert_eq!(root_text(&env), "Setup");
	assert_eq!(env.history_entries().last().map(String::as_str), Some("/docs/setup"));
}

#[rstest]
#[case("external")]
#[case("report")]
#[case("blank")]
#[case("mail")]
fn test_click_on_browser_link_passes_through(#[case] id: &str) {
	let (env, router) = setup();
	add_html(&router, "/", LINKS);
	router.mount();
	env.settle();

	let event = env.click(&element(&env, id));
	env.settle();

	assert!(!event.is_default_prevented());
	assert_eq!(router.current_route().unwrap().path, "/");
}

#[test]
fn test_modified_click_passes_through() {
	let (env, router) = setup();
	add_html(&router, "/", LINKS);
	router.mount();
	env.settle();

	let anchor = ElementSnapshot::new("a").attr("href", "/about");
	let event = env.dispatch_click(ClickEvent::new(vec![anchor]).with_modifiers(Modifiers {
		meta: true,
		..Modifiers::default()
	}));

	assert!(!event.is_default_prevented());
}

#[test]
fn test_link_interception_can_be_disabled() {
	let env = Rc::new(MemoryEnvironment::new());
	let router = Router::new(
		Rc::clone(&env),
		RouterConfig::default()
			.with_transition(TransitionConfig::None)
			.with_intercept_links(false),
	);
	add_html(&router, "/", LINKS);
	router.mount();
	env.settle();

	let event = env.click(&element(&env, "about"));

	assert!(!event.is_default_prevented());
}

#[test]
fn test_layout_wraps_route_content() {
	let (env, router) = setup();
	router.set_layout_wrapper(
		LayoutRegistry::new()
			.register("shell", |content: Content| {
				Content::Html(format!("<main id=\"shell\">{}</main>", content.to_html()))
			})
			.into_wrapper(),
	);
	router
		.add_route("/", RouteDefinition::html("<p>inside</p>").layout("shell"))
		.unwrap();
	add_html(&router, "/bare", "<p>bare</p>");

	env.block_on(router.navigate("/")).unwrap();
	assert_eq!(env.dom().text_content(&element(&env, "shell")), "inside");
	assert_eq!(router.current_route().unwrap().layout.as_deref(), Some("shell"));

	env.block_on(router.navigate("/bare")).unwrap();
	assert!(env.dom().element_by_id("shell").is_none());
}

struct UppercaseLocalizer {
	calls: Rc<Cell<usize>>,
}

impl Localizer<MemoryDom> for UppercaseLocalizer {
	fn translate_container(&self, dom: &MemoryDom, container: &NodeId) {
		self.calls.set(self.calls.get() + 1);
		for node in dom.elements_by_class(container, "i18n") {
			let text = dom.text_content(&node).to_uppercase();
			dom.set_text_content(&node, &text);
		}
	}

	fn apply_rtl_to_document(&self, dom: &MemoryDom) {
		dom.set_attribute(&dom.body(), "dir", "rtl").unwrap();
	}
}

#[test]
fn test_localizer_runs_after_each_transition() {
	let (env, router) = setup();
	let calls = Rc::new(Cell::new(0));
	router.set_localizer(UppercaseLocalizer {
		calls: Rc::clone(&calls),
	});
	add_html(&router, "/", "<p class=\"i18n\">hello</p>");

	env.block_on(router.navigate("/")).unwrap();
	env.block_on(router.navigate("/missing")).unwrap();

	assert_eq!(calls.get(), 2);
	let dom = env.dom();
	assert_eq!(dom.attribute(&dom.body(), "dir").as_deref(), Some("rtl"));
}

#[test]
fn test_localized_text_after_render() {
	let (env, router) = setup();
	router.set_localizer(UppercaseLocalizer {
		calls: Rc::new(Cell::new(0)),
	});
	add_html(&router, "/", "<p class=\"i18n\">hello</p>");

	env.block_on(router.navigate("/")).unwrap();

	assert_eq!(root_text(&env), "HELLO");
}
