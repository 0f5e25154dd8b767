//! Animated handoff between the previous and the next content.
//!
//! A transition owns whatever temporary nodes it creates. Once its future
//! resolves, no element with the [`OVERLAY_CLASS`] or [`CONTAINER_CLASS`]
//! class is left in the document, whether or not there was previous
//! content and whether or not it failed. [`run_transition`] sweeps both
//! classes again afterwards and then emits
//! [`RouterSignal::TransitionComplete`].

mod custom;
mod fade;
mod slide;

pub use custom::{CustomTransition, TransitionFn};
pub use fade::{Fade, FadePhase};
pub use slide::{Slide, SlideDirection};

use crate::config::TransitionConfig;
use crate::dom::Dom;
use crate::env::{BrowserEnvironment, NodeOf};
use crate::error::NavigationError;
use crate::render::{Content, ContentRenderer};
use crate::signals::RouterSignal;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// Class of full-viewport overlays.
pub const OVERLAY_CLASS: &str = "transition-overlay";

/// Class of temporary animation containers.
pub const CONTAINER_CLASS: &str = "transition-container";

/// Everything a transition needs for one navigation.
pub struct TransitionContext<E: BrowserEnvironment> {
	env: Rc<E>,
	renderer: ContentRenderer,
	root: NodeOf<E>,
	previous: Vec<NodeOf<E>>,
	content: Content,
}

impl<E: BrowserEnvironment> TransitionContext<E> {
	/// Captures the current children of `root` as the previous content.
	pub fn new(env: Rc<E>, renderer: ContentRenderer, root: NodeOf<E>, content: Content) -> Self {
		let previous = env.dom().child_nodes(&root);
		Self {
			env,
			renderer,
			root,
			previous,
			content,
		}
	}

	/// The environment.
	pub fn env(&self) -> &Rc<E> {
		&self.env
	}

	/// The element being navigated.
	pub fn root(&self) -> &NodeOf<E> {
		&self.root
	}

	/// The content being mounted.
	pub fn content(&self) -> &Content {
		&self.content
	}

	/// Children of the root when the transition started.
	pub fn previous(&self) -> &[NodeOf<E>] {
		&self.previous
	}

	/// Whether the root had content before. `false` on initial load.
	pub fn has_previous(&self) -> bool {
		!self.previous.is_empty()
	}

	/// Mounts the new content into `target` with the content renderer.
	pub async fn render_into(&self, target: &NodeOf<E>) -> Result<(), NavigationError> {
		self.renderer
			.render_replacing(self.env.as_ref(), &self.content, target, &self.previous)
			.await?;
		Ok(())
	}
}

/// An animated content swap.
pub trait Transition<E: BrowserEnvironment>: 'static {
	/// Name used in logs and errors.
	fn name(&self) -> &'static str;

	/// Swaps the content of `ctx.root()`.
	fn run(&self, ctx: TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>>;
}

/// Swaps content without animation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransition;

impl<E: BrowserEnvironment> Transition<E> for NoTransition {
	fn name(&self) -> &'static str {
		"none"
	}

	fn run(&self, ctx: TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>> {
		async move {
			let root = ctx.root().clone();
			ctx.render_into(&root).await
		}
		.boxed_local()
	}
}

/// Removes every overlay and temporary container from the document.
///
/// Returns how many nodes were removed.
pub fn sweep_transition_nodes<D: Dom>(dom: &D) -> usize {
	let body = dom.body();
	let mut removed = 0;
	for class in [OVERLAY_CLASS, CONTAINER_CLASS] {
		for node in dom.elements_by_class(&body, class) {
			if dom.is_connected(&node) {
				dom.remove(&node);
				removed += 1;
			}
		}
	}
	removed
}

/// Schedules [`sweep_transition_nodes`] on the next turn of the event loop.
pub fn schedule_sweep<E: BrowserEnvironment>(env: &Rc<E>) {
	let env_for_sweep = Rc::clone(env);
	env.set_timeout(
		Duration::ZERO,
		Box::new(move || {
			let removed = sweep_transition_nodes(env_for_sweep.dom());
			if removed > 0 {
				tracing::warn!(
					target: "reinhardt::navigation::transition",
					removed,
					"Removed leftover transition nodes"
				);
			}
		}),
	);
}

/// Runs `transition`, sweeps leftovers and emits `TransitionComplete`
/// through `emit`, on every path.
pub async fn run_transition<E: BrowserEnvironment>(
	transition: &dyn Transition<E>,
	ctx: TransitionContext<E>,
	emit: &dyn Fn(&RouterSignal),
) -> Result<(), NavigationError> {
	let env = Rc::clone(ctx.env());
	let name = transition.name();
	let result = transition.run(ctx).await;
	let removed = sweep_transition_nodes(env.dom());
	if removed > 0 {
		tracing::debug!(
			target: "reinhardt::navigation::transition",
			transition = name,
			removed,
			"swept transition nodes"
		);
	}
	emit(&RouterSignal::TransitionComplete);
	result
}

/// Builds the transition described by `config`.
pub fn build_transition<E: BrowserEnvironment>(config: &TransitionConfig) -> Rc<dyn Transition<E>> {
	match config {
		TransitionConfig::None => Rc::new(NoTransition),
		TransitionConfig::Fade { duration_ms, color } => Rc::new(
			Fade::new(Duration::from_millis(*duration_ms)).with_color(color.clone()),
		),
		TransitionConfig::Slide {
			direction,
			duration_ms,
		} => Rc::new(Slide::new(*direction, Duration::from_millis(*duration_ms))),
	}
}
