//! User-supplied transitions.

use super::{Transition, TransitionContext, sweep_transition_nodes};
use crate::env::BrowserEnvironment;
use crate::error::NavigationError;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::future::Future;
use std::rc::Rc;

/// Signature of a custom transition function.
pub type TransitionFn<E> =
	Rc<dyn Fn(TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>>>;

/// Wraps a transition function with guaranteed cleanup.
///
/// After the function's future resolves, successfully or not, leftover
/// overlays and containers are removed and the `on_complete` callback runs.
/// The function is responsible for mounting the content, typically through
/// [`TransitionContext::render_into`].
///
/// ```
/// use reinhardt_navigation::env::MemoryEnvironment;
/// use reinhardt_navigation::transition::CustomTransition;
///
/// let instant = CustomTransition::<MemoryEnvironment>::new(|ctx| async move {
///     let root = ctx.root().clone();
///     ctx.render_into(&root).await
/// });
/// ```
pub struct CustomTransition<E: BrowserEnvironment> {
	name: &'static str,
	run: TransitionFn<E>,
	on_complete: Option<Rc<dyn Fn()>>,
}

impl<E: BrowserEnvironment> Clone for CustomTransition<E> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			run: Rc::clone(&self.run),
			on_complete: self.on_complete.clone(),
		}
	}
}

impl<E: BrowserEnvironment> CustomTransition<E> {
	/// Wraps an async transition function.
	pub fn new<F, Fut>(f: F) -> Self
	where
		F: Fn(TransitionContext<E>) -> Fut + 'static,
		Fut: Future<Output = Result<(), NavigationError>> + 'static,
	{
		Self {
			name: "custom",
			run: Rc::new(move |ctx| f(ctx).boxed_local()),
			on_complete: None,
		}
	}

	/// Sets the name used in logs.
	pub fn with_name(mut self, name: &'static str) -> Self {
		self.name = name;
		self
	}

	/// Runs `f` after every invocation.
	pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
		self.on_complete = Some(Rc::new(f));
		self
	}
}

impl<E: BrowserEnvironment> Transition<E> for CustomTransition<E> {
	fn name(&self) -> &'static str {
		self.name
	}

	fn run(&self, ctx: TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>> {
		let env = Rc::clone(ctx.env());
		let name = self.name;
		let on_complete = self.on_complete.clone();
		let transition = (self.run)(ctx);
		async move {
			let result = transition.await;
			sweep_transition_nodes(env.dom());
			if let Some(on_complete) = on_complete {
				on_complete();
			}
			result.map_err(|err| match err {
				err @ NavigationError::Transition { .. } => err,
				other => NavigationError::Transition {
					name,
					message: other.to_string(),
				},
			})
		}
		.boxed_local()
	}
}
