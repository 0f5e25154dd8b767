//! Slide the old content out while the new content slides in.

use super::{CONTAINER_CLASS, Transition, TransitionContext};
use crate::dom::Dom;
use crate::env::{BrowserEnvironment, NodeOf, next_frame, sleep};
use crate::error::NavigationError;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;

/// Direction the content moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
	/// New content enters from the right.
	#[default]
	Left,
	/// New content enters from the left.
	Right,
	/// New content enters from the bottom.
	Up,
	/// New content enters from the top.
	Down,
}

impl SlideDirection {
	/// `(exit transform of the old content, start transform of the new content)`.
	fn transforms(self) -> (&'static str, &'static str) {
		match self {
			Self::Left => ("translateX(-100%)", "translateX(100%)"),
			Self::Right => ("translateX(100%)", "translateX(-100%)"),
			Self::Up => ("translateY(-100%)", "translateY(100%)"),
			Self::Down => ("translateY(100%)", "translateY(-100%)"),
		}
	}
}

/// Two absolutely positioned containers animated with `transform`.
#[derive(Debug, Clone, Copy)]
pub struct Slide {
	direction: SlideDirection,
	duration: Duration,
}

impl Slide {
	/// Creates a slide.
	pub fn new(direction: SlideDirection, duration: Duration) -> Self {
		Self {
			direction,
			duration,
		}
	}

	/// The direction.
	pub fn direction(&self) -> SlideDirection {
		self.direction
	}
}

/// Restores the root's `position` and `overflow` on drop.
struct RootStyleGuard<E: BrowserEnvironment> {
	env: Rc<E>,
	root: NodeOf<E>,
	saved: Vec<(&'static str, Option<String>)>,
}

impl<E: BrowserEnvironment> RootStyleGuard<E> {
	fn apply(env: Rc<E>, root: NodeOf<E>) -> Self {
		let dom = env.dom();
		let mut saved = Vec::new();
		for (property, value) in [("position", "relative"), ("overflow", "hidden")] {
			saved.push((property, dom.style(&root, property)));
			dom.set_style(&root, property, value);
		}
		Self { env, root, saved }
	}
}

impl<E: BrowserEnvironment> Drop for RootStyleGuard<E> {
	fn drop(&mut self) {
		let dom = self.env.dom();
		for (property, value) in &self.saved {
			match value {
				Some(value) => dom.set_style(&self.root, property, value),
				None => dom.remove_style(&self.root, property),
			}
		}
	}
}

/// Detaches the old container and unwraps the new one on drop.
struct ContainerGuard<E: BrowserEnvironment> {
	env: Rc<E>,
	old: NodeOf<E>,
	new: NodeOf<E>,
}

impl<E: BrowserEnvironment> Drop for ContainerGuard<E> {
	fn drop(&mut self) {
		let dom = self.env.dom();
		dom.remove(&self.old);
		if dom.unwrap_node(&self.new).is_err() {
			dom.remove(&self.new);
		}
	}
}

fn create_container<E: BrowserEnvironment>(
	env: &E,
	transform: &str,
	duration: Duration,
) -> Result<NodeOf<E>, NavigationError> {
	let dom = env.dom();
	let container = dom.create_element("div")?;
	dom.set_attribute(&container, "class", CONTAINER_CLASS)?;
	let transition = format!("transform {}ms ease", duration.as_millis());
	for (property, value) in [
		("position", "absolute"),
		("top", "0"),
		("left", "0"),
		("width", "100%"),
		("transform", transform),
		("transition", transition.as_str()),
	] {
		dom.set_style(&container, property, value);
	}
	Ok(container)
}

impl<E: BrowserEnvironment> Transition<E> for Slide {
	fn name(&self) -> &'static str {
		"slide"
	}

	fn run(&self, ctx: TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>> {
		let slide = *self;
		async move {
			let env = Rc::clone(ctx.env());
			let root = ctx.root().clone();
			if !ctx.has_previous() {
				return ctx.render_into(&root).await;
			}

			let dom = env.dom();
			let (exit, enter) = slide.direction.transforms();
			let _root_style = RootStyleGuard::apply(Rc::clone(&env), root.clone());

			let old = create_container(env.as_ref(), "translate(0, 0)", slide.duration)?;
			let new = create_container(env.as_ref(), enter, slide.duration)?;
			let _containers = ContainerGuard {
				env: Rc::clone(&env),
				old: old.clone(),
				new: new.clone(),
			};
			for node in ctx.previous() {
				if dom.parent(node).as_ref() == Some(&root) {
					dom.append_child(&old, node)?;
				}
			}
			dom.append_child(&root, &old)?;
			dom.append_child(&root, &new)?;

			ctx.render_into(&new).await?;

			next_frame(env.as_ref()).await;
			tracing::trace!(target: "reinhardt::navigation::transition", direction = ?slide.direction, "slide");
			dom.set_style(&old, "transform", exit);
			dom.set_style(&new, "transform", "translate(0, 0)");
			sleep(env.as_ref(), slide.duration).await;
			Ok(())
		}
		.boxed_local()
	}
}
