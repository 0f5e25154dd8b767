//! Cross-fade through a full-viewport overlay.

use super::{OVERLAY_CLASS, Transition, TransitionContext};
use crate::dom::Dom;
use crate::env::{BrowserEnvironment, FRAME, NodeOf, next_frame, sleep};
use crate::error::NavigationError;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

const LOG_TARGET: &str = "reinhardt::navigation::transition";

/// Steps of a fade, in order.
///
/// Initial loads start at [`FadePhase::Swapping`] with an opaque overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
	/// The overlay goes from transparent to opaque.
	FadingIn,
	/// The content is swapped under the opaque overlay.
	Swapping,
	/// The overlay goes back to transparent.
	FadingOut,
	/// The overlay is removed.
	Cleanup,
}

/// Fades to a solid color, swaps the content and fades back.
#[derive(Debug, Clone)]
pub struct Fade {
	duration: Duration,
	color: String,
}

impl Fade {
	/// Creates a fade whose halves each take `duration`.
	pub fn new(duration: Duration) -> Self {
		Self {
			duration,
			color: "#fff".to_string(),
		}
	}

	/// Sets the overlay color.
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = color.into();
		self
	}

	/// Duration of each half.
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Delay after which the overlay is force-removed.
	///
	/// Always later than a full fade, which takes two halves and two frames.
	pub fn safety_timeout(&self) -> Duration {
		self.duration * 3 + FRAME * 3
	}
}

struct OverlayGuard<E: BrowserEnvironment> {
	env: Rc<E>,
	overlay: NodeOf<E>,
}

impl<E: BrowserEnvironment> Drop for OverlayGuard<E> {
	fn drop(&mut self) {
		self.env.dom().remove(&self.overlay);
	}
}

fn create_overlay<E: BrowserEnvironment>(
	env: &E,
	color: &str,
	duration: Duration,
	opaque: bool,
) -> Result<NodeOf<E>, NavigationError> {
	let dom = env.dom();
	let overlay = dom.create_element("div")?;
	dom.set_attribute(&overlay, "class", OVERLAY_CLASS)?;
	let transition = format!("opacity {}ms ease", duration.as_millis());
	for (property, value) in [
		("position", "fixed"),
		("top", "0"),
		("left", "0"),
		("width", "100vw"),
		("height", "100vh"),
		("background", color),
		("z-index", "9999"),
		("transition", transition.as_str()),
		("opacity", if opaque { "1" } else { "0" }),
	] {
		dom.set_style(&overlay, property, value);
	}
	dom.append_child(&dom.body(), &overlay)?;
	Ok(overlay)
}

impl<E: BrowserEnvironment> Transition<E> for Fade {
	fn name(&self) -> &'static str {
		"fade"
	}

	fn run(&self, ctx: TransitionContext<E>) -> LocalBoxFuture<'static, Result<(), NavigationError>> {
		let fade = self.clone();
		async move {
			let env = Rc::clone(ctx.env());
			let initial = !ctx.has_previous();
			let overlay = create_overlay(env.as_ref(), &fade.color, fade.duration, initial)?;
			let guard = OverlayGuard {
				env: Rc::clone(&env),
				overlay: overlay.clone(),
			};

			let safety_env = Rc::clone(&env);
			let safety_overlay = overlay.clone();
			env.set_timeout(
				fade.safety_timeout(),
				Box::new(move || {
					let dom = safety_env.dom();
					if dom.is_connected(&safety_overlay) {
						tracing::warn!(target: LOG_TARGET, "Fade overlay force-removed by safety timer");
						dom.remove(&safety_overlay);
					}
				}),
			);

			let mut phase = if initial {
				FadePhase::Swapping
			} else {
				FadePhase::FadingIn
			};
			loop {
				tracing::trace!(target: LOG_TARGET, ?phase, "fade");
				phase = match phase {
					FadePhase::FadingIn => {
						next_frame(env.as_ref()).await;
						env.dom().set_style(&overlay, "opacity", "1");
						sleep(env.as_ref(), fade.duration).await;
						FadePhase::Swapping
					}
					FadePhase::Swapping => {
						ctx.render_into(ctx.root()).await?;
						FadePhase::FadingOut
					}
					FadePhase::FadingOut => {
						env.dom().set_style(&overlay, "opacity", "0");
						sleep(env.as_ref(), fade.duration).await;
						FadePhase::Cleanup
					}
					FadePhase::Cleanup => break,
				};
			}
			drop(guard);
			Ok(())
		}
		.boxed_local()
	}
}
