//! Mounting view output into the live document.
//!
//! New content is built in an invisible `.spa-content` container inside the
//! target and only revealed once it is complete:
//!
//! 1. the container is created with `position: absolute; opacity: 0`
//! 2. the content is parsed or materialized into it
//! 3. custom elements that were already mounted are moved into it, replacing
//!    their freshly parsed placeholders
//! 4. one frame passes
//! 5. the previous children are removed and the container joins the flow
//! 6. scripts are re-executed according to the [`ScriptPolicy`]

mod preserve;
mod scripts;

pub use scripts::{ScriptKind, ScriptPolicy, ScriptRequest};

use crate::dom::{Dom, ElementNode, Fragment};
use crate::env::{BrowserEnvironment, NodeOf, next_frame};
use crate::error::DomError;

/// Class of the container the renderer mounts content into.
pub const CONTENT_CLASS: &str = "spa-content";

const STAGING_STYLES: &[(&str, &str)] = &[
	("position", "absolute"),
	("top", "0"),
	("left", "0"),
	("width", "100%"),
	("opacity", "0"),
	("pointer-events", "none"),
];

/// View output ready to be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
	/// Markup assigned through `innerHTML`.
	Html(String),
	/// A structured fragment.
	Fragment(Fragment),
}

impl Content {
	/// Serializes the content to HTML.
	pub fn to_html(&self) -> String {
		match self {
			Content::Html(html) => html.clone(),
			Content::Fragment(fragment) => fragment.render_to_string(),
		}
	}
}

impl From<String> for Content {
	fn from(html: String) -> Self {
		Content::Html(html)
	}
}

impl From<&str> for Content {
	fn from(html: &str) -> Self {
		Content::Html(html.to_string())
	}
}

impl From<Fragment> for Content {
	fn from(fragment: Fragment) -> Self {
		Content::Fragment(fragment)
	}
}

impl From<ElementNode> for Content {
	fn from(element: ElementNode) -> Self {
		Content::Fragment(element.into())
	}
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
	/// Custom elements kept from the previous content.
	pub preserved: usize,
	/// Scripts handed to the page.
	pub scripts_executed: usize,
}

/// Mounts [`Content`] under a target element.
///
/// Two renders into the same target must not overlap; the router's
/// navigation guard is what serializes them.
#[derive(Debug, Clone, Default)]
pub struct ContentRenderer {
	policy: ScriptPolicy,
	base_url: Option<String>,
}

impl ContentRenderer {
	/// Creates a renderer with the given script policy.
	pub fn new(policy: ScriptPolicy) -> Self {
		Self {
			policy,
			base_url: None,
		}
	}

	/// Resolves module script URLs against `base_url` instead of the
	/// document location.
	pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
		self.base_url = base_url;
		self
	}

	/// The script policy.
	pub fn policy(&self) -> ScriptPolicy {
		self.policy
	}

	/// Replaces the children of `target` with `content`.
	pub async fn render<E: BrowserEnvironment>(
		&self,
		env: &E,
		content: &Content,
		target: &NodeOf<E>,
	) -> Result<RenderReport, DomError> {
		let previous = env.dom().child_nodes(target);
		self.render_replacing(env, content, target, &previous).await
	}

	/// Renders `content` into `target`, treating `previous` as the content
	/// being replaced.
	///
	/// Custom elements are preserved from the subtrees of `previous`, and the
	/// nodes of `previous` that are still children of `target` afterwards are
	/// removed.
	pub async fn render_replacing<E: BrowserEnvironment>(
		&self,
		env: &E,
		content: &Content,
		target: &NodeOf<E>,
		previous: &[NodeOf<E>],
	) -> Result<RenderReport, DomError> {
		let dom = env.dom();
		let mounted = preserve::outermost_custom_elements(dom, previous);

		let container = dom.create_element("div")?;
		dom.set_attribute(&container, "class", CONTENT_CLASS)?;
		for (property, value) in STAGING_STYLES {
			dom.set_style(&container, property, value);
		}
		dom.append_child(target, &container)?;

		match content {
			Content::Html(html) => dom.set_inner_html(&container, html)?,
			Content::Fragment(fragment) => dom.append_fragment(&container, fragment)?,
		}
		let adopted = preserve::adopt(dom, &mounted, &container)?;

		next_frame(env).await;

		for node in previous {
			if dom.parent(node).as_ref() == Some(target) {
				dom.remove(node);
			}
		}
		for (property, _) in STAGING_STYLES {
			dom.remove_style(&container, property);
		}

		let scripts_executed = scripts::reexecute(
			env,
			self.policy,
			self.base_url.as_deref(),
			&container,
			&adopted,
		)?;
		tracing::debug!(
			target: "reinhardt::navigation::render",
			preserved = adopted.len(),
			scripts_executed,
			"content mounted"
		);
		Ok(RenderReport {
			preserved: adopted.len(),
			scripts_executed,
		})
	}
}
