//! Markup helpers for router-aware pages.

use crate::dom::{Fragment, IntoFragment};

/// An anchor the router intercepts.
///
/// External links render `target="_blank"` and are therefore left to the
/// browser.
///
/// ```
/// use reinhardt_navigation::router::Link;
///
/// let html = Link::new("/users/42", "View User").class("btn").render().render_to_string();
/// assert_eq!(html, "<a href=\"/users/42\" class=\"btn\" data-link=\"true\">View User</a>");
/// ```
#[derive(Debug, Clone)]
pub struct Link {
	/// The destination path.
	to: String,
	/// The link text.
	content: String,
	/// Additional CSS classes.
	class: Option<String>,
	/// Whether to open in a new tab (disables interception).
	external: bool,
	/// Custom attributes.
	attrs: Vec<(String, String)>,
}

impl Link {
	/// Creates a new link.
	pub fn new(to: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			content: content.into(),
			class: None,
			external: false,
			attrs: Vec::new(),
		}
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Sets whether this is an external link.
	pub fn external(mut self, external: bool) -> Self {
		self.external = external;
		self
	}

	/// Adds a custom attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Returns whether this is an external link.
	pub fn is_external(&self) -> bool {
		self.external
	}

	/// Renders the anchor.
	pub fn render(&self) -> Fragment {
		let mut el = Fragment::element("a").attr("href", self.to.clone());
		if let Some(class) = &self.class {
			el = el.attr("class", class.clone());
		}
		if self.external {
			el = el
				.attr("target", "_blank")
				.attr("rel", "noopener noreferrer");
		} else {
			el = el.attr("data-link", "true");
		}
		for (name, value) in &self.attrs {
			el = el.attr(name.clone(), value.clone());
		}
		el.child(self.content.clone()).into_fragment()
	}
}

impl IntoFragment for Link {
	fn into_fragment(self) -> Fragment {
		self.render()
	}
}

/// The element route content is rendered into.
///
/// Its `id` must match [`RouterConfig::root_id`](crate::config::RouterConfig::root_id).
#[derive(Debug, Clone)]
pub struct RouterOutlet {
	id: String,
	class: Option<String>,
}

impl Default for RouterOutlet {
	fn default() -> Self {
		Self {
			id: "app".to_string(),
			class: None,
		}
	}
}

impl RouterOutlet {
	/// Creates an outlet with the default `app` id.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the ID attribute.
	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Renders the empty outlet.
	pub fn render(&self) -> Fragment {
		let mut el = Fragment::element("div")
			.attr("id", self.id.clone())
			.attr("data-router-outlet", "true");
		if let Some(class) = &self.class {
			el = el.attr("class", class.clone());
		}
		el.into_fragment()
	}
}

impl IntoFragment for RouterOutlet {
	fn into_fragment(self) -> Fragment {
		self.render()
	}
}
