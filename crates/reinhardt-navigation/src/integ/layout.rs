use crate::render::Content;
use indexmap::IndexMap;
use std::rc::Rc;

/// Wraps a route's content in the named layout.
pub type LayoutWrapper = Rc<dyn Fn(Content, &str) -> Content>;

type LayoutFn = Rc<dyn Fn(Content) -> Content>;

/// Named layouts, usable as a [`LayoutWrapper`].
///
/// ```
/// use reinhardt_navigation::integ::LayoutRegistry;
/// use reinhardt_navigation::render::Content;
///
/// let layouts = LayoutRegistry::new().register("shell", |content: Content| {
///     Content::Html(format!("<main>{}</main>", content.to_html()))
/// });
/// let wrap = layouts.into_wrapper();
/// assert_eq!(wrap("<p>hi</p>".into(), "shell"), Content::Html("<main><p>hi</p></main>".into()));
/// ```
#[derive(Clone, Default)]
pub struct LayoutRegistry {
	layouts: IndexMap<String, LayoutFn>,
}

impl LayoutRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a layout.
	pub fn register(mut self, name: impl Into<String>, layout: impl Fn(Content) -> Content + 'static) -> Self {
		self.layouts.insert(name.into(), Rc::new(layout));
		self
	}

	/// Whether a layout is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.layouts.contains_key(name)
	}

	/// Applies the named layout. Unknown names leave the content unchanged.
	pub fn wrap(&self, content: Content, name: &str) -> Content {
		match self.layouts.get(name) {
			Some(layout) => layout(content),
			None => {
				tracing::warn!(target: "reinhardt::navigation", "Unknown layout '{name}'");
				content
			}
		}
	}

	/// Converts the registry into a [`LayoutWrapper`].
	pub fn into_wrapper(self) -> LayoutWrapper {
		Rc::new(move |content: Content, name: &str| self.wrap(content, name))
	}
}

impl std::fmt::Debug for LayoutRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LayoutRegistry")
			.field("layouts", &self.layouts.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unknown_layout_passes_through() {
		let layouts = LayoutRegistry::new();
		assert_eq!(layouts.wrap("x".into(), "missing"), Content::Html("x".into()));
	}

	#[test]
	fn test_register_replaces() {
		let layouts = LayoutRegistry::new()
			.register("a", |_| Content::Html("one".into()))
			.register("a", |_| Content::Html("two".into()));
		assert!(layouts.contains("a"));
		assert_eq!(layouts.wrap("x".into(), "a"), Content::Html("two".into()));
	}
}
