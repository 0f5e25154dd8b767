//! Structured, backend-independent DOM fragments.

use super::html::{escape_html, is_raw_text_element, is_void_element};
use std::borrow::Cow;

/// A detached tree of nodes that can be materialized into any [`Dom`](super::Dom).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
	/// An element.
	Element(ElementNode),
	/// A text node.
	Text(Cow<'static, str>),
	/// A sequence of sibling nodes (no wrapper element).
	List(Vec<Fragment>),
	/// Renders nothing.
	Empty,
}

/// An element of a [`Fragment`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<Fragment>,
}

impl ElementNode {
	/// Creates an element with the given tag name.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Sets an attribute, replacing an earlier value with the same name.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		let name = name.into();
		let value = value.into();
		match self.attrs.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.attrs.push((name, value)),
		}
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoFragment) -> Self {
		self.children.push(child.into_fragment());
		self
	}

	/// Appends several children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoFragment>) -> Self {
		self.children
			.extend(children.into_iter().map(IntoFragment::into_fragment));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes in insertion order.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns a single attribute value.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// Returns the children.
	pub fn child_fragments(&self) -> &[Fragment] {
		&self.children
	}

	/// Whether this is a void element (no closing tag).
	pub fn is_void(&self) -> bool {
		is_void_element(&self.tag)
	}
}

impl Fragment {
	/// Starts an element builder.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementNode {
		ElementNode::new(tag)
	}

	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a sibling list.
	pub fn list(children: impl IntoIterator<Item = impl IntoFragment>) -> Self {
		Self::List(children.into_iter().map(IntoFragment::into_fragment).collect())
	}

	/// Serializes the fragment to HTML.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.write_html(&mut output, false);
		output
	}

	fn write_html(&self, output: &mut String, raw_text: bool) {
		match self {
			Fragment::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());
				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&escape_html(value));
					output.push('"');
				}
				if el.is_void() {
					output.push_str(" />");
					return;
				}
				output.push('>');
				let raw = is_raw_text_element(el.tag_name());
				for child in el.child_fragments() {
					child.write_html(output, raw);
				}
				output.push_str("</");
				output.push_str(el.tag_name());
				output.push('>');
			}
			Fragment::Text(text) if raw_text => output.push_str(text),
			Fragment::Text(text) => output.push_str(&escape_html(text)),
			Fragment::List(children) => {
				for child in children {
					child.write_html(output, raw_text);
				}
			}
			Fragment::Empty => {}
		}
	}
}

/// Conversion into a [`Fragment`].
pub trait IntoFragment {
	/// Converts self into a fragment.
	fn into_fragment(self) -> Fragment;
}

impl IntoFragment for Fragment {
	fn into_fragment(self) -> Fragment {
		self
	}
}

impl IntoFragment for ElementNode {
	fn into_fragment(self) -> Fragment {
		Fragment::Element(self)
	}
}

impl IntoFragment for String {
	fn into_fragment(self) -> Fragment {
		Fragment::Text(Cow::Owned(self))
	}
}

impl IntoFragment for &'static str {
	fn into_fragment(self) -> Fragment {
		Fragment::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoFragment> IntoFragment for Option<T> {
	fn into_fragment(self) -> Fragment {
		self.map_or(Fragment::Empty, IntoFragment::into_fragment)
	}
}

impl<T: IntoFragment> IntoFragment for Vec<T> {
	fn into_fragment(self) -> Fragment {
		Fragment::list(self)
	}
}

impl IntoFragment for () {
	fn into_fragment(self) -> Fragment {
		Fragment::Empty
	}
}

impl From<ElementNode> for Fragment {
	fn from(element: ElementNode) -> Self {
		Fragment::Element(element)
	}
}
