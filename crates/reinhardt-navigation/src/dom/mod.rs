//! DOM abstraction layer.
//!
//! The navigation engine never touches a concrete document. Everything it
//! needs is expressed through the [`Dom`] trait, implemented by
//! [`MemoryDom`] (headless, used by tests) and, on wasm32, by
//! `WebDom` over `web-sys`.

mod fragment;
pub mod html;
mod memory;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod web;

pub use fragment::{ElementNode, Fragment, IntoFragment};
pub use memory::{MemoryDom, NodeId};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use web::WebDom;

use crate::error::DomError;
use std::fmt;

/// Operations the engine performs on a document.
///
/// Node handles are cheap to clone and compare by identity. All methods take
/// `&self`: backends use interior mutability, mirroring the browser's own
/// object model.
pub trait Dom: 'static {
	/// Handle to a node of this document.
	type Node: Clone + PartialEq + fmt::Debug + 'static;

	/// Returns the `<body>` element.
	fn body(&self) -> Self::Node;

	/// Looks up an element by its `id` attribute.
	fn element_by_id(&self, id: &str) -> Option<Self::Node>;

	/// Creates a detached element.
	fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

	/// Creates a detached text node.
	fn create_text(&self, text: &str) -> Self::Node;

	/// Returns the lowercase tag name, or `None` for non-element nodes.
	fn tag_name(&self, node: &Self::Node) -> Option<String>;

	/// Reads an attribute.
	fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

	/// Returns all attributes in source order.
	fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

	/// Sets an attribute.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

	/// Removes an attribute, if present.
	fn remove_attribute(&self, node: &Self::Node, name: &str);

	/// Reads an inline style property.
	fn style(&self, node: &Self::Node, property: &str) -> Option<String>;

	/// Sets an inline style property.
	fn set_style(&self, node: &Self::Node, property: &str, value: &str);

	/// Removes an inline style property.
	fn remove_style(&self, node: &Self::Node, property: &str);

	/// Concatenated text of the node and its descendants.
	fn text_content(&self, node: &Self::Node) -> String;

	/// Replaces all children with a single text node.
	fn set_text_content(&self, node: &Self::Node, text: &str);

	/// Serializes the children of `node`.
	fn inner_html(&self, node: &Self::Node) -> String;

	/// Replaces the children of `node` with parsed HTML.
	///
	/// Scripts inserted this way are inert, as in a browser.
	fn set_inner_html(&self, node: &Self::Node, html: &str) -> Result<(), DomError>;

	/// Direct children, in order.
	fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

	/// Parent node, if attached.
	fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Appends `child` to `parent`, detaching it from its previous parent.
	fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

	/// Inserts `child` before `reference` (or appends when `None`).
	fn insert_before(
		&self,
		parent: &Self::Node,
		child: &Self::Node,
		reference: Option<&Self::Node>,
	) -> Result<(), DomError>;

	/// Replaces `old` (a child of `parent`) with `new`.
	fn replace_child(
		&self,
		parent: &Self::Node,
		new: &Self::Node,
		old: &Self::Node,
	) -> Result<(), DomError>;

	/// Detaches `node` from its parent. No-op for detached nodes.
	fn remove(&self, node: &Self::Node);

	/// Whether the node is reachable from the document.
	fn is_connected(&self, node: &Self::Node) -> bool;

	/// All descendant elements of `root` in document order (excluding `root`).
	fn descendant_elements(&self, root: &Self::Node) -> Vec<Self::Node> {
		let mut out = Vec::new();
		let mut stack: Vec<Self::Node> = self.child_nodes(root).into_iter().rev().collect();
		while let Some(node) = stack.pop() {
			if self.tag_name(&node).is_some() {
				stack.extend(self.child_nodes(&node).into_iter().rev());
				out.push(node);
			}
		}
		out
	}

	/// Whether the element's `class` attribute contains `class`.
	fn has_class(&self, node: &Self::Node, class: &str) -> bool {
		self.attribute(node, "class")
			.is_some_and(|value| value.split_whitespace().any(|c| c == class))
	}

	/// Descendant elements of `root` carrying `class`.
	fn elements_by_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node> {
		self.descendant_elements(root)
			.into_iter()
			.filter(|node| self.has_class(node, class))
			.collect()
	}

	/// Descendant elements of `root` with the given tag name.
	fn elements_by_tag(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node> {
		self.descendant_elements(root)
			.into_iter()
			.filter(|node| self.tag_name(node).as_deref() == Some(tag))
			.collect()
	}

	/// Whether the node is a custom element (tag name contains a hyphen).
	fn is_custom_element(&self, node: &Self::Node) -> bool {
		self.tag_name(node).is_some_and(|tag| tag.contains('-'))
	}

	/// Moves every child of `from` to the end of `to`.
	fn move_children(&self, from: &Self::Node, to: &Self::Node) -> Result<(), DomError> {
		for child in self.child_nodes(from) {
			self.append_child(to, &child)?;
		}
		Ok(())
	}

	/// Replaces `container` with its own children.
	fn unwrap_node(&self, container: &Self::Node) -> Result<(), DomError> {
		let Some(parent) = self.parent(container) else {
			return Ok(());
		};
		for child in self.child_nodes(container) {
			self.insert_before(&parent, &child, Some(container))?;
		}
		self.remove(container);
		Ok(())
	}

	/// Materializes a [`Fragment`] as children of `parent`.
	fn append_fragment(&self, parent: &Self::Node, fragment: &Fragment) -> Result<(), DomError> {
		match fragment {
			Fragment::Element(element) => {
				let node = self.create_element(element.tag_name())?;
				for (name, value) in element.attrs() {
					self.set_attribute(&node, name, value)?;
				}
				for child in element.child_fragments() {
					self.append_fragment(&node, child)?;
				}
				self.append_child(parent, &node)
			}
			Fragment::Text(text) => {
				let node = self.create_text(text);
				self.append_child(parent, &node)
			}
			Fragment::List(children) => {
				for child in children {
					self.append_fragment(parent, child)?;
				}
				Ok(())
			}
			Fragment::Empty => Ok(()),
		}
	}
}
