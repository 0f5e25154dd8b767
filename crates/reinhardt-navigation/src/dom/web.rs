//! `web-sys` backend over the live browser document.

use super::Dom;
use crate::error::DomError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

fn js_error(err: JsValue) -> DomError {
	DomError::Js(format!("{err:?}"))
}

/// The browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
	document: Document,
}

impl WebDom {
	/// Wraps the window's document, if there is one.
	pub fn from_window() -> Option<Self> {
		let document = web_sys::window()?.document()?;
		Some(Self { document })
	}

	/// Wraps an explicit document.
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	/// Returns the underlying document.
	pub fn document(&self) -> &Document {
		&self.document
	}

	fn element(node: &Node) -> Result<&Element, DomError> {
		node.dyn_ref::<Element>()
			.ok_or_else(|| DomError::NotAnElement(node.node_name()))
	}
}

impl Dom for WebDom {
	type Node = Node;

	fn body(&self) -> Node {
		match self.document.body() {
			Some(body) => body.into(),
			None => self.document.clone().into(),
		}
	}

	fn element_by_id(&self, id: &str) -> Option<Node> {
		self.document.get_element_by_id(id).map(Into::into)
	}

	fn create_element(&self, tag: &str) -> Result<Node, DomError> {
		self.document
			.create_element(tag)
			.map(Into::into)
			.map_err(|_| DomError::CreateElement(tag.to_string()))
	}

	fn create_text(&self, text: &str) -> Node {
		self.document.create_text_node(text).into()
	}

	fn tag_name(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>().map(Element::local_name)
	}

	fn attribute(&self, node: &Node, name: &str) -> Option<String> {
		node.dyn_ref::<Element>()?.get_attribute(name)
	}

	fn attributes(&self, node: &Node) -> Vec<(String, String)> {
		let Some(element) = node.dyn_ref::<Element>() else {
			return Vec::new();
		};
		element
			.get_attribute_names()
			.iter()
			.filter_map(|name| name.as_string())
			.filter_map(|name| {
				let value = element.get_attribute(&name)?;
				Some((name, value))
			})
			.collect()
	}

	fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
		Self::element(node)?
			.set_attribute(name, value)
			.map_err(js_error)
	}

	fn remove_attribute(&self, node: &Node, name: &str) {
		if let Some(element) = node.dyn_ref::<Element>() {
			let _ = element.remove_attribute(name);
		}
	}

	fn style(&self, node: &Node, property: &str) -> Option<String> {
		let value = node
			.dyn_ref::<HtmlElement>()?
			.style()
			.get_property_value(property)
			.ok()?;
		(!value.is_empty()).then_some(value)
	}

	fn set_style(&self, node: &Node, property: &str, value: &str) {
		if let Some(element) = node.dyn_ref::<HtmlElement>() {
			let _ = element.style().set_property(property, value);
		}
	}

	fn remove_style(&self, node: &Node, property: &str) {
		if let Some(element) = node.dyn_ref::<HtmlElement>() {
			let _ = element.style().remove_property(property);
		}
	}

	fn text_content(&self, node: &Node) -> String {
		node.text_content().unwrap_or_default()
	}

	fn set_text_content(&self, node: &Node, text: &str) {
		node.set_text_content(Some(text));
	}

	fn inner_html(&self, node: &Node) -> String {
		node.dyn_ref::<Element>()
			.map(Element::inner_html)
			.unwrap_or_default()
	}

	fn set_inner_html(&self, node: &Node, html: &str) -> Result<(), DomError> {
		Self::element(node)?.set_inner_html(html);
		Ok(())
	}

	fn child_nodes(&self, node: &Node) -> Vec<Node> {
		let list = node.child_nodes();
		(0..list.length()).filter_map(|i| list.item(i)).collect()
	}

	fn parent(&self, node: &Node) -> Option<Node> {
		node.parent_node()
	}

	fn append_child(&self, parent: &Node, child: &Node) -> Result<(), DomError> {
		parent.append_child(child).map(|_| ()).map_err(js_error)
	}

	fn insert_before(
		&self,
		parent: &Node,
		child: &Node,
		reference: Option<&Node>,
	) -> Result<(), DomError> {
		parent
			.insert_before(child, reference)
			.map(|_| ())
			.map_err(js_error)
	}

	fn replace_child(&self, parent: &Node, new: &Node, old: &Node) -> Result<(), DomError> {
		if new == old {
			return Ok(());
		}
		parent.replace_child(new, old).map(|_| ()).map_err(js_error)
	}

	fn remove(&self, node: &Node) {
		if let Some(parent) = node.parent_node() {
			let _ = parent.remove_child(node);
		}
	}

	fn is_connected(&self, node: &Node) -> bool {
		node.is_connected()
	}
}
