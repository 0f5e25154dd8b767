//! Arena-backed in-memory document.

use super::Dom;
use super::fragment::Fragment;
use super::html::{escape_html, is_raw_text_element, is_void_element, parse_fragment};
use crate::error::DomError;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;

/// Handle to a node of a [`MemoryDom`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug)]
enum NodeKind {
	Document,
	Element {
		tag: String,
		attrs: Vec<(String, String)>,
		styles: IndexMap<String, String>,
	},
	Text(String),
}

#[derive(Debug)]
struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug)]
struct Arena {
	nodes: Vec<NodeData>,
	document: NodeId,
	body: NodeId,
}

impl Arena {
	fn new() -> Self {
		let mut arena = Self {
			nodes: Vec::new(),
			document: NodeId(0),
			body: NodeId(0),
		};
		let document = arena.alloc(NodeKind::Document);
		let body = arena.alloc(NodeKind::Element {
			tag: "body".to_string(),
			attrs: Vec::new(),
			styles: IndexMap::new(),
		});
		arena.nodes[body.0].parent = Some(document);
		arena.nodes[document.0].children.push(body);
		arena.document = document;
		arena.body = body;
		arena
	}

	fn alloc(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			kind,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	fn get(&self, id: NodeId) -> Result<&NodeData, DomError> {
		self.nodes
			.get(id.0)
			.ok_or_else(|| DomError::UnknownNode(format!("{id:?}")))
	}

	fn detach(&mut self, id: NodeId) {
		if let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) {
			self.nodes[parent.0].children.retain(|c| *c != id);
			self.nodes[id.0].parent = None;
		}
	}

	fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			match self.nodes[node.0].parent {
				Some(parent) => node = parent,
				None => return false,
			}
		}
	}

	fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
		self.get(parent)?;
		self.get(child)?;
		if matches!(self.nodes[parent.0].kind, NodeKind::Text(_)) {
			return Err(DomError::HierarchyRequest(format!(
				"{parent:?} is a text node"
			)));
		}
		if matches!(self.nodes[child.0].kind, NodeKind::Document) {
			return Err(DomError::HierarchyRequest(
				"the document node cannot be inserted".to_string(),
			));
		}
		if self.is_ancestor_or_self(child, parent) {
			return Err(DomError::HierarchyRequest(format!(
				"{child:?} is an ancestor of {parent:?}"
			)));
		}
		Ok(())
	}

	fn insert_at(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
		self.detach(child);
		let children = &mut self.nodes[parent.0].children;
		match index {
			Some(index) if index <= children.len() => children.insert(index, child),
			_ => children.push(child),
		}
		self.nodes[child.0].parent = Some(parent);
	}

	fn build_fragment(&mut self, parent: NodeId, fragment: &Fragment) {
		match fragment {
			Fragment::Element(el) => {
				let id = self.alloc(NodeKind::Element {
					tag: el.tag_name().to_string(),
					attrs: el
						.attrs()
						.iter()
						.map(|(n, v)| (n.to_string(), v.to_string()))
						.collect(),
					styles: IndexMap::new(),
				});
				self.insert_at(parent, id, None);
				for child in el.child_fragments() {
					self.build_fragment(id, child);
				}
			}
			Fragment::Text(text) => {
				let id = self.alloc(NodeKind::Text(text.to_string()));
				self.insert_at(parent, id, None);
			}
			Fragment::List(children) => {
				for child in children {
					self.build_fragment(parent, child);
				}
			}
			Fragment::Empty => {}
		}
	}

	fn collect_text(&self, id: NodeId, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Text(text) => out.push_str(text),
			_ => {
				for child in &self.nodes[id.0].children {
					self.collect_text(*child, out);
				}
			}
		}
	}

	fn serialize_children(&self, id: NodeId, out: &mut String) {
		let raw = match &self.nodes[id.0].kind {
			NodeKind::Element { tag, .. } => is_raw_text_element(tag),
			_ => false,
		};
		for child in &self.nodes[id.0].children {
			self.serialize(*child, raw, out);
		}
	}

	fn serialize(&self, id: NodeId, raw_text: bool, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Document => self.serialize_children(id, out),
			NodeKind::Text(text) if raw_text => out.push_str(text),
			NodeKind::Text(text) => out.push_str(&escape_html(text)),
			NodeKind::Element { tag, attrs, styles } => {
				out.push('<');
				out.push_str(tag);
				for (name, value) in attrs {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					out.push_str(&escape_html(value));
					out.push('"');
				}
				if !styles.is_empty() {
					out.push_str(" style=\"");
					out.push_str(&escape_html(&style_text(styles)));
					out.push('"');
				}
				if is_void_element(tag) {
					out.push_str(" />");
					return;
				}
				out.push('>');
				self.serialize_children(id, out);
				out.push_str("</");
				out.push_str(tag);
				out.push('>');
			}
		}
	}
}

fn style_text(styles: &IndexMap<String, String>) -> String {
	styles
		.iter()
		.map(|(prop, value)| format!("{prop}: {value};"))
		.collect::<Vec<_>>()
		.join(" ")
}

fn parse_style(text: &str) -> IndexMap<String, String> {
	text.split(';')
		.filter_map(|decl| {
			let (prop, value) = decl.split_once(':')?;
			let prop = prop.trim();
			(!prop.is_empty()).then(|| (prop.to_ascii_lowercase(), value.trim().to_string()))
		})
		.collect()
}

/// Headless document used by tests and non-browser hosts.
///
/// The document starts with an empty `<body>`. Inline styles are kept apart
/// from the attribute list and serialized back as a `style` attribute.
#[derive(Debug)]
pub struct MemoryDom {
	arena: RefCell<Arena>,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	/// Creates a document with an empty body.
	pub fn new() -> Self {
		Self {
			arena: RefCell::new(Arena::new()),
		}
	}

	/// Creates a document whose body holds the given markup.
	pub fn with_body_html(html: &str) -> Self {
		let dom = Self::new();
		let body = dom.body();
		// The body always exists and is an element.
		let _ = dom.set_inner_html(&body, html);
		dom
	}

	/// Serializes the whole body, including the `<body>` tag.
	pub fn outer_html(&self, node: &NodeId) -> String {
		let arena = self.arena.borrow();
		let mut out = String::new();
		if arena.nodes.get(node.0).is_some() {
			arena.serialize(*node, false, &mut out);
		}
		out
	}

	/// Number of nodes ever allocated (detached ones included).
	pub fn allocated_nodes(&self) -> usize {
		self.arena.borrow().nodes.len()
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn body(&self) -> NodeId {
		self.arena.borrow().body
	}

	fn element_by_id(&self, id: &str) -> Option<NodeId> {
		let document = self.arena.borrow().document;
		self.descendant_elements(&document)
			.into_iter()
			.find(|node| self.attribute(node, "id").as_deref() == Some(id))
	}

	fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
		let valid = tag
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic())
			&& tag
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
		if !valid {
			return Err(DomError::CreateElement(tag.to_string()));
		}
		Ok(self.arena.borrow_mut().alloc(NodeKind::Element {
			tag: tag.to_ascii_lowercase(),
			attrs: Vec::new(),
			styles: IndexMap::new(),
		}))
	}

	fn create_text(&self, text: &str) -> NodeId {
		self.arena
			.borrow_mut()
			.alloc(NodeKind::Text(text.to_string()))
	}

	fn tag_name(&self, node: &NodeId) -> Option<String> {
		match &self.arena.borrow().nodes.get(node.0)?.kind {
			NodeKind::Element { tag, .. } => Some(tag.clone()),
			_ => None,
		}
	}

	fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
		let arena = self.arena.borrow();
		match &arena.nodes.get(node.0)?.kind {
			NodeKind::Element { styles, .. } if name == "style" => {
				(!styles.is_empty()).then(|| style_text(styles))
			}
			NodeKind::Element { attrs, .. } => attrs
				.iter()
				.find(|(n, _)| n == name)
				.map(|(_, v)| v.clone()),
			_ => None,
		}
	}

	fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
		let arena = self.arena.borrow();
		match arena.nodes.get(node.0).map(|n| &n.kind) {
			Some(NodeKind::Element { attrs, styles, .. }) => {
				let mut all = attrs.clone();
				if !styles.is_empty() {
					all.push(("style".to_string(), style_text(styles)));
				}
				all
			}
			_ => Vec::new(),
		}
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
		let mut arena = self.arena.borrow_mut();
		let data = arena
			.nodes
			.get_mut(node.0)
			.ok_or_else(|| DomError::UnknownNode(format!("{node:?}")))?;
		match &mut data.kind {
			NodeKind::Element { styles, .. } if name.eq_ignore_ascii_case("style") => {
				*styles = parse_style(value);
				Ok(())
			}
			NodeKind::Element { attrs, .. } => {
				let name = name.to_ascii_lowercase();
				match attrs.iter_mut().find(|(n, _)| *n == name) {
					Some(slot) => slot.1 = value.to_string(),
					None => attrs.push((name, value.to_string())),
				}
				Ok(())
			}
			_ => Err(DomError::NotAnElement(format!("{node:?}"))),
		}
	}

	fn remove_attribute(&self, node: &NodeId, name: &str) {
		let mut arena = self.arena.borrow_mut();
		if let Some(NodeKind::Element { attrs, styles, .. }) =
			arena.nodes.get_mut(node.0).map(|n| &mut n.kind)
		{
			if name.eq_ignore_ascii_case("style") {
				styles.clear();
			} else {
				attrs.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
			}
		}
	}

	fn style(&self, node: &NodeId, property: &str) -> Option<String> {
		match &self.arena.borrow().nodes.get(node.0)?.kind {
			NodeKind::Element { styles, .. } => styles.get(property).cloned(),
			_ => None,
		}
	}

	fn set_style(&self, node: &NodeId, property: &str, value: &str) {
		let mut arena = self.arena.borrow_mut();
		if let Some(NodeKind::Element { styles, .. }) =
			arena.nodes.get_mut(node.0).map(|n| &mut n.kind)
		{
			styles.insert(property.to_string(), value.to_string());
		}
	}

	fn remove_style(&self, node: &NodeId, property: &str) {
		let mut arena = self.arena.borrow_mut();
		if let Some(NodeKind::Element { styles, .. }) =
			arena.nodes.get_mut(node.0).map(|n| &mut n.kind)
		{
			styles.shift_remove(property);
		}
	}

	fn text_content(&self, node: &NodeId) -> String {
		let arena = self.arena.borrow();
		let mut out = String::new();
		if arena.nodes.get(node.0).is_some() {
			arena.collect_text(*node, &mut out);
		}
		out
	}

	fn set_text_content(&self, node: &NodeId, text: &str) {
		let mut arena = self.arena.borrow_mut();
		if arena.nodes.get(node.0).is_none() {
			return;
		}
		if let NodeKind::Text(existing) = &mut arena.nodes[node.0].kind {
			*existing = text.to_string();
			return;
		}
		for child in std::mem::take(&mut arena.nodes[node.0].children) {
			arena.nodes[child.0].parent = None;
		}
		if !text.is_empty() {
			let id = arena.alloc(NodeKind::Text(text.to_string()));
			arena.insert_at(*node, id, None);
		}
	}

	fn inner_html(&self, node: &NodeId) -> String {
		let arena = self.arena.borrow();
		let mut out = String::new();
		if arena.nodes.get(node.0).is_some() {
			arena.serialize_children(*node, &mut out);
		}
		out
	}

	fn set_inner_html(&self, node: &NodeId, html: &str) -> Result<(), DomError> {
		let fragments = parse_fragment(html);
		let mut arena = self.arena.borrow_mut();
		match &arena.get(*node)?.kind {
			NodeKind::Element { .. } | NodeKind::Document => {}
			NodeKind::Text(_) => return Err(DomError::NotAnElement(format!("{node:?}"))),
		}
		for child in std::mem::take(&mut arena.nodes[node.0].children) {
			arena.nodes[child.0].parent = None;
		}
		for fragment in &fragments {
			arena.build_fragment(*node, fragment);
		}
		Ok(())
	}

	fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
		self.arena
			.borrow()
			.nodes
			.get(node.0)
			.map(|n| n.children.clone())
			.unwrap_or_default()
	}

	fn parent(&self, node: &NodeId) -> Option<NodeId> {
		self.arena.borrow().nodes.get(node.0)?.parent
	}

	fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
		let mut arena = self.arena.borrow_mut();
		arena.check_insert(*parent, *child)?;
		arena.insert_at(*parent, *child, None);
		Ok(())
	}

	fn insert_before(
		&self,
		parent: &NodeId,
		child: &NodeId,
		reference: Option<&NodeId>,
	) -> Result<(), DomError> {
		let mut arena = self.arena.borrow_mut();
		arena.check_insert(*parent, *child)?;
		let Some(reference) = reference else {
			arena.insert_at(*parent, *child, None);
			return Ok(());
		};
		if reference == child {
			return Ok(());
		}
		if arena.nodes[parent.0].children.iter().all(|c| c != reference) {
			return Err(DomError::HierarchyRequest(format!(
				"{reference:?} is not a child of {parent:?}"
			)));
		}
		arena.detach(*child);
		let index = arena.nodes[parent.0]
			.children
			.iter()
			.position(|c| c == reference);
		arena.insert_at(*parent, *child, index);
		Ok(())
	}

	fn replace_child(&self, parent: &NodeId, new: &NodeId, old: &NodeId) -> Result<(), DomError> {
		if new == old {
			return Ok(());
		}
		self.insert_before(parent, new, Some(old))?;
		self.remove(old);
		Ok(())
	}

	fn remove(&self, node: &NodeId) {
		self.arena.borrow_mut().detach(*node);
	}

	fn is_connected(&self, node: &NodeId) -> bool {
		let arena = self.arena.borrow();
		arena.nodes.get(node.0).is_some() && arena.is_ancestor_or_self(arena.document, *node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_inner_html_roundtrip() {
		let dom = MemoryDom::with_body_html("<div id=\"app\"><p class=\"x\">Hi &amp; bye</p></div>");
		let app = dom.element_by_id("app").unwrap();
		assert_eq!(dom.inner_html(&app), "<p class=\"x\">Hi &amp; bye</p>");
		assert_eq!(dom.text_content(&app), "Hi & bye");
	}

	#[test]
	fn test_styles_serialize_as_attribute() {
		let dom = MemoryDom::new();
		let div = dom.create_element("div").unwrap();
		dom.set_style(&div, "opacity", "0");
		dom.set_style(&div, "position", "absolute");
		dom.append_child(&dom.body(), &div).unwrap();

		assert_eq!(
			dom.inner_html(&dom.body()),
			"<div style=\"opacity: 0; position: absolute;\"></div>"
		);
		dom.remove_style(&div, "opacity");
		assert_eq!(dom.style(&div, "opacity"), None);
		assert_eq!(dom.attribute(&div, "style").as_deref(), Some("position: absolute;"));
	}

	#[test]
	fn test_style_attribute_is_parsed() {
		let dom = MemoryDom::with_body_html("<div id=\"a\" style=\"color: red; top:0\"></div>");
		let a = dom.element_by_id("a").unwrap();
		assert_eq!(dom.style(&a, "color").as_deref(), Some("red"));
		assert_eq!(dom.style(&a, "top").as_deref(), Some("0"));
	}

	#[test]
	fn test_append_moves_node() {
		let dom = MemoryDom::with_body_html("<div id=\"a\"><span id=\"s\"></span></div><div id=\"b\"></div>");
		let (a, b, s) = (
			dom.element_by_id("a").unwrap(),
			dom.element_by_id("b").unwrap(),
			dom.element_by_id("s").unwrap(),
		);
		dom.append_child(&b, &s).unwrap();
		assert!(dom.child_nodes(&a).is_empty());
		assert_eq!(dom.child_nodes(&b), vec![s]);
		assert_eq!(dom.parent(&s), Some(b));
	}

	#[test]
	fn test_insert_before_and_replace() {
		let dom = MemoryDom::with_body_html("<p id=\"one\"></p><p id=\"three\"></p>");
		let body = dom.body();
		let three = dom.element_by_id("three").unwrap();
		let two = dom.create_element("p").unwrap();
		dom.set_attribute(&two, "id", "two").unwrap();
		dom.insert_before(&body, &two, Some(&three)).unwrap();
		assert_eq!(
			dom.inner_html(&body),
			"<p id=\"one\"></p><p id=\"two\"></p><p id=\"three\"></p>"
		);

		let four = dom.create_element("hr").unwrap();
		dom.replace_child(&body, &four, &three).unwrap();
		assert!(!dom.is_connected(&three));
		assert_eq!(
			dom.inner_html(&body),
			"<p id=\"one\"></p><p id=\"two\"></p><hr />"
		);
	}

	#[test]
	fn test_cycle_is_rejected() {
		let dom = MemoryDom::with_body_html("<div id=\"outer\"><div id=\"inner\"></div></div>");
		let outer = dom.element_by_id("outer").unwrap();
		let inner = dom.element_by_id("inner").unwrap();
		assert!(matches!(
			dom.append_child(&inner, &outer),
			Err(DomError::HierarchyRequest(_))
		));
	}

	#[test]
	fn test_invalid_tag_name() {
		let dom = MemoryDom::new();
		assert!(matches!(
			dom.create_element("1bad"),
			Err(DomError::CreateElement(_))
		));
	}

	#[test]
	fn test_detached_nodes_are_not_connected() {
		let dom = MemoryDom::new();
		let div = dom.create_element("div").unwrap();
		assert!(!dom.is_connected(&div));
		dom.append_child(&dom.body(), &div).unwrap();
		assert!(dom.is_connected(&div));
		dom.remove(&div);
		assert!(!dom.is_connected(&div));
	}

	#[test]
	fn test_traversal_helpers() {
		let dom = MemoryDom::with_body_html(
			"<div class=\"a b\"><user-card></user-card><span class=\"b\"></span></div>",
		);
		let body = dom.body();
		assert_eq!(dom.elements_by_class(&body, "b").len(), 2);
		assert_eq!(dom.elements_by_tag(&body, "span").len(), 1);
		let card = dom.elements_by_tag(&body, "user-card")[0];
		assert!(dom.is_custom_element(&card));
	}

	#[test]
	fn test_unwrap_node() {
		let dom = MemoryDom::with_body_html("<div id=\"wrap\"><p>a</p><p>b</p></div>");
		let wrap = dom.element_by_id("wrap").unwrap();
		dom.unwrap_node(&wrap).unwrap();
		assert_eq!(dom.inner_html(&dom.body()), "<p>a</p><p>b</p>");
	}
}
