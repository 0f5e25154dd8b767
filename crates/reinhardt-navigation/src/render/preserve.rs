//! Custom element preservation across renders.

use crate::dom::Dom;

/// Custom elements under `roots` that are not nested in another custom
/// element, in document order.
pub(crate) fn outermost_custom_elements<D: Dom>(dom: &D, roots: &[D::Node]) -> Vec<D::Node> {
	let mut found = Vec::new();
	let mut stack: Vec<D::Node> = roots.iter().rev().cloned().collect();
	while let Some(node) = stack.pop() {
		if dom.tag_name(&node).is_none() {
			continue;
		}
		if dom.is_custom_element(&node) {
			found.push(node);
		} else {
			stack.extend(dom.child_nodes(&node).into_iter().rev());
		}
	}
	found
}

fn key<D: Dom>(dom: &D, node: &D::Node) -> (Option<String>, Option<String>) {
	(dom.tag_name(node), dom.attribute(node, "id"))
}

/// Swaps placeholders in `container` for the already-mounted elements in
/// `mounted`.
///
/// A mounted element replaces the first placeholder, in document order,
/// with the same tag and `id` that no earlier element claimed. Returns the
/// adopted elements.
pub(crate) fn adopt<D: Dom>(
	dom: &D,
	mounted: &[D::Node],
	container: &D::Node,
) -> Result<Vec<D::Node>, crate::error::DomError> {
	let mut placeholders: Vec<Option<D::Node>> =
		outermost_custom_elements(dom, &dom.child_nodes(container))
			.into_iter()
			.map(Some)
			.collect();
	let mut adopted = Vec::new();
	for element in mounted {
		let wanted = key(dom, element);
		let slot = placeholders
			.iter_mut()
			.find(|slot| slot.as_ref().is_some_and(|p| key(dom, p) == wanted));
		let Some(placeholder) = slot.and_then(Option::take) else {
			continue;
		};
		let Some(parent) = dom.parent(&placeholder) else {
			continue;
		};
		dom.replace_child(&parent, element, &placeholder)?;
		adopted.push(element.clone());
	}
	Ok(adopted)
}
