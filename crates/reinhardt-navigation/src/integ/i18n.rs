use crate::dom::Dom;

/// Localization applied after every transition.
///
/// The router calls both methods from its `TransitionComplete` hook, with
/// the router root as the container.
pub trait Localizer<D: Dom>: 'static {
	/// Translates the text inside `container`.
	fn translate_container(&self, dom: &D, container: &D::Node);

	/// Applies the document direction for right-to-left locales.
	fn apply_rtl_to_document(&self, dom: &D);
}
