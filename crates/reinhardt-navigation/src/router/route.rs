//! Route definitions and views.

use super::middleware::{Guard, guard_fn};
use super::params::Params;
use super::pattern::PathMatcher;
use crate::dom::{Fragment, IntoFragment};
use crate::error::NavigationError;
use crate::render::Content;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Function producing a route's content from its parameters.
pub type RenderFn = Rc<dyn Fn(&Params) -> LocalBoxFuture<'static, Result<Content, NavigationError>>>;

/// Hook run after a route rendered.
pub type AfterRenderFn = Rc<dyn Fn(&Params) -> Result<(), NavigationError>>;

/// Loader run before a component is instantiated, e.g. to register its
/// custom element definition.
pub type ComponentLoader = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<(), NavigationError>>>;

/// What a route displays.
#[derive(Clone)]
pub enum RouteView {
	/// Literal markup.
	Html(String),
	/// Content computed from the parameters, possibly asynchronously.
	Render(RenderFn),
	/// A custom element.
	Component(ComponentDescriptor),
}

impl fmt::Debug for RouteView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Html(html) => f.debug_tuple("Html").field(html).finish(),
			Self::Render(_) => f.write_str("Render(..)"),
			Self::Component(component) => f.debug_tuple("Component").field(component).finish(),
		}
	}
}

impl RouteView {
	/// Produces the content for `path`.
	pub(crate) async fn resolve(&self, params: &Params) -> Result<Content, NavigationError> {
		match self {
			Self::Html(html) => Ok(Content::Html(html.clone())),
			Self::Render(render) => render(params).await,
			Self::Component(component) => component.instantiate(params).await,
		}
	}
}

/// A custom element mounted as a route's view.
///
/// Route parameters become attributes of the element unless disabled, and
/// explicit props take precedence over parameters with the same name.
#[derive(Clone)]
pub struct ComponentDescriptor {
	tag: String,
	props: Vec<(String, String)>,
	params_as_attributes: bool,
	template: Option<Fragment>,
	loader: Option<ComponentLoader>,
}

impl fmt::Debug for ComponentDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentDescriptor")
			.field("tag", &self.tag)
			.field("props", &self.props)
			.field("params_as_attributes", &self.params_as_attributes)
			.field("has_template", &self.template.is_some())
			.field("has_loader", &self.loader.is_some())
			.finish()
	}
}

impl ComponentDescriptor {
	/// Creates a descriptor for the custom element `tag`.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			props: Vec::new(),
			params_as_attributes: true,
			template: None,
			loader: None,
		}
	}

	/// Adds a static attribute.
	pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.props.push((name.into(), value.into()));
		self
	}

	/// Sets whether route parameters become attributes.
	pub fn with_params_as_attributes(mut self, enabled: bool) -> Self {
		self.params_as_attributes = enabled;
		self
	}

	/// Sets light-DOM children of the element.
	pub fn with_template(mut self, template: impl IntoFragment) -> Self {
		self.template = Some(template.into_fragment());
		self
	}

	/// Runs `loader` before every instantiation.
	pub fn with_loader<F, Fut>(mut self, loader: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<(), NavigationError>> + 'static,
	{
		self.loader = Some(Rc::new(move || loader().boxed_local()));
		self
	}

	/// The element tag.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	fn validate_tag(&self) -> Result<(), NavigationError> {
		let valid = self
			.tag
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_lowercase())
			&& self.tag.contains('-')
			&& self
				.tag
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'));
		if valid {
			Ok(())
		} else {
			Err(NavigationError::Component {
				tag: self.tag.clone(),
				message: "custom element names must start with a lowercase letter and contain a hyphen"
					.to_string(),
			})
		}
	}

	/// Builds the element for a navigation.
	pub async fn instantiate(&self, params: &Params) -> Result<Content, NavigationError> {
		self.validate_tag()?;
		if let Some(loader) = &self.loader {
			loader().await.map_err(|err| NavigationError::Component {
				tag: self.tag.clone(),
				message: err.to_string(),
			})?;
		}
		let mut element = Fragment::element(self.tag.clone());
		if self.params_as_attributes {
			for (name, value) in params.iter() {
				element = element.attr(name.to_string(), value.to_string());
			}
		}
		for (name, value) in &self.props {
			element = element.attr(name.clone(), value.clone());
		}
		if let Some(template) = &self.template {
			element = element.child(template.clone());
		}
		Ok(Content::Fragment(element.into_fragment()))
	}
}

/// A route table entry.
#[derive(Clone)]
pub struct RouteDefinition {
	pub(crate) view: RouteView,
	pub(crate) before_enter: Option<Guard>,
	pub(crate) after_render: Option<AfterRenderFn>,
	pub(crate) layout: Option<String>,
}

impl fmt::Debug for RouteDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteDefinition")
			.field("view", &self.view)
			.field("has_before_enter", &self.before_enter.is_some())
			.field("has_after_render", &self.after_render.is_some())
			.field("layout", &self.layout)
			.finish()
	}
}

impl RouteDefinition {
	/// Creates a definition for `view`.
	pub fn new(view: RouteView) -> Self {
		Self {
			view,
			before_enter: None,
			after_render: None,
			layout: None,
		}
	}

	/// A route showing literal markup.
	pub fn html(html: impl Into<String>) -> Self {
		Self::new(RouteView::Html(html.into()))
	}

	/// A route whose content is computed synchronously.
	pub fn view<F, C>(f: F) -> Self
	where
		F: Fn(&Params) -> C + 'static,
		C: Into<Content>,
	{
		Self::new(RouteView::Render(Rc::new(move |params: &Params| {
			futures::future::ready(Ok(f(params).into())).boxed_local()
		})))
	}

	/// A route whose content is computed asynchronously.
	///
	/// The future must not borrow the parameters; clone what it needs.
	pub fn render<F, Fut>(f: F) -> Self
	where
		F: Fn(&Params) -> Fut + 'static,
		Fut: Future<Output = Result<Content, NavigationError>> + 'static,
	{
		Self::new(RouteView::Render(Rc::new(move |params: &Params| {
			f(params).boxed_local()
		})))
	}

	/// A route mounting a custom element.
	pub fn component(component: ComponentDescriptor) -> Self {
		Self::new(RouteView::Component(component))
	}

	/// Sets the guard run before entering the route.
	pub fn before_enter(mut self, guard: Guard) -> Self {
		self.before_enter = Some(guard);
		self
	}

	/// Sets a synchronous guard; `false` aborts the navigation.
	pub fn guard<F>(self, f: F) -> Self
	where
		F: Fn(&super::NavigationContext) -> bool + 'static,
	{
		self.before_enter(guard_fn(f))
	}

	/// Sets the hook run after the route rendered. Its errors are logged only.
	pub fn after_render(mut self, f: impl Fn(&Params) -> Result<(), NavigationError> + 'static) -> Self {
		self.after_render = Some(Rc::new(f));
		self
	}

	/// Wraps the route's content in the named layout.
	pub fn layout(mut self, name: impl Into<String>) -> Self {
		self.layout = Some(name.into());
		self
	}

	/// The view.
	pub fn route_view(&self) -> &RouteView {
		&self.view
	}

	/// The layout name.
	pub fn layout_name(&self) -> Option<&str> {
		self.layout.as_deref()
	}
}

/// A registered route.
#[derive(Clone)]
pub(crate) struct Route {
	pub(crate) matcher: PathMatcher,
	pub(crate) definition: RouteDefinition,
}

/// The route a navigation resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
	/// Normalized path that was navigated to.
	pub path: String,
	/// Pattern of the matched route.
	pub pattern: String,
	/// Captured parameters.
	pub params: Params,
	/// Layout name of the matched route.
	pub layout: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn params(pairs: &[(&str, &str)]) -> Params {
		pairs.iter().map(|(k, v)| (*k, *v)).collect()
	}

	#[rstest]
	#[case("user-card", true)]
	#[case("x-1.0_beta", true)]
	#[case("usercard", false)]
	#[case("User-Card", false)]
	#[case("-card", false)]
	#[case("", false)]
	fn test_component_tag_validation(#[case] tag: &str, #[case] valid: bool) {
		let result = futures::executor::block_on(ComponentDescriptor::new(tag).instantiate(&Params::new()));
		assert_eq!(result.is_ok(), valid, "{tag}");
	}

	#[test]
	fn test_component_params_and_props() {
		let component = ComponentDescriptor::new("user-profile")
			.with_prop("mode", "full")
			.with_prop("id", "override")
			.with_template(Fragment::element("span").child("loading"));
		let content =
			futures::executor::block_on(component.instantiate(&params(&[("id", "7"), ("tab", "a")])))
				.unwrap();
		assert_eq!(
			content.to_html(),
			"<user-profile id=\"override\" tab=\"a\" mode=\"full\"><span>loading</span></user-profile>"
		);
	}

	#[test]
	fn test_component_without_param_attributes() {
		let component = ComponentDescriptor::new("user-profile").with_params_as_attributes(false);
		let content =
			futures::executor::block_on(component.instantiate(&params(&[("id", "7")]))).unwrap();
		assert_eq!(content.to_html(), "<user-profile></user-profile>");
	}

	#[test]
	fn test_component_loader_failure() {
		let component = ComponentDescriptor::new("lazy-widget")
			.with_loader(|| async { Err(NavigationError::hook("chunk failed")) });
		let err = futures::executor::block_on(component.instantiate(&Params::new())).unwrap_err();
		assert!(matches!(err, NavigationError::Component { ref tag, .. } if tag == "lazy-widget"));
	}

	#[test]
	fn test_view_resolution() {
		let view = RouteDefinition::view(|p: &Params| format!("<h1>{}</h1>", p.get("id").unwrap_or("?")));
		let content =
			futures::executor::block_on(view.view.resolve(&params(&[("id", "3")]))).unwrap();
		assert_eq!(content, Content::Html("<h1>3</h1>".into()));
	}
}
