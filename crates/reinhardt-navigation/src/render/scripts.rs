//! Re-execution of scripts inserted through `innerHTML`.
//!
//! Scripts parsed by `innerHTML` never run. Each one is replaced by a
//! freshly created script element carrying the same attributes and source,
//! which the browser executes on insertion.

use crate::dom::Dom;
use crate::env::{BrowserEnvironment, NodeOf};
use crate::error::DomError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Which scripts found in rendered content are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPolicy {
	/// Inline and external scripts.
	#[default]
	Execute,
	/// Inline scripts only; scripts with `src` stay inert.
	InlineOnly,
	/// Nothing is executed.
	Disabled,
}

/// Classic or module script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptKind {
	/// `<script>` or `<script type="text/javascript">`.
	Classic,
	/// `<script type="module">`.
	Module,
}

/// A script handed to the page for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRequest {
	/// Script kind.
	pub kind: ScriptKind,
	/// Source URL. Absolute for module scripts.
	pub src: Option<String>,
	/// Inline source text.
	pub text: String,
}

fn script_kind(type_attr: Option<&str>) -> Option<ScriptKind> {
	let Some(value) = type_attr.map(str::trim) else {
		return Some(ScriptKind::Classic);
	};
	match value.to_ascii_lowercase().as_str() {
		"" | "text/javascript" | "application/javascript" | "text/ecmascript" => {
			Some(ScriptKind::Classic)
		}
		"module" => Some(ScriptKind::Module),
		_ => None,
	}
}

fn resolve_url(base: Option<&str>, src: &str) -> String {
	let resolved = base
		.ok_or(url::ParseError::RelativeUrlWithoutBase)
		.and_then(Url::parse)
		.and_then(|base| base.join(src));
	match resolved {
		Ok(url) => url.to_string(),
		Err(_) => match Url::parse(src) {
			Ok(url) => url.to_string(),
			Err(err) => {
				tracing::warn!(
					target: "reinhardt::navigation::render",
					"Cannot resolve module script URL '{src}': {err}"
				);
				src.to_string()
			}
		},
	}
}

fn is_within<D: Dom>(dom: &D, node: &D::Node, ancestors: &[D::Node], stop: &D::Node) -> bool {
	let mut current = dom.parent(node);
	while let Some(parent) = current {
		if ancestors.contains(&parent) {
			return true;
		}
		if &parent == stop {
			return false;
		}
		current = dom.parent(&parent);
	}
	false
}

/// Re-creates the scripts under `container`, skipping those inside
/// `preserved` elements. Returns how many were executed.
pub(crate) fn reexecute<E: BrowserEnvironment>(
	env: &E,
	policy: ScriptPolicy,
	base_url: Option<&str>,
	container: &NodeOf<E>,
	preserved: &[NodeOf<E>],
) -> Result<usize, DomError> {
	if policy == ScriptPolicy::Disabled {
		return Ok(0);
	}
	let dom = env.dom();
	let env_base = env.base_url();
	let base_url = base_url.or(env_base.as_deref());
	let mut executed = 0;

	for script in dom.elements_by_tag(container, "script") {
		if is_within(dom, &script, preserved, container) {
			continue;
		}
		let Some(kind) = script_kind(dom.attribute(&script, "type").as_deref()) else {
			continue;
		};
		let src = dom.attribute(&script, "src");
		if src.is_some() && policy == ScriptPolicy::InlineOnly {
			continue;
		}
		let Some(parent) = dom.parent(&script) else {
			continue;
		};

		let fresh = dom.create_element("script")?;
		for (name, value) in dom.attributes(&script) {
			dom.set_attribute(&fresh, &name, &value)?;
		}
		let src = match (kind, src) {
			(ScriptKind::Module, Some(src)) => {
				let absolute = resolve_url(base_url, &src);
				dom.set_attribute(&fresh, "src", &absolute)?;
				Some(absolute)
			}
			(_, src) => src,
		};
		let text = dom.text_content(&script);
		if !text.is_empty() {
			dom.set_text_content(&fresh, &text);
		}
		dom.replace_child(&parent, &fresh, &script)?;
		env.execute_script(&ScriptRequest { kind, src, text });
		executed += 1;
	}
	Ok(executed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, Some(ScriptKind::Classic))]
	#[case(Some(""), Some(ScriptKind::Classic))]
	#[case(Some("text/JavaScript"), Some(ScriptKind::Classic))]
	#[case(Some("module"), Some(ScriptKind::Module))]
	#[case(Some("application/json"), None)]
	#[case(Some("application/ld+json"), None)]
	#[case(Some("text/template"), None)]
	fn test_script_kind(#[case] type_attr: Option<&str>, #[case] expected: Option<ScriptKind>) {
		assert_eq!(script_kind(type_attr), expected);
	}

	#[rstest]
	#[case(Some("https://example.com/app/page"), "./main.js", "https://example.com/app/main.js")]
	#[case(Some("https://example.com/app/page"), "/static/m.js", "https://example.com/static/m.js")]
	#[case(Some("https://example.com/"), "https://cdn.example.net/x.js", "https://cdn.example.net/x.js")]
	#[case(None, "https://cdn.example.net/x.js", "https://cdn.example.net/x.js")]
	#[case(None, "./main.js", "./main.js")]
	fn test_resolve_url(#[case] base: Option<&str>, #[case] src: &str, #[case] expected: &str) {
		assert_eq!(resolve_url(base, src), expected);
	}
}
