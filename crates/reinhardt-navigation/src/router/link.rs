//! Deciding which clicks become in-app navigations.

use crate::env::{ClickEvent, ElementSnapshot};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static FILE_EXTENSION: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\.\w+$").expect("FILE_EXTENSION: invalid regex pattern"));

/// Returns the first `<a>` on the event's dispatch path.
pub fn find_anchor(event: &ClickEvent) -> Option<&ElementSnapshot> {
	event.path().iter().find(|element| element.tag() == "a")
}

/// Whether clicking `anchor` should be handled by the router.
///
/// Every rule must pass:
///
/// 1. the `href` is present and non-empty
/// 2. it is not absolute (`http...` or `//...`)
/// 3. there is no `target` attribute
/// 4. there is no `download` attribute
/// 5. it is not an in-page anchor (`#...`)
/// 6. it does not end in a file extension
///
/// The extension rule looks at the whole `href`, so `/users/john.doe` is
/// left to the browser as well.
pub fn should_intercept(anchor: &ElementSnapshot) -> bool {
	let Some(href) = anchor.get_attr("href").filter(|href| !href.is_empty()) else {
		return false;
	};
	!(href.starts_with("http")
		|| href.starts_with("//")
		|| anchor.has_attr("target")
		|| anchor.has_attr("download")
		|| href.starts_with('#')
		|| FILE_EXTENSION.is_match(href))
}

/// The `href` to navigate to, if the router should take over this click.
///
/// On top of [`should_intercept`], clicks that were already handled, that
/// use a non-primary button or a modifier key, and links with a non-web
/// scheme (`mailto:`, `tel:`, ...) are left alone.
pub fn intercepted_href(event: &ClickEvent) -> Option<String> {
	if event.is_default_prevented() || event.button() != 0 || event.modifiers().any() {
		return None;
	}
	let anchor = find_anchor(event)?;
	if !should_intercept(anchor) {
		return None;
	}
	let href = anchor.get_attr("href")?;
	if has_scheme(href) {
		return None;
	}
	Some(href.to_string())
}

/// Resolves an intercepted `href` against the current path.
///
/// Root-relative hrefs pass through. Relative ones resolve the way the
/// browser would: `about` on `/docs/intro` becomes `/docs/about`.
pub fn resolve_href(href: &str, current_path: &str) -> String {
	if href.starts_with('/') {
		return href.to_string();
	}
	let resolved = Url::parse("http://localhost")
		.and_then(|origin| origin.join(current_path))
		.and_then(|base| base.join(href));
	let Ok(resolved) = resolved else {
		return format!("/{href}");
	};
	let mut path = resolved.path().to_string();
	if let Some(query) = resolved.query() {
		path.push('?');
		path.push_str(query);
	}
	if let Some(fragment) = resolved.fragment() {
		path.push('#');
		path.push_str(fragment);
	}
	path
}

fn has_scheme(href: &str) -> bool {
	let Some((scheme, _)) = href.split_once(':') else {
		return false;
	};
	let mut chars = scheme.chars();
	chars.next().is_some_and(|c| c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
