//! Route pattern compilation and path normalization.
//!
//! A pattern is a `/`-delimited path in which whole segments may be
//! `:name` placeholders. Each placeholder matches one or more characters
//! other than `/`. A pattern without `:` matches only itself.

use super::params::Params;
use crate::error::PatternError;
use regex::Regex;

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
	pattern: String,
	regex: Regex,
	param_names: Vec<String>,
}

impl PathMatcher {
	/// Compiles a route pattern into a matcher.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_navigation::router::PathMatcher;
	///
	/// let matcher = PathMatcher::compile("/users/:id").unwrap();
	/// assert_eq!(matcher.param_names(), ["id"]);
	/// assert_eq!(matcher.extract("/users/42").unwrap().get("id"), Some("42"));
	/// assert!(matcher.extract("/users/42/edit").is_none());
	/// ```
	pub fn compile(pattern: &str) -> Result<Self, PatternError> {
		let mut param_names = Vec::new();
		let source = if pattern.contains(':') {
			let segments: Vec<String> = pattern
				.split('/')
				.map(|segment| match segment.strip_prefix(':') {
					Some(name) if !name.is_empty() => {
						param_names.push(name.to_string());
						"([^/]+)".to_string()
					}
					_ => regex::escape(segment),
				})
				.collect();
			format!("^{}$", segments.join("/"))
		} else {
			format!("^{}$", regex::escape(pattern))
		};
		let regex = Regex::new(&source).map_err(|e| PatternError::InvalidRegex {
			pattern: pattern.to_string(),
			message: e.to_string(),
		})?;
		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// The source pattern.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// The compiled expression.
	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Placeholder names, left to right.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Whether the pattern has no placeholders.
	pub fn is_static(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Matches `path` and captures its parameters.
	pub fn extract(&self, path: &str) -> Option<Params> {
		extract(path, &self.regex, &self.param_names)
	}

	/// Whether `path` matches.
	pub fn matches(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}
}

/// Runs `regex` against `path` and pairs the captures with `param_names`.
///
/// With duplicate names the last capture wins; the key keeps the position
/// of its first occurrence.
pub fn extract(path: &str, regex: &Regex, param_names: &[String]) -> Option<Params> {
	let captures = regex.captures(path)?;
	Some(
		param_names
			.iter()
			.enumerate()
			.filter_map(|(i, name)| {
				captures
					.get(i + 1)
					.map(|m| (name.clone(), m.as_str().to_string()))
			})
			.collect(),
	)
}

/// Normalizes a navigation path.
///
/// A missing or empty path becomes `/`, and trailing slashes are stripped
/// from every other path.
///
/// ```
/// use reinhardt_navigation::router::normalize_path;
///
/// assert_eq!(normalize_path(None), "/");
/// assert_eq!(normalize_path(Some("/about/")), "/about");
/// assert_eq!(normalize_path(Some("/")), "/");
/// ```
pub fn normalize_path(path: Option<&str>) -> String {
	let path = path.unwrap_or_default();
	if path.is_empty() {
		return "/".to_string();
	}
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() {
		"/".to_string()
	} else {
		trimmed.to_string()
	}
}

/// Strips the query string and fragment from a path.
pub fn strip_query(path: &str) -> &str {
	path.find(['?', '#']).map_or(path, |end| &path[..end])
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/users/:id", &["id"])]
	#[case("/users/:id/posts/:post_id", &["id", "post_id"])]
	#[case("/about", &[])]
	#[case("/", &[])]
	fn test_param_names(#[case] pattern: &str, #[case] expected: &[&str]) {
		let matcher = PathMatcher::compile(pattern).unwrap();
		assert_eq!(matcher.param_names(), expected);
		assert_eq!(matcher.is_static(), expected.is_empty());
	}

	#[rstest]
	#[case("/about", "/about", true)]
	#[case("/about", "/about/", false)]
	#[case("/about", "/aboutx", false)]
	#[case("/a.b", "/axb", false)]
	#[case("/files/(x)", "/files/(x)", true)]
	fn test_static_patterns_are_literal(
		#[case] pattern: &str,
		#[case] path: &str,
		#[case] matched: bool,
	) {
		let matcher = PathMatcher::compile(pattern).unwrap();
		assert_eq!(matcher.extract(path).is_some(), matched);
	}

	#[test]
	fn test_extract_multiple_params() {
		let matcher = PathMatcher::compile("/users/:id/posts/:post_id").unwrap();
		let params = matcher.extract("/users/7/posts/hello-world").unwrap();
		assert_eq!(
			params.iter().collect::<Vec<_>>(),
			vec![("id", "7"), ("post_id", "hello-world")]
		);
	}

	#[rstest]
	#[case("/users/1/2")]
	#[case("/users/")]
	#[case("/users")]
	fn test_params_span_exactly_one_segment(#[case] path: &str) {
		let matcher = PathMatcher::compile("/users/:id").unwrap();
		assert!(matcher.extract(path).is_none());
	}

	#[test]
	fn test_duplicate_param_names_last_wins() {
		let matcher = PathMatcher::compile("/:id/x/:id").unwrap();
		let params = matcher.extract("/first/x/second").unwrap();
		assert_eq!(params.len(), 1);
		assert_eq!(params.get("id"), Some("second"));
	}

	#[test]
	fn test_partial_colon_segments_are_literal() {
		let matcher = PathMatcher::compile("/time/10:30").unwrap();
		assert!(matcher.param_names().is_empty());
		assert!(matcher.extract("/time/10:30").is_some());
	}

	#[test]
	fn test_free_extract_function() {
		let matcher = PathMatcher::compile("/a/:x").unwrap();
		let params = extract("/a/1", matcher.regex(), matcher.param_names()).unwrap();
		assert_eq!(params.get("x"), Some("1"));
		assert!(extract("/b/1", matcher.regex(), matcher.param_names()).is_none());
	}

	#[rstest]
	#[case(None, "/")]
	#[case(Some(""), "/")]
	#[case(Some("/"), "/")]
	#[case(Some("//"), "/")]
	#[case(Some("/about/"), "/about")]
	#[case(Some("/about//"), "/about")]
	#[case(Some("/users/1"), "/users/1")]
	fn test_normalize_path(#[case] input: Option<&str>, #[case] expected: &str) {
		assert_eq!(normalize_path(input), expected);
	}

	#[rstest]
	#[case("/search?q=1", "/search")]
	#[case("/docs#intro", "/docs")]
	#[case("/plain", "/plain")]
	fn test_strip_query(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(strip_query(input), expected);
	}
}
