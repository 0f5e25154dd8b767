//! Error types for the navigation engine.
//!
//! Only render-time failures are errors. A path without a matching route, a
//! guard rejection or a dropped navigation are reported through
//! [`NavigationOutcome`](crate::router::NavigationOutcome) instead.

/// Errors raised by a [`Dom`](crate::dom::Dom) backend.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// The element could not be created (invalid tag name).
	#[error("Failed to create element <{0}>")]
	CreateElement(String),

	/// The node handle does not refer to a live node.
	#[error("Unknown node: {0}")]
	UnknownNode(String),

	/// The mutation would produce an invalid tree.
	#[error("Hierarchy request error: {0}")]
	HierarchyRequest(String),

	/// The operation requires an element but received another node kind.
	#[error("Not an element: {0}")]
	NotAnElement(String),

	/// A JavaScript exception surfaced by the browser backend.
	#[error("JavaScript error: {0}")]
	Js(String),
}

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
	/// The generated regular expression was rejected.
	#[error("Invalid route pattern '{pattern}': {message}")]
	InvalidRegex {
		/// The offending pattern.
		pattern: String,
		/// The regex engine message.
		message: String,
	},
}

/// Errors raised by typed parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
	/// The parameter is not present in the matched route.
	#[error("Missing path parameter '{0}'")]
	Missing(String),

	/// The parameter count does not match the requested tuple arity.
	#[error("Parameter count mismatch: expected {expected}, got {actual}")]
	CountMismatch {
		/// Number of parameters requested.
		expected: usize,
		/// Number of parameters captured.
		actual: usize,
	},

	/// The raw value could not be parsed into the requested type.
	#[error("Failed to parse parameter '{name}' ('{raw_value}') as {param_type}: {message}")]
	Parse {
		/// Parameter name.
		name: String,
		/// Target type name.
		param_type: &'static str,
		/// Raw captured value.
		raw_value: String,
		/// Parse error message.
		message: String,
	},
}

/// Render-time failure of a single navigation attempt.
///
/// The router catches these at the top of `navigate`, logs them and replaces
/// the root content with an inline error message. They never poison the
/// router itself.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
	/// A view function failed to produce content.
	#[error("View failed for '{path}': {message}")]
	View {
		/// The route path being rendered.
		path: String,
		/// Failure description.
		message: String,
	},

	/// A component descriptor could not be instantiated.
	#[error("Invalid component '{tag}': {message}")]
	Component {
		/// Custom element tag.
		tag: String,
		/// Failure description.
		message: String,
	},

	/// A transition failed.
	#[error("Transition '{name}' failed: {message}")]
	Transition {
		/// Transition name.
		name: &'static str,
		/// Failure description.
		message: String,
	},

	/// A DOM mutation failed.
	#[error(transparent)]
	Dom(#[from] DomError),

	/// A route pattern could not be compiled.
	#[error(transparent)]
	Pattern(#[from] PatternError),

	/// A typed parameter could not be extracted.
	#[error(transparent)]
	Param(#[from] ParamError),

	/// A user hook reported a failure.
	#[error("Hook failed: {0}")]
	Hook(String),

	/// A redirect chain exceeded the configured limit.
	#[error("Too many redirects (limit {limit}) while navigating to '{path}'")]
	TooManyRedirects {
		/// The configured limit.
		limit: usize,
		/// The last requested path.
		path: String,
	},
}

impl NavigationError {
	/// Convenience constructor for view failures.
	pub fn view(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self::View {
			path: path.into(),
			message: message.into(),
		}
	}

	/// Convenience constructor for hook failures.
	pub fn hook(message: impl Into<String>) -> Self {
		Self::Hook(message.into())
	}
}

/// Errors raised while loading or validating a [`RouterConfig`](crate::config::RouterConfig).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value is present but invalid.
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue {
		/// Offending key.
		key: &'static str,
		/// Description of the problem.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_navigation_error_display() {
		assert_eq!(
			NavigationError::view("/users/1", "boom").to_string(),
			"View failed for '/users/1': boom"
		);
		assert_eq!(
			NavigationError::TooManyRedirects {
				limit: 3,
				path: "/loop".to_string()
			}
			.to_string(),
			"Too many redirects (limit 3) while navigating to '/loop'"
		);
	}

	#[test]
	fn test_dom_error_is_transparent() {
		let err: NavigationError = DomError::UnknownNode("#42".to_string()).into();
		assert_eq!(err.to_string(), "Unknown node: #42");
	}
}
