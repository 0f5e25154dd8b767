//! Router configuration.
//!
//! ```
//! use reinhardt_navigation::config::{RouterConfig, TransitionConfig};
//!
//! let config = RouterConfig::from_toml_str(
//!     r#"
//!     root_id = "main"
//!
//!     [transition]
//!     kind = "slide"
//!     direction = "up"
//!     duration_ms = 250
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.root_id, "main");
//! assert!(matches!(config.transition, TransitionConfig::Slide { duration_ms: 250, .. }));
//! ```

use crate::error::ConfigError;
use crate::render::ScriptPolicy;
use crate::transition::SlideDirection;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default fade duration in milliseconds.
pub const DEFAULT_FADE_MS: u64 = 300;

/// Default upper bound on chained redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Transition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionConfig {
	/// Replace content immediately.
	None,
	/// Fade through an overlay.
	Fade {
		/// Duration of each half, in milliseconds.
		#[serde(default = "default_fade_ms")]
		duration_ms: u64,
		/// Overlay color.
		#[serde(default = "default_fade_color")]
		color: String,
	},
	/// Slide old content out and new content in.
	Slide {
		/// Movement direction.
		#[serde(default)]
		direction: SlideDirection,
		/// Duration in milliseconds.
		#[serde(default = "default_fade_ms")]
		duration_ms: u64,
	},
}

fn default_fade_ms() -> u64 {
	DEFAULT_FADE_MS
}

fn default_fade_color() -> String {
	"#fff".to_string()
}

impl Default for TransitionConfig {
	fn default() -> Self {
		Self::Fade {
			duration_ms: DEFAULT_FADE_MS,
			color: default_fade_color(),
		}
	}
}

/// Settings of a [`Router`](crate::router::Router).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// `id` of the element content is rendered into.
	pub root_id: String,
	/// Transition used for every navigation.
	pub transition: TransitionConfig,
	/// Script execution policy for rendered content.
	pub scripts: ScriptPolicy,
	/// Absolute URL module scripts are resolved against. Defaults to the
	/// document location.
	pub base_url: Option<String>,
	/// Longest accepted chain of middleware or guard redirects.
	pub max_redirects: usize,
	/// Whether [`Router::mount`](crate::router::Router::mount) installs the
	/// click listener.
	pub intercept_links: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			root_id: "app".to_string(),
			transition: TransitionConfig::default(),
			scripts: ScriptPolicy::default(),
			base_url: None,
			max_redirects: DEFAULT_MAX_REDIRECTS,
			intercept_links: true,
		}
	}
}

impl RouterConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Sets the root element id.
	pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
		self.root_id = root_id.into();
		self
	}

	/// Sets the transition.
	pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
		self.transition = transition;
		self
	}

	/// Sets the script policy.
	pub fn with_scripts(mut self, scripts: ScriptPolicy) -> Self {
		self.scripts = scripts;
		self
	}

	/// Sets the base URL for module scripts.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	/// Sets the redirect limit.
	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;
		self
	}

	/// Enables or disables link interception.
	pub fn with_intercept_links(mut self, intercept_links: bool) -> Self {
		self.intercept_links = intercept_links;
		self
	}

	/// Checks values serde cannot check.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.root_id.trim().is_empty() {
			return Err(ConfigError::InvalidValue {
				key: "root_id",
				message: "must not be empty".to_string(),
			});
		}
		if let Some(base_url) = &self.base_url
			&& let Err(err) = Url::parse(base_url)
		{
			return Err(ConfigError::InvalidValue {
				key: "base_url",
				message: format!("'{base_url}' is not an absolute URL: {err}"),
			});
		}
		Ok(())
	}
}
