//! Reinhardt Navigation - Client-side SPA Navigation Engine
//!
//! Takes over same-origin link clicks and history traversal, resolves the
//! path against a table of route patterns and swaps the page content
//! through an optional animated transition, without a full page reload.
//!
//! ## Architecture
//!
//! - [`router`]: Path matching, link interception, middleware and the
//!   [`Router`] state machine
//! - [`transition`]: `none`, `fade`, `slide` and custom content swaps
//! - [`render`]: Off-screen rendering with custom-element preservation and
//!   script re-execution
//! - [`env`]: Browser capabilities, with a deterministic
//!   [`MemoryEnvironment`] for tests and `WebEnvironment` on wasm32
//! - [`dom`]: The document abstraction both environments build on
//! - [`signals`]: Lifecycle signals (`spa:route-changed` and friends)
//! - [`config`]: Serde/TOML configuration
//! - [`integ`]: Localization and layout hooks
//!
//! ## Example
//!
//! ```
//! use reinhardt_navigation::config::TransitionConfig;
//! use reinhardt_navigation::dom::Dom;
//! use reinhardt_navigation::{BrowserEnvironment, MemoryEnvironment, RouteDefinition, Router, RouterConfig};
//! use std::rc::Rc;
//!
//! let env = Rc::new(MemoryEnvironment::new().with_path("/users/42"));
//! let router = Router::new(
//!     Rc::clone(&env),
//!     RouterConfig::default().with_transition(TransitionConfig::None),
//! );
//! router
//!     .add_route(
//!         "/users/:id",
//!         RouteDefinition::view(|params| format!("<h1>User {}</h1>", params.get("id").unwrap_or("?"))),
//!     )
//!     .unwrap();
//! router.mount();
//! env.settle();
//!
//! assert_eq!(router.current_route().unwrap().params.get("id"), Some("42"));
//! let root = env.dom().element_by_id("app").unwrap();
//! assert_eq!(env.dom().text_content(&root), "User 42");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dom;
pub mod env;
pub mod error;
pub mod integ;
pub mod render;
pub mod router;
pub mod signals;
pub mod transition;

pub use config::{RouterConfig, TransitionConfig};
pub use env::{BrowserEnvironment, MemoryEnvironment};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use env::WebEnvironment;
pub use error::{ConfigError, DomError, NavigationError, ParamError, PatternError};
pub use render::{Content, ContentRenderer, ScriptPolicy};
pub use router::{
	ComponentDescriptor, NavigationContext, NavigationDecision, NavigationOutcome, Params,
	PathMatcher, ResolvedRoute, RouteDefinition, Router, RouterState,
};
pub use signals::{RouterSignal, SignalBus};
pub use transition::{Transition, TransitionContext};
