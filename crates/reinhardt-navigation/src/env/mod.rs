//! Browser capabilities injected into the router.
//!
//! The router never reaches for `window` or `document` directly. History,
//! timers, listeners and signal delivery all go through
//! [`BrowserEnvironment`], so tests can substitute [`MemoryEnvironment`].

mod event;
mod memory;
mod scheduler;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod web;

pub use event::{ClickEvent, ElementSnapshot, Modifiers};
pub use memory::MemoryEnvironment;
pub use scheduler::{FRAME, Sleep, next_frame, sleep};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use web::WebEnvironment;

use crate::dom::Dom;
use crate::render::ScriptRequest;
use crate::signals::RouterSignal;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// Node handle type of an environment's document.
pub type NodeOf<E> = <<E as BrowserEnvironment>::Dom as Dom>::Node;

/// Callback invoked once by a timer.
pub type TimerCallback = Box<dyn FnOnce()>;

/// The document, session history, event loop and listeners of a page.
pub trait BrowserEnvironment: 'static {
	/// Document backend.
	type Dom: Dom;

	/// The document.
	fn dom(&self) -> &Self::Dom;

	/// Path component of the current location.
	fn current_path(&self) -> String;

	/// Absolute URL of the current document, used to resolve relative URLs.
	fn base_url(&self) -> Option<String>;

	/// Pushes a new session history entry.
	fn push_state(&self, path: &str);

	/// Goes back one history entry. `popstate` follows asynchronously.
	fn back(&self);

	/// Goes forward one history entry. `popstate` follows asynchronously.
	fn forward(&self);

	/// Whether `DOMContentLoaded` already fired.
	fn is_document_loaded(&self) -> bool;

	/// Schedules `callback` after `delay`.
	fn set_timeout(&self, delay: Duration, callback: TimerCallback);

	/// Runs a future on the page's event loop.
	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);

	/// Registers a `DOMContentLoaded` listener.
	fn on_dom_content_loaded(&self, handler: Rc<dyn Fn()>);

	/// Registers a `popstate` listener.
	fn on_popstate(&self, handler: Rc<dyn Fn()>);

	/// Registers a document-level, capture-phase click listener.
	fn on_click_capture(&self, handler: Rc<dyn Fn(&mut ClickEvent)>);

	/// Publishes a router signal to the page.
	fn dispatch_signal(&self, signal: &RouterSignal);

	/// Called after a fresh script node was inserted into the document.
	///
	/// Browsers execute inserted scripts by themselves, so real environments
	/// may ignore this.
	fn execute_script(&self, request: &ScriptRequest);
}
