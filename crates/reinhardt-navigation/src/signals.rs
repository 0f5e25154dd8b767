//! Router lifecycle signals.
//!
//! Every signal is delivered twice: synchronously to the receivers of the
//! router's [`SignalBus`], then to the page through
//! [`BrowserEnvironment::dispatch_signal`](crate::env::BrowserEnvironment::dispatch_signal),
//! which on the web becomes a `CustomEvent` named after [`RouterSignal::name`].

use crate::router::ResolvedRoute;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Options a navigation was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigateOptions {
	/// Whether the path was pushed to session history.
	#[serde(rename = "pushHistory")]
	pub push_history: bool,
}

/// A router lifecycle event.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouterSignal {
	/// A route finished rendering.
	RouteChanged {
		/// Normalized path.
		path: String,
		/// The route that was rendered.
		route: ResolvedRoute,
	},
	/// A transition finished, whichever branch it took.
	TransitionComplete,
	/// A navigation passed the concurrency guard and is about to resolve.
	BeforeNavigate {
		/// Path of the current route, if any.
		#[serde(rename = "fromPath")]
		from_path: Option<String>,
		/// Normalized target path.
		#[serde(rename = "toPath")]
		to_path: String,
		/// Navigation options.
		options: NavigateOptions,
	},
	/// The 404 page was rendered.
	ErrorPageRendered {
		/// The requested path, as given to `navigate`.
		path: String,
	},
}

impl RouterSignal {
	/// Name of the DOM event carrying this signal.
	pub fn name(&self) -> &'static str {
		match self {
			Self::RouteChanged { .. } => "spa:route-changed",
			Self::TransitionComplete => "spa:transition-complete",
			Self::BeforeNavigate { .. } => "spa:before-navigate",
			Self::ErrorPageRendered { .. } => "spa:error-page-rendered",
		}
	}

	/// JSON payload, or `None` for payload-less signals.
	pub fn detail_json(&self) -> Option<String> {
		match self {
			Self::TransitionComplete => None,
			_ => serde_json::to_string(self).ok(),
		}
	}
}

/// Receiver function type.
pub type SignalReceiverFn = Rc<dyn Fn(&RouterSignal)>;

struct SignalReceiver {
	receiver: SignalReceiverFn,
	dispatch_uid: Option<String>,
}

/// Synchronous dispatcher for [`RouterSignal`]s.
#[derive(Clone, Default)]
pub struct SignalBus {
	receivers: Rc<RefCell<Vec<SignalReceiver>>>,
}

impl std::fmt::Debug for SignalBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SignalBus")
			.field("receivers", &self.receivers_count())
			.finish()
	}
}

impl SignalBus {
	/// Creates a bus with no receivers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Connects a receiver.
	///
	/// A receiver connected with a `dispatch_uid` replaces any earlier
	/// receiver with the same uid.
	pub fn connect<F>(&self, receiver: F, dispatch_uid: Option<&str>)
	where
		F: Fn(&RouterSignal) + 'static,
	{
		let mut receivers = self.receivers.borrow_mut();
		if let Some(uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_deref() != Some(uid));
		}
		receivers.push(SignalReceiver {
			receiver: Rc::new(receiver),
			dispatch_uid: dispatch_uid.map(str::to_string),
		});
	}

	/// Disconnects a receiver by `dispatch_uid`.
	/// If `dispatch_uid` is `None`, disconnects all receivers.
	pub fn disconnect(&self, dispatch_uid: Option<&str>) -> bool {
		let mut receivers = self.receivers.borrow_mut();
		let original_len = receivers.len();
		match dispatch_uid {
			Some(uid) => receivers.retain(|r| r.dispatch_uid.as_deref() != Some(uid)),
			None => receivers.clear(),
		}
		receivers.len() < original_len
	}

	/// Sends a signal to every receiver, in connection order.
	///
	/// Receivers connected while sending only see later signals.
	pub fn send(&self, signal: &RouterSignal) -> usize {
		let snapshot: Vec<SignalReceiverFn> = self
			.receivers
			.borrow()
			.iter()
			.map(|r| Rc::clone(&r.receiver))
			.collect();
		for receiver in &snapshot {
			receiver(signal);
		}
		snapshot.len()
	}

	/// Whether any receiver is connected.
	pub fn has_listeners(&self) -> bool {
		!self.receivers.borrow().is_empty()
	}

	/// Number of connected receivers.
	pub fn receivers_count(&self) -> usize {
		self.receivers.borrow().len()
	}
}

/// Records every signal sent on a bus.
#[derive(Clone, Default)]
pub struct SignalSpy {
	received: Rc<RefCell<Vec<RouterSignal>>>,
}

impl SignalSpy {
	/// Creates a spy and connects it to `bus`.
	pub fn attach(bus: &SignalBus) -> Self {
		let spy = Self::default();
		let received = Rc::clone(&spy.received);
		bus.connect(
			move |signal: &RouterSignal| received.borrow_mut().push(signal.clone()),
			None,
		);
		spy
	}

	/// Signals received so far.
	pub fn signals(&self) -> Vec<RouterSignal> {
		self.received.borrow().clone()
	}

	/// Names of the signals received so far.
	pub fn names(&self) -> Vec<&'static str> {
		self.received.borrow().iter().map(RouterSignal::name).collect()
	}

	/// How many signals with the given name were received.
	pub fn count(&self, name: &str) -> usize {
		self.received
			.borrow()
			.iter()
			.filter(|s| s.name() == name)
			.count()
	}

	/// Forgets everything received so far.
	pub fn reset(&self) {
		self.received.borrow_mut().clear();
	}
}
