//! Deterministic in-memory environment.

use super::{BrowserEnvironment, ClickEvent, ElementSnapshot, TimerCallback};
use crate::dom::{Dom, MemoryDom, NodeId};
use crate::render::ScriptRequest;
use crate::signals::RouterSignal;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Timers keyed by due time, then by scheduling order.
#[derive(Default)]
struct VirtualClock {
	now: Duration,
	seq: u64,
	timers: BTreeMap<(Duration, u64), TimerCallback>,
}

impl VirtualClock {
	fn schedule(&mut self, delay: Duration, callback: TimerCallback) {
		let due = self.now + delay;
		self.seq += 1;
		self.timers.insert((due, self.seq), callback);
	}

	fn next_due(&self) -> Option<Duration> {
		self.timers.keys().next().map(|(due, _)| *due)
	}

	fn pop_next(&mut self) -> Option<TimerCallback> {
		let ((due, _), callback) = self.timers.pop_first()?;
		self.now = self.now.max(due);
		Some(callback)
	}
}

#[derive(Debug)]
struct SessionHistory {
	entries: Vec<String>,
	index: usize,
}

type Handlers<F> = Rc<RefCell<Vec<Rc<F>>>>;

/// A fake page: virtual clock, session history, local executor and a
/// [`MemoryDom`].
///
/// Nothing runs until the test drives it with [`run_until_stalled`],
/// [`advance`], [`settle`] or [`block_on`].
///
/// [`run_until_stalled`]: MemoryEnvironment::run_until_stalled
/// [`advance`]: MemoryEnvironment::advance
/// [`settle`]: MemoryEnvironment::settle
/// [`block_on`]: MemoryEnvironment::block_on
pub struct MemoryEnvironment {
	dom: MemoryDom,
	clock: RefCell<VirtualClock>,
	history: RefCell<SessionHistory>,
	pool: RefCell<LocalPool>,
	spawner: LocalSpawner,
	loaded: Cell<bool>,
	base_url: Option<String>,
	content_loaded: Handlers<dyn Fn()>,
	popstate: Handlers<dyn Fn()>,
	clicks: Handlers<dyn Fn(&mut ClickEvent)>,
	signals: RefCell<Vec<RouterSignal>>,
	scripts: RefCell<Vec<ScriptRequest>>,
}

impl Default for MemoryEnvironment {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryEnvironment {
	/// Creates a loaded page at `/` with a `<div id="app">` root.
	pub fn new() -> Self {
		let pool = LocalPool::new();
		let spawner = pool.spawner();
		Self {
			dom: MemoryDom::with_body_html("<div id=\"app\"></div>"),
			clock: RefCell::new(VirtualClock::default()),
			history: RefCell::new(SessionHistory {
				entries: vec!["/".to_string()],
				index: 0,
			}),
			pool: RefCell::new(pool),
			spawner,
			loaded: Cell::new(true),
			base_url: Some("http://localhost/".to_string()),
			content_loaded: Rc::default(),
			popstate: Rc::default(),
			clicks: Rc::default(),
			signals: RefCell::default(),
			scripts: RefCell::default(),
		}
	}

	/// Replaces the document body.
	pub fn with_body_html(mut self, html: &str) -> Self {
		self.dom = MemoryDom::with_body_html(html);
		self
	}

	/// Sets the initial location path.
	pub fn with_path(self, path: impl Into<String>) -> Self {
		self.history.borrow_mut().entries = vec![path.into()];
		self
	}

	/// Sets the document URL used to resolve relative URLs.
	pub fn with_base_url(mut self, url: Option<&str>) -> Self {
		self.base_url = url.map(str::to_string);
		self
	}

	/// Starts with `DOMContentLoaded` still pending.
	pub fn loading(self) -> Self {
		self.loaded.set(false);
		self
	}

	/// The in-memory document.
	pub fn memory_dom(&self) -> &MemoryDom {
		&self.dom
	}

	/// Current virtual time.
	pub fn now(&self) -> Duration {
		self.clock.borrow().now
	}

	/// Number of timers that have not fired yet.
	pub fn pending_timers(&self) -> usize {
		self.clock.borrow().timers.len()
	}

	/// Polls spawned tasks until none can make progress.
	pub fn run_until_stalled(&self) {
		self.pool.borrow_mut().run_until_stalled();
	}

	/// Fires the earliest pending timer, moving the clock to its due time.
	pub fn fire_next_timer(&self) -> bool {
		let callback = self.clock.borrow_mut().pop_next();
		match callback {
			Some(callback) => {
				callback();
				true
			}
			None => false,
		}
	}

	/// Moves the clock forward by `delta`, firing every timer due on the way.
	pub fn advance(&self, delta: Duration) {
		let target = self.now() + delta;
		loop {
			self.run_until_stalled();
			let due = self.clock.borrow().next_due();
			match due {
				Some(due) if due <= target => {
					self.fire_next_timer();
				}
				_ => break,
			}
		}
		let mut clock = self.clock.borrow_mut();
		clock.now = clock.now.max(target);
		drop(clock);
		self.run_until_stalled();
	}

	/// Runs tasks and fires timers until both queues are empty.
	pub fn settle(&self) {
		loop {
			self.run_until_stalled();
			if !self.fire_next_timer() {
				break;
			}
		}
	}

	/// Drives `future` to completion on the virtual clock.
	///
	/// Returns `None` when the future can never complete: no task can make
	/// progress and no timer is pending. Timers scheduled by the future that
	/// are still pending once it resolves are left in place.
	pub fn block_on<T: 'static>(&self, future: impl Future<Output = T> + 'static) -> Option<T> {
		let slot = Rc::new(RefCell::new(None));
		let task_slot = Rc::clone(&slot);
		self.spawn_local(Box::pin(async move {
			let value = future.await;
			*task_slot.borrow_mut() = Some(value);
		}));
		loop {
			self.run_until_stalled();
			if slot.borrow().is_some() || !self.fire_next_timer() {
				break;
			}
		}
		slot.borrow_mut().take()
	}

	/// Fires `DOMContentLoaded`.
	pub fn fire_dom_content_loaded(&self) {
		self.loaded.set(true);
		let handlers = self.content_loaded.borrow().clone();
		for handler in handlers {
			handler();
		}
	}

	/// Dispatches a click to the capture listeners and returns the event.
	pub fn dispatch_click(&self, mut event: ClickEvent) -> ClickEvent {
		let handlers = self.clicks.borrow().clone();
		for handler in handlers {
			handler(&mut event);
		}
		event
	}

	/// Clicks an element of the document, building the dispatch path from
	/// the element up to the body.
	pub fn click(&self, node: &NodeId) -> ClickEvent {
		let mut path = Vec::new();
		let mut current = Some(*node);
		while let Some(node) = current {
			if let Some(tag) = self.dom.tag_name(&node) {
				path.push(ElementSnapshot::with_attributes(
					tag,
					self.dom.attributes(&node),
				));
			}
			current = self.dom.parent(&node);
		}
		self.dispatch_click(ClickEvent::new(path))
	}

	/// History entries, oldest first.
	pub fn history_entries(&self) -> Vec<String> {
		self.history.borrow().entries.clone()
	}

	/// Index of the current history entry.
	pub fn history_index(&self) -> usize {
		self.history.borrow().index
	}

	/// Signals dispatched so far.
	pub fn signals(&self) -> Vec<RouterSignal> {
		self.signals.borrow().clone()
	}

	/// Names of the signals dispatched so far.
	pub fn signal_names(&self) -> Vec<&'static str> {
		self.signals.borrow().iter().map(RouterSignal::name).collect()
	}

	/// Scripts executed so far.
	pub fn executed_scripts(&self) -> Vec<ScriptRequest> {
		self.scripts.borrow().clone()
	}

	fn traverse(&self, delta: isize) {
		{
			let mut history = self.history.borrow_mut();
			let Some(index) = history.index.checked_add_signed(delta) else {
				return;
			};
			if index >= history.entries.len() {
				return;
			}
			history.index = index;
		}
		let handlers = Rc::clone(&self.popstate);
		self.set_timeout(
			Duration::ZERO,
			Box::new(move || {
				let handlers = handlers.borrow().clone();
				for handler in handlers {
					handler();
				}
			}),
		);
	}
}

impl BrowserEnvironment for MemoryEnvironment {
	type Dom = MemoryDom;

	fn dom(&self) -> &MemoryDom {
		&self.dom
	}

	fn current_path(&self) -> String {
		let history = self.history.borrow();
		history.entries[history.index].clone()
	}

	fn base_url(&self) -> Option<String> {
		self.base_url.clone()
	}

	fn push_state(&self, path: &str) {
		let mut history = self.history.borrow_mut();
		let next = history.index + 1;
		history.entries.truncate(next);
		history.entries.push(path.to_string());
		history.index = next;
	}

	fn back(&self) {
		self.traverse(-1);
	}

	fn forward(&self) {
		self.traverse(1);
	}

	fn is_document_loaded(&self) -> bool {
		self.loaded.get()
	}

	fn set_timeout(&self, delay: Duration, callback: TimerCallback) {
		self.clock.borrow_mut().schedule(delay, callback);
	}

	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
		if let Err(err) = self.spawner.spawn_local(future) {
			tracing::warn!(target: "reinhardt::navigation", "Failed to spawn task: {err}");
		}
	}

	fn on_dom_content_loaded(&self, handler: Rc<dyn Fn()>) {
		self.content_loaded.borrow_mut().push(handler);
	}

	fn on_popstate(&self, handler: Rc<dyn Fn()>) {
		self.popstate.borrow_mut().push(handler);
	}

	fn on_click_capture(&self, handler: Rc<dyn Fn(&mut ClickEvent)>) {
		self.clicks.borrow_mut().push(handler);
	}

	fn dispatch_signal(&self, signal: &RouterSignal) {
		self.signals.borrow_mut().push(signal.clone());
	}

	fn execute_script(&self, request: &ScriptRequest) {
		self.scripts.borrow_mut().push(request.clone());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::env::sleep;

	#[test]
	fn test_timers_fire_in_due_order() {
		let env = MemoryEnvironment::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
			let log = Rc::clone(&log);
			env.set_timeout(
				Duration::from_millis(delay),
				Box::new(move || log.borrow_mut().push(label)),
			);
		}
		env.advance(Duration::from_millis(15));
		assert_eq!(*log.borrow(), vec!["a", "a2"]);
		env.settle();
		assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
		assert_eq!(env.now(), Duration::from_millis(30));
	}

	#[test]
	fn test_block_on_drives_sleep() {
		let env = Rc::new(MemoryEnvironment::new());
		let task_env = Rc::clone(&env);
		let value = env.block_on(async move {
			sleep(task_env.as_ref(), Duration::from_millis(250)).await;
			7
		});
		assert_eq!(value, Some(7));
		assert_eq!(env.now(), Duration::from_millis(250));
	}

	#[test]
	fn test_block_on_detects_hung_future() {
		let env = MemoryEnvironment::new();
		assert_eq!(env.block_on(futures::future::pending::<()>()), None);
	}

	#[test]
	fn test_history_push_truncates_forward_entries() {
		let env = MemoryEnvironment::new();
		env.push_state("/a");
		env.push_state("/b");
		env.back();
		env.push_state("/c");
		assert_eq!(env.history_entries(), vec!["/", "/a", "/c"]);
		assert_eq!(env.current_path(), "/c");
	}

	#[test]
	fn test_back_fires_popstate_asynchronously() {
		let env = MemoryEnvironment::new();
		let fired = Rc::new(Cell::new(0));
		let counter = Rc::clone(&fired);
		env.on_popstate(Rc::new(move || counter.set(counter.get() + 1)));
		env.push_state("/a");
		env.back();
		assert_eq!(env.current_path(), "/");
		assert_eq!(fired.get(), 0);
		env.settle();
		assert_eq!(fired.get(), 1);

		// At the oldest entry: no traversal, no event.
		env.back();
		env.settle();
		assert_eq!(fired.get(), 1);
	}

	#[test]
	fn test_click_builds_path_from_target() {
		let env = MemoryEnvironment::new()
			.with_body_html("<nav><a href=\"/about\"><span id=\"label\">About</span></a></nav>");
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		env.on_click_capture(Rc::new(move |event: &mut ClickEvent| {
			sink.borrow_mut()
				.extend(event.path().iter().map(|el| el.tag().to_string()));
		}));
		let label = env.dom().element_by_id("label").unwrap();
		env.click(&label);
		assert_eq!(*seen.borrow(), vec!["span", "a", "nav", "body"]);
	}
}
