//! Environment backed by the real browser window.

use super::{BrowserEnvironment, ClickEvent, ElementSnapshot, Modifiers, TimerCallback};
use crate::dom::{Dom, WebDom};
use crate::render::ScriptRequest;
use crate::signals::RouterSignal;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element, Event, MouseEvent, Window};

const LOG_TARGET: &str = "reinhardt::navigation";

/// The page the module runs in.
pub struct WebEnvironment {
	window: Window,
	dom: WebDom,
}

impl WebEnvironment {
	/// Binds to the global window, if running in a browser page.
	pub fn new() -> Option<Self> {
		let window = web_sys::window()?;
		let dom = WebDom::new(window.document()?);
		Some(Self { window, dom })
	}

	fn history(&self) -> Option<web_sys::History> {
		self.window.history().ok()
	}

	fn snapshot_path(&self, event: &Event) -> Vec<ElementSnapshot> {
		event
			.composed_path()
			.iter()
			.filter_map(|target| target.dyn_into::<Element>().ok())
			.map(|element| {
				let node: web_sys::Node = element.clone().into();
				ElementSnapshot::with_attributes(element.local_name(), self.dom.attributes(&node))
			})
			.collect()
	}
}

impl BrowserEnvironment for WebEnvironment {
	type Dom = WebDom;

	fn dom(&self) -> &WebDom {
		&self.dom
	}

	fn current_path(&self) -> String {
		self.window
			.location()
			.pathname()
			.unwrap_or_else(|_| "/".to_string())
	}

	fn base_url(&self) -> Option<String> {
		self.window.location().href().ok()
	}

	fn push_state(&self, path: &str) {
		let pushed = self
			.history()
			.map(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)));
		if !matches!(pushed, Some(Ok(()))) {
			tracing::warn!(target: LOG_TARGET, "history.pushState failed for '{path}'");
		}
	}

	fn back(&self) {
		if let Some(history) = self.history() {
			let _ = history.back();
		}
	}

	fn forward(&self) {
		if let Some(history) = self.history() {
			let _ = history.forward();
		}
	}

	fn is_document_loaded(&self) -> bool {
		self.dom.document().ready_state() != "loading"
	}

	fn set_timeout(&self, delay: Duration, callback: TimerCallback) {
		let callback = Closure::once_into_js(move || callback());
		let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		if self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
			.is_err()
		{
			tracing::warn!(target: LOG_TARGET, "setTimeout failed");
		}
	}

	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
		wasm_bindgen_futures::spawn_local(future);
	}

	fn on_dom_content_loaded(&self, handler: Rc<dyn Fn()>) {
		let closure = Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(_)>);
		let _ = self
			.dom
			.document()
			.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref());
		closure.forget();
	}

	fn on_popstate(&self, handler: Rc<dyn Fn()>) {
		let closure = Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(_)>);
		let _ = self
			.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
		closure.forget();
	}

	fn on_click_capture(&self, handler: Rc<dyn Fn(&mut ClickEvent)>) {
		let dom = self.dom.clone();
		let window = self.window.clone();
		let closure = Closure::wrap(Box::new(move |event: Event| {
			let env = WebEnvironment {
				window: window.clone(),
				dom: dom.clone(),
			};
			let mut click = ClickEvent::new(env.snapshot_path(&event));
			if event.default_prevented() {
				click = click.with_default_prevented();
			}
			if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
				click = click.with_button(mouse.button()).with_modifiers(Modifiers {
					ctrl: mouse.ctrl_key(),
					meta: mouse.meta_key(),
					shift: mouse.shift_key(),
					alt: mouse.alt_key(),
				});
			}
			handler(&mut click);
			if click.is_default_prevented() {
				event.prevent_default();
			}
		}) as Box<dyn FnMut(_)>);
		let _ = self.dom.document().add_event_listener_with_callback_and_bool(
			"click",
			closure.as_ref().unchecked_ref(),
			true,
		);
		closure.forget();
	}

	fn dispatch_signal(&self, signal: &RouterSignal) {
		let init = CustomEventInit::new();
		if let Some(detail) = signal
			.detail_json()
			.and_then(|json| js_sys::JSON::parse(&json).ok())
		{
			init.set_detail(&detail);
		}
		match CustomEvent::new_with_event_init_dict(signal.name(), &init) {
			Ok(event) => {
				let _ = self.window.dispatch_event(&event);
			}
			Err(err) => {
				tracing::warn!(target: LOG_TARGET, "Failed to dispatch {}: {err:?}", signal.name());
			}
		}
	}

	fn execute_script(&self, request: &ScriptRequest) {
		tracing::trace!(target: LOG_TARGET, kind = ?request.kind, "script inserted");
	}
}
