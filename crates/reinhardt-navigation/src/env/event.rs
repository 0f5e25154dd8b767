//! Click events as seen by the link interceptor.

/// An element on the dispatch path of an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSnapshot {
	tag: String,
	attributes: Vec<(String, String)>,
}

impl ElementSnapshot {
	/// Creates a snapshot of an element with no attributes.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into().to_ascii_lowercase(),
			attributes: Vec::new(),
		}
	}

	/// Creates a snapshot from an attribute list.
	pub fn with_attributes(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
		Self {
			attributes,
			..Self::new(tag)
		}
	}

	/// Adds an attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	/// Lowercase tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Reads an attribute.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}

	/// Whether the attribute is present, whatever its value.
	pub fn has_attr(&self, name: &str) -> bool {
		self.get_attr(name).is_some()
	}
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
	/// Control key.
	pub ctrl: bool,
	/// Meta (command) key.
	pub meta: bool,
	/// Shift key.
	pub shift: bool,
	/// Alt (option) key.
	pub alt: bool,
}

impl Modifiers {
	/// Whether any modifier is held.
	pub fn any(&self) -> bool {
		self.ctrl || self.meta || self.shift || self.alt
	}
}

/// A click event.
///
/// `path` is the composed dispatch path, innermost element first, so clicks
/// originating inside a shadow root still reach the enclosing anchor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickEvent {
	path: Vec<ElementSnapshot>,
	button: i16,
	modifiers: Modifiers,
	default_prevented: bool,
}

impl ClickEvent {
	/// Creates a primary-button click with the given dispatch path.
	pub fn new(path: Vec<ElementSnapshot>) -> Self {
		Self {
			path,
			..Self::default()
		}
	}

	/// Sets the mouse button (0 is primary).
	pub fn with_button(mut self, button: i16) -> Self {
		self.button = button;
		self
	}

	/// Sets the modifier keys.
	pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
		self.modifiers = modifiers;
		self
	}

	/// Marks the event as already handled by someone else.
	pub fn with_default_prevented(mut self) -> Self {
		self.default_prevented = true;
		self
	}

	/// The composed dispatch path.
	pub fn path(&self) -> &[ElementSnapshot] {
		&self.path
	}

	/// The mouse button.
	pub fn button(&self) -> i16 {
		self.button
	}

	/// The modifier keys.
	pub fn modifiers(&self) -> Modifiers {
		self.modifiers
	}

	/// Suppresses the browser's default action.
	pub fn prevent_default(&mut self) {
		self.default_prevented = true;
	}

	/// Whether the default action was suppressed.
	pub fn is_default_prevented(&self) -> bool {
		self.default_prevented
	}
}
