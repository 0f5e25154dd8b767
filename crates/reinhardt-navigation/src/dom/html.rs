//! Minimal HTML fragment parser and escaping helpers.
//!
//! This backs [`MemoryDom::set_inner_html`](super::MemoryDom). It is a
//! forgiving fragment parser, not a spec-complete tree builder: comments
//! and doctypes are dropped, unknown end tags are ignored, and open elements
//! are closed at end of input.

use super::fragment::{ElementNode, Fragment};
use std::borrow::Cow;

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Whether `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Whether the element's text content is raw (not entity-encoded).
pub fn is_raw_text_element(tag: &str) -> bool {
	matches!(tag, "script" | "style")
}

/// Escapes HTML special characters.
pub fn escape_html(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Decodes the common named and numeric character references.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
	if !s.contains('&') {
		return Cow::Borrowed(s);
	}
	let mut out = String::with_capacity(s.len());
	let mut rest = s;
	while let Some(pos) = rest.find('&') {
		out.push_str(&rest[..pos]);
		rest = &rest[pos..];
		let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
			let entity = &rest[1..end];
			let ch = match entity {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" => Some('\''),
				"nbsp" => Some('\u{a0}'),
				_ => entity
					.strip_prefix("#x")
					.or_else(|| entity.strip_prefix("#X"))
					.and_then(|hex| u32::from_str_radix(hex, 16).ok())
					.or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
					.and_then(char::from_u32),
			};
			ch.map(|c| (c, end))
		});
		match decoded {
			Some((c, end)) => {
				out.push(c);
				rest = &rest[end + 1..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	Cow::Owned(out)
}

/// Parses an HTML fragment into a list of top-level nodes.
pub fn parse_fragment(html: &str) -> Vec<Fragment> {
	Parser::new(html).parse()
}

struct OpenElement {
	element: ElementNode,
	children: Vec<Fragment>,
}

struct Parser<'a> {
	input: &'a str,
	pos: usize,
	stack: Vec<OpenElement>,
	top: Vec<Fragment>,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self {
			input,
			pos: 0,
			stack: Vec::new(),
			top: Vec::new(),
		}
	}

	fn rest(&self) -> &'a str {
		&self.input[self.pos..]
	}

	fn parse(mut self) -> Vec<Fragment> {
		while self.pos < self.input.len() {
			let rest = self.rest();
			if let Some(after) = rest.strip_prefix("<!--") {
				let skip = after.find("-->").map_or(rest.len(), |end| end + 4 + 3);
				self.pos += skip;
			} else if rest.starts_with("<!") || rest.starts_with("<?") {
				let skip = rest.find('>').map_or(rest.len(), |end| end + 1);
				self.pos += skip;
			} else if rest.starts_with("</") {
				self.parse_end_tag();
			} else if rest.starts_with('<')
				&& rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
			{
				self.parse_start_tag();
			} else {
				let first = rest.chars().next().map_or(0, char::len_utf8);
				let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
				let text = decode_entities(&rest[..end]).into_owned();
				self.pos += end;
				self.push_node(Fragment::Text(Cow::Owned(text)));
			}
		}
		while !self.stack.is_empty() {
			self.close_top();
		}
		self.top
	}

	fn push_node(&mut self, node: Fragment) {
		match self.stack.last_mut() {
			Some(open) => open.children.push(node),
			None => self.top.push(node),
		}
	}

	fn close_top(&mut self) {
		if let Some(open) = self.stack.pop() {
			let element = open.element.children(open.children);
			self.push_node(Fragment::Element(element));
		}
	}

	fn parse_end_tag(&mut self) {
		let rest = self.rest();
		let (end, name_end) = match rest.find('>') {
			Some(i) => (i + 1, i),
			None => (rest.len(), rest.len()),
		};
		let name = rest[2..name_end].trim().to_ascii_lowercase();
		self.pos += end;
		if let Some(index) = self
			.stack
			.iter()
			.rposition(|open| open.element.tag_name() == name)
		{
			while self.stack.len() > index {
				self.close_top();
			}
		}
	}

	fn parse_start_tag(&mut self) {
		let bytes = self.input.as_bytes();
		let mut i = self.pos + 1;
		let name_start = i;
		while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/'
		{
			i += 1;
		}
		let tag = self.input[name_start..i].to_ascii_lowercase();
		let mut element = ElementNode::new(tag.clone());
		let mut self_closing = false;

		loop {
			while i < bytes.len() && bytes[i].is_ascii_whitespace() {
				i += 1;
			}
			if i >= bytes.len() {
				break;
			}
			match bytes[i] {
				b'>' => {
					i += 1;
					break;
				}
				b'/' => {
					self_closing = true;
					i += 1;
					continue;
				}
				_ => {}
			}
			let attr_start = i;
			while i < bytes.len()
				&& !bytes[i].is_ascii_whitespace()
				&& !matches!(bytes[i], b'=' | b'>' | b'/')
			{
				i += 1;
			}
			let attr_name = self.input[attr_start..i].to_ascii_lowercase();
			while i < bytes.len() && bytes[i].is_ascii_whitespace() {
				i += 1;
			}
			let mut value = String::new();
			if i < bytes.len() && bytes[i] == b'=' {
				i += 1;
				while i < bytes.len() && bytes[i].is_ascii_whitespace() {
					i += 1;
				}
				if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
					let quote = bytes[i];
					i += 1;
					let value_start = i;
					while i < bytes.len() && bytes[i] != quote {
						i += 1;
					}
					value = decode_entities(&self.input[value_start..i]).into_owned();
					i = (i + 1).min(bytes.len());
				} else {
					let value_start = i;
					while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
						i += 1;
					}
					value = decode_entities(&self.input[value_start..i]).into_owned();
				}
			}
			if !attr_name.is_empty() {
				element = element.attr(attr_name, value);
			}
		}
		self.pos = i;

		if is_void_element(&tag) || self_closing {
			self.push_node(Fragment::Element(element));
			return;
		}

		if is_raw_text_element(&tag) {
			let rest = self.rest();
			let close = format!("</{tag}");
			let end = find_ascii_case_insensitive(rest, &close).unwrap_or(rest.len());
			let text = &rest[..end];
			if !text.is_empty() {
				element = element.child(Fragment::Text(Cow::Owned(text.to_string())));
			}
			self.pos += end;
			let rest = self.rest();
			self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
			self.push_node(Fragment::Element(element));
			return;
		}

		self.stack.push(OpenElement {
			element,
			children: Vec::new(),
		});
	}
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
	let hay = haystack.as_bytes();
	let needle = needle.as_bytes();
	if needle.len() > hay.len() {
		return None;
	}
	(0..=hay.len() - needle.len()).find(|&start| hay[start..start + needle.len()].eq_ignore_ascii_case(needle))
}
