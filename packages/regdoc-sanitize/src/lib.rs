//! Cleaning boundary for rich text coming out of the document store.
//!
//! [`Sanitizer::sanitize`] re-serializes the DOM an HTML5 parser builds from the input and keeps
//! only the allow-listed tags and attributes, so markup that only turns hostile after re-parsing
//! is handled the same way a browser would see it. [`Sanitizer::strip_to_plain_text`] walks the
//! same kind of DOM and never runs anything while doing so.
//!
//! Neither operation can fail. Broken markup is repaired by the parser and degrades to whatever
//! text survives.

mod plain;

pub use plain::{preview, strip_to_plain_text};

use std::collections::HashSet;

use ammonia::{Builder, UrlRelative};

pub const ALLOWED_TAGS: [&str; 19] = [
	"p",
	"br",
	"strong",
	"em",
	"u",
	"s",
	"h1",
	"h2",
	"h3",
	"h4",
	"h5",
	"h6",
	"ul",
	"ol",
	"li",
	"a",
	"blockquote",
	"code",
	"pre",
];

/// Tags whose content is dropped along with the tag.
pub const DROPPED_CONTENT_TAGS: [&str; 14] = [
	"script", "style", "template", "iframe", "object", "embed", "noembed", "noframes", "noscript",
	"svg", "math", "title", "xmp", "select",
];

const URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

#[derive(Clone, Debug)]
pub struct Sanitizer {
	link_rel: Option<String>,
	preview_chars: usize,
}
impl Sanitizer {
	pub fn new(cfg: &regdoc_config::Sanitizer) -> Self {
		let link_rel = cfg.link_rel.as_deref().map(str::trim).filter(|rel| !rel.is_empty());

		Self { link_rel: link_rel.map(str::to_string), preview_chars: cfg.preview_chars as usize }
	}

	pub fn sanitize(&self, html: &str) -> String {
		if html.is_empty() {
			return String::new();
		}

		restore_pre_newlines(self.builder().clean(html).to_string())
	}

	pub fn strip_to_plain_text(&self, html: &str) -> String {
		plain::strip_to_plain_text(html)
	}

	pub fn preview(&self, html: &str) -> String {
		plain::preview(html, self.preview_chars)
	}

	fn builder(&self) -> Builder<'_> {
		let mut builder = Builder::empty();
		let mut link_attributes: HashSet<&str> = ["href", "target"].into_iter().collect();

		// The builder owns `rel` whenever it is asked to force a value onto it.
		if self.link_rel.is_none() {
			link_attributes.insert("rel");
		}

		builder
			.tags(ALLOWED_TAGS.into_iter().collect())
			.clean_content_tags(DROPPED_CONTENT_TAGS.into_iter().collect())
			.generic_attributes(["class"].into_iter().collect())
			.tag_attributes([("a", link_attributes)].into_iter().collect())
			.url_schemes(URL_SCHEMES.into_iter().collect())
			.url_relative(UrlRelative::PassThrough)
			.link_rel(self.link_rel.as_deref())
			.strip_comments(true);

		builder
	}
}
impl Default for Sanitizer {
	fn default() -> Self {
		Self::new(&regdoc_config::Sanitizer::default())
	}
}

/// [`Sanitizer::sanitize`] with the default configuration.
pub fn sanitize(html: &str) -> String {
	Sanitizer::default().sanitize(html)
}

/// The parser drops one newline right after a `<pre>` start tag and the serializer does not put
/// it back, so a body that opens with a blank line would lose a line on every pass.
fn restore_pre_newlines(html: String) -> String {
	if !html.contains("<pre") {
		return html;
	}

	let mut out = String::with_capacity(html.len() + 8);
	let mut rest = html.as_str();

	while let Some(open) = rest.find('<') {
		let tag_end = open + tag_len(&rest[open..]);
		let (head, tail) = rest.split_at(tag_end);

		out.push_str(head);

		if is_pre_start_tag(&rest[open..tag_end]) && tail.starts_with('\n') {
			out.push('\n');
		}

		rest = tail;
	}

	out.push_str(rest);

	out
}

/// Length of the tag at the start of `tag`, up to and including its `>`. Quoted attribute values
/// are skipped.
fn tag_len(tag: &str) -> usize {
	let mut quote = None;

	for (idx, ch) in tag.char_indices() {
		match quote {
			Some(open) if ch == open => quote = None,
			Some(_) => {},
			None if ch == '"' || ch == '\'' => quote = Some(ch),
			None if ch == '>' => return idx + 1,
			None => {},
		}
	}

	tag.len()
}

fn is_pre_start_tag(tag: &str) -> bool {
	tag.strip_prefix("<pre")
		.is_some_and(|rest| rest.starts_with(|ch: char| ch == '>' || ch.is_ascii_whitespace()))
}
