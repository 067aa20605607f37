use scraper::Html;
use unicode_segmentation::UnicodeSegmentation;

use crate::DROPPED_CONTENT_TAGS;

const ELLIPSIS: &str = "…";

/// Concatenates every text node in document order. Text inside script-like containers is not
/// text.
pub fn strip_to_plain_text(html: &str) -> String {
	if html.is_empty() {
		return String::new();
	}

	let fragment = Html::parse_fragment(html);
	let mut out = String::with_capacity(html.len());

	for node in fragment.tree.root().descendants() {
		let Some(text) = node.value().as_text() else { continue };
		let hidden = node.ancestors().any(|ancestor| {
			ancestor
				.value()
				.as_element()
				.is_some_and(|element| DROPPED_CONTENT_TAGS.contains(&element.name()))
		});

		if hidden {
			continue;
		}

		out.push_str(text);
	}

	out
}

/// Plain text with whitespace collapsed, cut to at most `max_chars` graphemes.
pub fn preview(html: &str, max_chars: usize) -> String {
	if max_chars == 0 {
		return String::new();
	}

	let text = strip_to_plain_text(html);
	let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
	let graphemes: Vec<&str> = collapsed.graphemes(true).collect();

	if graphemes.len() <= max_chars {
		return collapsed;
	}

	let mut out = graphemes[..max_chars - 1].concat();
	let trimmed_len = out.trim_end().len();

	out.truncate(trimmed_len);
	out.push_str(ELLIPSIS);

	out
}
