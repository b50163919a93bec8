use std::ops::Range;

use serde::Serialize;

/// A heading captured while rendering a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingRecord {
	/// Heading level, 1 to 6.
	pub level: u8,
	/// Fragment identifier used by the heading's anchor.
	pub anchor: String,
	/// Rendered heading content (inline HTML).
	pub text: String,
}

impl HeadingRecord {
	/// Build a record whose anchor is derived from `text`.
	pub fn new(level: u8, text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			level,
			anchor: anchor_id(&text),
			text,
		}
	}
}

/// Fold every character outside `[A-Za-z0-9_]` to `_` and lowercase the rest.
///
/// Distinct headings can fold to the same id; no disambiguation happens.
pub fn anchor_id(text: &str) -> String {
	text.chars()
		.map(|ch| {
			if ch.is_ascii_alphanumeric() || ch == '_' {
				ch.to_ascii_lowercase()
			} else {
				'_'
			}
		})
		.collect()
}

/// Build nested `<ul>` markup for the records whose level lies in `levels`.
///
/// The first record inside the window opens the outer list. After that each
/// record is compared with the previously emitted one: a deeper record opens
/// one nested list, a shallower record closes one list per level of
/// difference, an equal record is a sibling. At the end the lists opened
/// since the first record are closed, followed by the outer list.
///
/// Out-of-window records are dropped before any of this happens, and the
/// close count is a level difference rather than a count of opened lists.
/// When the first emitted record is deeper than a later one, or a jump skips
/// levels, the close tags outnumber the open tags.
pub fn build_section_index(records: &[HeadingRecord], levels: Range<u8>) -> String {
	let mut in_window = records
		.iter()
		.filter(|record| levels.contains(&record.level));

	let Some(first) = in_window.next() else {
		return String::new();
	};

	let mut lines = vec![open_list(first.level), list_item(first)];
	let mut previous = first.level;

	for record in in_window {
		if record.level > previous {
			lines.push(open_list(record.level));
		} else if record.level < previous {
			for _ in 0..previous - record.level {
				lines.push("</ul>".to_string());
			}
		}

		lines.push(list_item(record));
		previous = record.level;
	}

	if previous > first.level {
		for _ in 0..previous - first.level {
			lines.push("</ul>".to_string());
		}
	}

	lines.push("</ul>".to_string());
	lines.join("\n")
}

fn open_list(level: u8) -> String {
	format!("<ul class=\"nav-level-{level}\">")
}

fn list_item(record: &HeadingRecord) -> String {
	format!("<li><a href=\"#{}\">{}</a>", record.anchor, record.text)
}
