use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

use crate::SiteError;
use crate::SiteResult;

/// Default depth of the section index when a page doesn't set
/// `refs_deep_max`.
pub const DEFAULT_REFS_DEEP_MAX: u8 = 3;

/// Page parameters declared at the top of a markdown file as link reference
/// definitions:
///
/// ```markdown
/// [title]: <> "Parsing HTML"
/// [theme]: api.html
/// [refs_deep_max]: 2
/// ```
///
/// Reference definitions render to nothing, so the parameters never show up
/// in the page body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct PageParams(
	#[deref]
	#[deref_mut]
	BTreeMap<String, String>,
);

impl PageParams {
	pub fn title(&self) -> Option<&str> {
		self.get("title").map(String::as_str)
	}

	pub fn name(&self) -> Option<&str> {
		self.get("name").map(String::as_str)
	}

	/// Template file requested by the page.
	pub fn theme(&self) -> Option<&str> {
		self.get("theme").map(String::as_str)
	}

	pub fn main_class(&self) -> &str {
		self.get("main_class").map_or("", String::as_str)
	}

	/// Deepest heading level listed in the section index.
	pub fn refs_deep_max(&self, page: &str) -> SiteResult<u8> {
		let Some(value) = self.get("refs_deep_max") else {
			return Ok(DEFAULT_REFS_DEEP_MAX);
		};

		value.trim().parse::<u8>().map_err(|_| {
			SiteError::InvalidParam {
				name: "refs_deep_max".to_string(),
				value: value.clone(),
				page: page.to_string(),
			}
		})
	}
}

/// Read parameters from the leading lines of `content`. Parsing stops at the
/// first line that isn't a parameter.
pub fn parse_front_matter(content: &str) -> PageParams {
	let mut params = PageParams::default();

	for line in content.lines() {
		let Some((key, value)) = parse_param_line(line) else {
			break;
		};
		params.insert(key.to_string(), value.to_string());
	}

	params
}

/// Parse `[key]: <> "value"` (quoted form) or `[key]: value` (bare form, first
/// whitespace separated word).
fn parse_param_line(line: &str) -> Option<(&str, &str)> {
	let rest = line.strip_prefix('[')?;
	let close = rest.find(']')?;
	let key = &rest[..close];
	if key.is_empty() {
		return None;
	}

	let rest = rest[close + 1..].strip_prefix(':')?.trim_start();

	if let Some(quoted) = parse_quoted_value(rest) {
		return Some((key, quoted));
	}

	let value = rest.split_whitespace().next()?;
	Some((key, value))
}

fn parse_quoted_value(rest: &str) -> Option<&str> {
	let rest = rest.strip_prefix("<>")?.trim_start();
	let inner = rest.strip_prefix(['"', '\''])?;
	let end = inner.rfind(['"', '\''])?;
	let value = &inner[..end];

	if value.is_empty() || value.contains(')') {
		return None;
	}

	Some(value)
}
