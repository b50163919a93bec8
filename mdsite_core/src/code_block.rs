use pulldown_cmark::Event;
use pulldown_cmark::html::push_html;

use crate::highlight;

/// The language tag attached to a fenced code block, as far as rendering is
/// concerned.
///
/// Any recognised tag turns on C annotation; the variants only differ in the
/// class on the inner `<code>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
	/// No tag at all.
	None,
	C,
	ApiFunction,
	ApiEnum,
	ApiStruct,
	/// A tag outside the supported set.
	Unrecognized,
}

impl CodeLanguage {
	/// Classify a fence info string's language word (case-insensitive).
	pub fn from_tag(tag: Option<&str>) -> Self {
		let Some(tag) = tag.map(str::trim).filter(|tag| !tag.is_empty()) else {
			return Self::None;
		};

		match tag.to_ascii_lowercase().as_str() {
			"c" => Self::C,
			"c-api-function" => Self::ApiFunction,
			"c-api-enum" => Self::ApiEnum,
			"c-api-struct" => Self::ApiStruct,
			_ => Self::Unrecognized,
		}
	}

	pub fn is_annotated(self) -> bool {
		matches!(
			self,
			Self::C | Self::ApiFunction | Self::ApiEnum | Self::ApiStruct
		)
	}

	/// Class of the inner `<code>` element, if any.
	pub fn code_class(self) -> Option<&'static str> {
		match self {
			Self::ApiFunction => Some("api-function"),
			Self::ApiEnum => Some("api-enum"),
			Self::ApiStruct => Some("api-struct"),
			Self::None | Self::C | Self::Unrecognized => None,
		}
	}

	/// Class of the outer `<pre>` element.
	pub fn pre_class(self) -> &'static str {
		match self {
			Self::Unrecognized => "code",
			_ => "code highlight",
		}
	}
}

/// Render a fenced code block to a `<pre><code>` fragment.
pub fn render_code_block(code: &str, tag: Option<&str>) -> String {
	let language = CodeLanguage::from_tag(tag);
	let body = if language.is_annotated() {
		highlight(code)
	} else {
		let mut escaped = String::with_capacity(code.len());
		push_html(&mut escaped, std::iter::once(Event::Text(code.into())));
		escaped
	};
	let code_open = match language.code_class() {
		Some(class) => format!("<code class=\"{class}\">"),
		None => "<code>".to_string(),
	};

	format!(
		"\n<pre class=\"{}\">{code_open}{body}</code></pre>\n",
		language.pre_class()
	)
}
