use crate::EventKind;
use crate::PositionIndex;
use crate::annotate;
use crate::apply_keyword_passes;

/// Render `code` with the spans of `index` inserted as `<span class="…">`
/// tags.
///
/// Events are emitted in the order given by [`PositionIndex::events`]. Closing
/// tags are positional: each recorded stop emits one `</span>` regardless of
/// which span is currently innermost. Spans that stop at the end of the input
/// are closed after the last character.
pub fn render_spans(code: &str, index: &PositionIndex) -> String {
	let events = index.events();
	let mut output = String::with_capacity(code.len() * 2);
	let mut pending = events.iter().peekable();

	for (offset, ch) in code.char_indices() {
		while let Some(event) = pending.next_if(|event| event.offset <= offset) {
			push_event_tag(&mut output, event.kind, event.span.category.class_name());
		}

		push_escaped_char(&mut output, ch);
	}

	for event in pending {
		push_event_tag(&mut output, event.kind, event.span.category.class_name());
	}

	output
}

fn push_event_tag(output: &mut String, kind: EventKind, class: &str) {
	match kind {
		EventKind::Open => {
			output.push_str("<span class=\"");
			output.push_str(class);
			output.push_str("\">");
		}
		EventKind::Close => output.push_str("</span>"),
	}
}

fn push_escaped_char(output: &mut String, ch: char) {
	match ch {
		'<' => output.push_str("&lt;"),
		'&' => output.push_str("&#38;"),
		_ => output.push(ch),
	}
}

/// Escape `<` and `&` only. Everything else, `>` included, is copied.
pub fn escape_code(code: &str) -> String {
	let mut output = String::with_capacity(code.len());
	for ch in code.chars() {
		push_escaped_char(&mut output, ch);
	}
	output
}

/// Annotate, render and keyword-wrap a C snippet.
pub fn highlight(code: &str) -> String {
	let index = annotate(code);
	apply_keyword_passes(&render_spans(code, &index))
}
