use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// The kind of highlighting applied to a region of a C snippet.
///
/// The declaration order is the detection order of the tokenizer passes and is
/// used to break ties when several spans open at the same offset with the same
/// extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
	TextLiteral,
	DefFunctionType,
	DefFunctionName,
	FunctionCallName,
	DefType,
	Var,
	Number,
	Comment,
	Mpath,
}

impl Category {
	/// The CSS class emitted for spans of this category.
	pub fn class_name(self) -> &'static str {
		match self {
			Self::TextLiteral => "text",
			Self::Comment => "comment",
			Self::Number => "number",
			Self::DefFunctionType => "defftype",
			Self::DefFunctionName => "deffname",
			Self::FunctionCallName => "ffname",
			Self::DefType => "deftype",
			Self::Var => "var",
			Self::Mpath => "mpath",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::TextLiteral => "text-literal",
			Self::Comment => "comment",
			Self::Number => "number",
			Self::DefFunctionType => "def-function-type",
			Self::DefFunctionName => "def-function-name",
			Self::FunctionCallName => "function-call-name",
			Self::DefType => "def-type",
			Self::Var => "var",
			Self::Mpath => "mpath",
		};
		f.write_str(name)
	}
}

/// A highlighted region: `start..stop` byte offsets into the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
	pub category: Category,
	pub start: usize,
	pub stop: usize,
}

impl Span {
	pub fn new(category: Category, range: Range<usize>) -> Self {
		Self {
			category,
			start: range.start,
			stop: range.end,
		}
	}

	pub fn range(&self) -> Range<usize> {
		self.start..self.stop
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Open,
	Close,
}

/// A single open or close marker, as consumed by the tag renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanEvent {
	pub offset: usize,
	pub kind: EventKind,
	pub span: Span,
}

/// Aggregated spans produced by the tokenizer for one snippet.
///
/// Spans are stored in detection order. Registering the same category with
/// the same start and stop twice is a no-op; distinct categories may share
/// offsets freely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PositionIndex {
	spans: Vec<Span>,
	#[serde(skip)]
	seen: HashSet<Span>,
}

impl PartialEq for PositionIndex {
	fn eq(&self, other: &Self) -> bool {
		self.spans == other.spans
	}
}

impl Eq for PositionIndex {}

impl PositionIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a span. Empty or inverted ranges are ignored.
	pub fn insert(&mut self, category: Category, range: Range<usize>) {
		if range.start >= range.end {
			return;
		}

		let span = Span::new(category, range);
		if self.seen.insert(span) {
			self.spans.push(span);
		}
	}

	/// Merge every span of `other` into this index, keeping detection order.
	pub fn extend(&mut self, other: PositionIndex) {
		for span in other.spans {
			self.insert(span.category, span.range());
		}
	}

	pub fn spans(&self) -> &[Span] {
		&self.spans
	}

	pub fn len(&self) -> usize {
		self.spans.len()
	}

	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}

	/// Categories whose spans start at `offset`, in opening order.
	pub fn starts_at(&self, offset: usize) -> Vec<Category> {
		let mut opening: Vec<(usize, &Span)> = self
			.spans
			.iter()
			.enumerate()
			.filter(|(_, span)| span.start == offset)
			.collect();

		opening.sort_by(|(a_order, a), (b_order, b)| compare_opens(a, *a_order, b, *b_order));
		opening.into_iter().map(|(_, span)| span.category).collect()
	}

	/// `(category, start)` pairs for spans stopping at `offset`.
	pub fn stops_at(&self, offset: usize) -> Vec<(Category, usize)> {
		let mut closing: Vec<(usize, &Span)> = self
			.spans
			.iter()
			.enumerate()
			.filter(|(_, span)| span.stop == offset)
			.collect();

		closing.sort_by(|(a_order, a), (b_order, b)| compare_closes(a, *a_order, b, *b_order));
		closing
			.into_iter()
			.map(|(_, span)| (span.category, span.start))
			.collect()
	}

	/// Flatten the spans into one sorted list of open and close events.
	///
	/// At a shared offset every close comes before every open. Opens are
	/// ordered outermost first (the span that stops last), then by detection
	/// order. Closes mirror that: innermost first.
	pub fn events(&self) -> Vec<SpanEvent> {
		let mut events: Vec<(usize, SpanEvent)> = Vec::with_capacity(self.spans.len() * 2);

		for (order, span) in self.spans.iter().enumerate() {
			events.push((
				order,
				SpanEvent {
					offset: span.start,
					kind: EventKind::Open,
					span: *span,
				},
			));
			events.push((
				order,
				SpanEvent {
					offset: span.stop,
					kind: EventKind::Close,
					span: *span,
				},
			));
		}

		events.sort_by(|(a_order, a), (b_order, b)| compare_events(a, *a_order, b, *b_order));
		events.into_iter().map(|(_, event)| event).collect()
	}
}

fn compare_events(a: &SpanEvent, a_order: usize, b: &SpanEvent, b_order: usize) -> Ordering {
	a.offset.cmp(&b.offset).then_with(|| {
		match (a.kind, b.kind) {
			(EventKind::Close, EventKind::Open) => Ordering::Less,
			(EventKind::Open, EventKind::Close) => Ordering::Greater,
			(EventKind::Open, EventKind::Open) => compare_opens(&a.span, a_order, &b.span, b_order),
			(EventKind::Close, EventKind::Close) => {
				compare_closes(&a.span, a_order, &b.span, b_order)
			}
		}
	})
}

fn compare_opens(a: &Span, a_order: usize, b: &Span, b_order: usize) -> Ordering {
	(Reverse(a.stop), a.category, a_order).cmp(&(Reverse(b.stop), b.category, b_order))
}

fn compare_closes(a: &Span, a_order: usize, b: &Span, b_order: usize) -> Ordering {
	(a.start, a.category, a_order)
		.cmp(&(b.start, b.category, b_order))
		.reverse()
}
