//! Span tokenizer for C snippets.
//!
//! The snippet is lexed once and a fixed sequence of passes walks the token
//! stream, each registering spans in a [`PositionIndex`]:
//!
//! 1. string and character literals
//! 2. function definitions (`<type> <name> ( <args> )`)
//! 3. calls and control statements (`<name> ( <body> )`)
//! 4. variable declarations (`<type> <name>` followed by `;`, `,` or `=`)
//! 5. numbers
//! 6. comments
//! 7. member paths (the last qualifier of `a->b.c`)
//!
//! The patterns are coarse. Anything they don't recognise simply
//! produces no span, so every input yields an index and nothing here can fail.

use std::collections::HashSet;
use std::ops::Range;

use crate::Category;
use crate::PositionIndex;
use crate::lexer::Lexeme;
use crate::lexer::RawToken;
use crate::lexer::lex;

/// Annotate a whole snippet.
pub fn annotate(code: &str) -> PositionIndex {
	annotate_range(code, 0)
}

/// Annotate `slice` as an independent fragment whose first byte sits at
/// `base` in the caller's coordinates. Every registered offset is absolute.
pub fn annotate_range(slice: &str, base: usize) -> PositionIndex {
	let lexemes = lex(slice);
	let mut scanner = Scanner::new(slice, base, &lexemes);
	scanner.run();

	tracing::trace!(base, len = slice.len(), spans = scanner.index.len(), "annotated fragment");
	scanner.index
}

/// Words that start statements rather than declarations. They never count as
/// type tokens or declared names.
fn is_statement_keyword(word: &str) -> bool {
	matches!(
		word,
		"if" | "else"
			| "while" | "for"
			| "do" | "switch"
			| "case" | "default"
			| "return"
			| "goto" | "break"
			| "continue"
			| "sizeof"
	)
}

struct Scanner<'a> {
	source: &'a str,
	base: usize,
	/// Every lexeme, including comments.
	lexemes: &'a [Lexeme],
	/// Lexemes the structural passes look at (comments removed).
	tokens: Vec<&'a Lexeme>,
	/// Indices (into `tokens`) of opening parentheses owned by a definition.
	claimed: HashSet<usize>,
	index: PositionIndex,
}

impl<'a> Scanner<'a> {
	fn new(source: &'a str, base: usize, lexemes: &'a [Lexeme]) -> Self {
		Self {
			source,
			base,
			lexemes,
			tokens: lexemes.iter().filter(|lexeme| !lexeme.is_trivia()).collect(),
			claimed: HashSet::new(),
			index: PositionIndex::new(),
		}
	}

	fn run(&mut self) {
		self.literal_pass();
		self.definition_pass();
		self.call_pass();
		self.declaration_pass();
		self.number_pass();
		self.comment_pass();
		self.member_path_pass();
	}

	fn text(&self, idx: usize) -> &'a str {
		&self.source[self.tokens[idx].span.clone()]
	}

	fn is(&self, idx: usize, kind: RawToken) -> bool {
		self.tokens.get(idx).is_some_and(|token| token.is(kind))
	}

	fn is_name(&self, idx: usize) -> bool {
		self.is(idx, RawToken::Ident) && !is_statement_keyword(self.text(idx))
	}

	/// Register a span over local byte offsets, shifted by the base offset.
	fn mark(&mut self, category: Category, local: Range<usize>) {
		self.index
			.insert(category, local.start + self.base..local.end + self.base);
	}

	/// Register a span covering tokens `first..=last`.
	fn mark_tokens(&mut self, category: Category, first: usize, last: usize) {
		let range = self.tokens[first].span.start..self.tokens[last].span.end;
		self.mark(category, range);
	}

	/// Find the token closing the group opened at `open`.
	fn matching_close(&self, open: usize, opener: RawToken, closer: RawToken) -> Option<usize> {
		let mut depth = 0usize;

		for idx in open..self.tokens.len() {
			if self.is(idx, opener) {
				depth += 1;
			} else if self.is(idx, closer) {
				depth -= 1;
				if depth == 0 {
					return Some(idx);
				}
			}
		}

		None
	}

	/// Find the token opening the group closed at `close`, scanning backwards.
	fn matching_open(&self, close: usize, opener: RawToken, closer: RawToken) -> Option<usize> {
		let mut depth = 0usize;

		for idx in (0..=close).rev() {
			if self.is(idx, closer) {
				depth += 1;
			} else if self.is(idx, opener) {
				depth -= 1;
				if depth == 0 {
					return Some(idx);
				}
			}
		}

		None
	}

	/// Tokens that may directly precede a declaration.
	fn is_boundary(&self, idx: usize) -> bool {
		self.tokens[idx].kind.is_some_and(|kind| {
			matches!(
				kind,
				RawToken::ParenOpen
					| RawToken::Comma
					| RawToken::Semicolon
					| RawToken::BraceOpen
					| RawToken::BraceClose
					| RawToken::Colon
					| RawToken::Directive
			)
		})
	}

	/// Walk backwards from the declared name at `name` over type tokens
	/// (identifiers and `*`). Returns the index of the first type token when
	/// the run holds at least one identifier and starts at a boundary.
	fn type_run_start(&self, name: usize) -> Option<usize> {
		let mut start = name;
		let mut has_ident = false;

		while start > 0 {
			let prev = start - 1;
			if self.is(prev, RawToken::Star) {
				start = prev;
			} else if self.is_name(prev) {
				has_ident = true;
				start = prev;
			} else {
				break;
			}
		}

		if !has_ident {
			return None;
		}

		if start > 0 && !self.is_boundary(start - 1) {
			return None;
		}

		while self.is(start, RawToken::Star) {
			start += 1;
		}

		Some(start)
	}

	fn literal_pass(&mut self) {
		for idx in 0..self.tokens.len() {
			if self.tokens[idx].kind.is_some_and(RawToken::is_literal) {
				self.mark_tokens(Category::TextLiteral, idx, idx);
			}
		}
	}

	fn definition_pass(&mut self) {
		for name in 0..self.tokens.len() {
			if !self.is_name(name) || !self.is(name + 1, RawToken::ParenOpen) {
				continue;
			}

			let Some(type_start) = self.type_run_start(name) else {
				continue;
			};
			let Some(close) =
				self.matching_close(name + 1, RawToken::ParenOpen, RawToken::ParenClose)
			else {
				continue;
			};

			self.mark_tokens(Category::DefFunctionType, type_start, name - 1);
			self.mark_tokens(Category::DefFunctionName, name, name);
			self.claimed.insert(name + 1);
			self.argument_list(name + 2, close);
		}
	}

	fn call_pass(&mut self) {
		let mut idx = 0;

		while idx < self.tokens.len() {
			if !self.is(idx, RawToken::Ident)
				|| !self.is(idx + 1, RawToken::ParenOpen)
				|| self.claimed.contains(&(idx + 1))
			{
				idx += 1;
				continue;
			}

			let Some(close) =
				self.matching_close(idx + 1, RawToken::ParenOpen, RawToken::ParenClose)
			else {
				idx += 1;
				continue;
			};

			if self.text(idx).eq_ignore_ascii_case("if") {
				let body = self.tokens[idx + 1].span.end..self.tokens[close].span.start;
				let nested = annotate_range(&self.source[body.clone()], self.base + body.start);
				self.index.extend(nested);
				idx = close + 1;
				continue;
			}

			self.mark_tokens(Category::FunctionCallName, idx, idx);
			self.argument_list(idx + 2, close);
			idx += 1;
		}
	}

	/// Classify each comma separated argument in `tokens[start..end]`.
	///
	/// Commas are only split at the top nesting level of the argument list.
	fn argument_list(&mut self, start: usize, end: usize) {
		let mut depth = 0usize;
		let mut piece_start = start;

		for idx in start..=end {
			if idx == end {
				self.argument(piece_start, end);
				break;
			}

			match self.tokens[idx].kind {
				Some(RawToken::ParenOpen | RawToken::BracketOpen | RawToken::BraceOpen) => {
					depth += 1;
				}
				Some(RawToken::ParenClose | RawToken::BracketClose | RawToken::BraceClose) => {
					depth = depth.saturating_sub(1);
				}
				Some(RawToken::Comma) if depth == 0 => {
					self.argument(piece_start, idx);
					piece_start = idx + 1;
				}
				_ => {}
			}
		}
	}

	/// A single argument `tokens[start..end]`: either `<type> <name>` or an
	/// arbitrary expression tagged as a whole.
	fn argument(&mut self, start: usize, end: usize) {
		if start >= end {
			return;
		}

		let name = self.skip_brackets_back(end - 1);
		if let Some(name) = name {
			if name > start && self.is_name(name) {
				if let Some(type_start) = self.type_run_start(name) {
					if type_start == start {
						self.mark_tokens(Category::DefType, start, name - 1);
						self.mark_tokens(Category::Var, name, name);
						return;
					}
				}
			}
		}

		self.mark_tokens(Category::Var, start, end - 1);
	}

	/// Step back over trailing `[...]` groups (`argv[]`, `buf[16]`) to the
	/// declared name.
	fn skip_brackets_back(&self, mut idx: usize) -> Option<usize> {
		while self.is(idx, RawToken::BracketClose) {
			let open = self.matching_open(idx, RawToken::BracketOpen, RawToken::BracketClose)?;
			idx = open.checked_sub(1)?;
		}

		Some(idx)
	}

	fn declaration_pass(&mut self) {
		for terminator in 1..self.tokens.len() {
			let ends_declaration = self.is(terminator, RawToken::Semicolon)
				|| self.is(terminator, RawToken::Comma)
				|| self.is(terminator, RawToken::Assign);
			if !ends_declaration {
				continue;
			}

			let Some(name) = self.skip_brackets_back(terminator - 1) else {
				continue;
			};
			if !self.is_name(name) {
				continue;
			}
			let Some(type_start) = self.type_run_start(name) else {
				continue;
			};

			self.mark_tokens(Category::DefType, type_start, name - 1);
			self.mark_tokens(Category::Var, name, name);
		}
	}

	fn number_pass(&mut self) {
		for idx in 0..self.tokens.len() {
			if self.tokens[idx].kind.is_some_and(RawToken::is_number) {
				self.mark_tokens(Category::Number, idx, idx);
			}
		}
	}

	fn comment_pass(&mut self) {
		let lexemes = self.lexemes;
		for lexeme in lexemes {
			if lexeme.is_trivia() {
				self.mark(Category::Comment, lexeme.span.clone());
			}
		}
	}

	fn member_path_pass(&mut self) {
		let mut idx = 0;

		while idx < self.tokens.len() {
			if !self.is(idx, RawToken::Ident) {
				idx += 1;
				continue;
			}

			let mut last = idx;
			while (self.is(last + 1, RawToken::Arrow) || self.is(last + 1, RawToken::Dot))
				&& self.is(last + 2, RawToken::Ident)
			{
				last += 2;
			}

			if last > idx {
				self.mark_tokens(Category::Mpath, last, last);
			}

			idx = last + 1;
		}
	}
}
