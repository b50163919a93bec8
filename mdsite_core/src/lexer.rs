use std::ops::Range;

use logos::Logos;

/// Raw tokens produced by logos for a C-like snippet.
///
/// String literals and comments are single tokens, so nothing inside them can
/// be picked up by the structural passes. Anything logos cannot match
/// (backslashes, stray quotes, non-ASCII) comes back as an error and is
/// treated as opaque punctuation.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
	#[regex(r#""([^"\\\n]|\\.)*""#)]
	StringLiteral,
	#[regex(r"'([^'\\\n]|\\.)*'")]
	CharLiteral,
	#[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
	BlockComment,
	#[regex(r"//[^\n]*", allow_greedy = true)]
	LineComment,
	#[regex(r"0[xX][0-9a-fA-F]+[uUlL]*")]
	HexNumber,
	#[regex(r"[0-9]+\.[0-9]+|\.[0-9]+|[0-9]+[uUlL]*")]
	Number,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Ident,
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token("[")]
	BracketOpen,
	#[token("]")]
	BracketClose,
	#[token("{")]
	BraceOpen,
	#[token("}")]
	BraceClose,
	#[token(";")]
	Semicolon,
	#[token(",")]
	Comma,
	#[token(":")]
	Colon,
	#[token("==")]
	EqEq,
	#[token("=")]
	Assign,
	#[token("*")]
	Star,
	#[token("->")]
	Arrow,
	#[token(".")]
	Dot,
	#[regex(r"#[^\n]*", allow_greedy = true)]
	Directive,
	#[regex(r"[-+/%<>!&|^~?]|[-+*/%<>!&|^]=|&&|\|\||<<|>>|<<=|>>=|\+\+|--")]
	Operator,
}

impl RawToken {
	pub(crate) fn is_comment(self) -> bool {
		matches!(self, Self::BlockComment | Self::LineComment)
	}

	pub(crate) fn is_literal(self) -> bool {
		matches!(self, Self::StringLiteral | Self::CharLiteral)
	}

	pub(crate) fn is_number(self) -> bool {
		matches!(self, Self::Number | Self::HexNumber)
	}
}

/// A lexed token with its byte span, relative to the scanned slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
	/// `None` for input logos could not classify.
	pub kind: Option<RawToken>,
	pub span: Range<usize>,
}

impl Lexeme {
	pub(crate) fn is(&self, kind: RawToken) -> bool {
		self.kind == Some(kind)
	}

	pub(crate) fn is_trivia(&self) -> bool {
		self.kind.is_some_and(RawToken::is_comment)
	}
}

/// Lex `source` into a flat list of lexemes. Never fails: unknown bytes become
/// lexemes without a kind.
pub(crate) fn lex(source: &str) -> Vec<Lexeme> {
	RawToken::lexer(source)
		.spanned()
		.map(|(result, span)| {
			Lexeme {
				kind: result.ok(),
				span,
			}
		})
		.collect()
}
