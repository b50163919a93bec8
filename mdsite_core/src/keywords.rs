//! Keyword dictionaries and the whole-word substitution passes applied after
//! span rendering.

/// A named set of words wrapped in `<span class="{class}">` when they appear as
/// whole words in rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
	pub class: &'static str,
	pub words: &'static [&'static str],
}

impl Dictionary {
	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(&word)
	}
}

/// Standard library and POSIX typedefs.
pub const TYPEDEFS: Dictionary = Dictionary {
	class: "type",
	words: &[
		"size_t",
		"ssize_t",
		"off_t",
		"wchar_t",
		"ptrdiff_t",
		"sig_atomic_t",
		"fpos_t",
		"clock_t",
		"time_t",
		"va_list",
		"jmp_buf",
		"FILE",
		"DIR",
		"div_t",
		"ldiv_t",
		"mbstate_t",
		"wctrans_t",
		"wint_t",
		"wctype_t",
		"_Bool",
		"_Complex",
		"int8_t",
		"int16_t",
		"int32_t",
		"int64_t",
		"uint8_t",
		"uint16_t",
		"uint32_t",
		"uint64_t",
		"int_least8_t",
		"int_least16_t",
		"int_least32_t",
		"int_least64_t",
		"uint_least8_t",
		"uint_least16_t",
		"uint_least32_t",
		"uint_least64_t",
		"int_fast8_t",
		"int_fast16_t",
		"int_fast32_t",
		"int_fast64_t",
		"uint_fast8_t",
		"uint_fast16_t",
		"uint_fast32_t",
		"uint_fast64_t",
		"intptr_t",
		"uintptr_t",
		"intmax_t",
		"uintmax_t",
		"clockid_t",
		"cpu_set_t",
		"cpumask_t",
		"dev_t",
		"gid_t",
		"id_t",
		"ino_t",
		"key_t",
		"mode_t",
		"nfds_t",
		"pid_t",
		"rlim_t",
		"sig_t",
		"sighandler_t",
		"siginfo_t",
		"sigset_t",
		"sigval_t",
		"socklen_t",
		"timer_t",
		"uid_t",
	],
};

/// Primitive type keywords.
pub const PRIMITIVE_TYPES: Dictionary = Dictionary {
	class: "std-type",
	words: &[
		"bool", "int", "long", "float", "short", "double", "char", "unsigned", "signed", "void",
	],
};

/// Storage class, qualifier and control flow keywords.
pub const KEYWORDS: Dictionary = Dictionary {
	class: "std",
	words: &[
		"asm",
		"auto",
		"break",
		"case",
		"const",
		"continue",
		"default",
		"do",
		"else",
		"enum",
		"extern",
		"for",
		"goto",
		"if",
		"register",
		"restricted",
		"return",
		"sizeof",
		"static",
		"struct",
		"switch",
		"typedef",
		"union",
		"volatile",
		"while",
		"inline",
		"_inline",
		"__inline",
		"naked",
		"restrict",
		"thread",
		"typename",
	],
};

/// Boolean and null literals.
pub const LITERALS: Dictionary = Dictionary {
	class: "std-bn",
	words: &["true", "false", "NULL"],
};

/// Process exit status macros.
pub const EXIT_MACROS: Dictionary = Dictionary {
	class: "std-macros",
	words: &["EXIT_SUCCESS", "EXIT_FAILURE"],
};

/// The substitution passes in the order they are applied.
pub const DICTIONARIES: [Dictionary; 5] =
	[TYPEDEFS, PRIMITIVE_TYPES, KEYWORDS, LITERALS, EXIT_MACROS];

/// Run every dictionary pass over rendered markup, in order.
pub fn apply_keyword_passes(html: &str) -> String {
	DICTIONARIES
		.iter()
		.fold(html.to_string(), |text, dictionary| wrap_words(&text, dictionary))
}

/// Wrap every whole-word occurrence of a dictionary word in a styling span.
///
/// Words are maximal runs of `[A-Za-z0-9_]`. Tag markup (`<...>`) and
/// character entities (`&...;`) are copied through untouched, so words may sit
/// directly inside or next to existing tags but class names are never
/// rewritten.
pub fn wrap_words(html: &str, dictionary: &Dictionary) -> String {
	let bytes = html.as_bytes();
	let mut output = String::with_capacity(html.len());
	let mut cursor = 0;

	while cursor < bytes.len() {
		let byte = bytes[cursor];

		if byte == b'<' {
			let end = html[cursor..]
				.find('>')
				.map_or(html.len(), |pos| cursor + pos + 1);
			output.push_str(&html[cursor..end]);
			cursor = end;
		} else if byte == b'&' {
			let end = entity_end(html, cursor);
			output.push_str(&html[cursor..end]);
			cursor = end;
		} else if is_word_byte(byte) {
			let end = html[cursor..]
				.bytes()
				.position(|b| !is_word_byte(b))
				.map_or(html.len(), |pos| cursor + pos);
			let word = &html[cursor..end];

			if dictionary.contains(word) {
				output.push_str("<span class=\"");
				output.push_str(dictionary.class);
				output.push_str("\">");
				output.push_str(word);
				output.push_str("</span>");
			} else {
				output.push_str(word);
			}

			cursor = end;
		} else {
			let ch_len = html[cursor..].chars().next().map_or(1, char::len_utf8);
			output.push_str(&html[cursor..cursor + ch_len]);
			cursor += ch_len;
		}
	}

	output
}

fn is_word_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_'
}

/// End of a character entity starting at `start`, or just past the `&` when
/// the ampersand doesn't begin one.
fn entity_end(html: &str, start: usize) -> usize {
	let rest = &html[start + 1..];
	let body_len = rest
		.bytes()
		.position(|b| !(b.is_ascii_alphanumeric() || b == b'#'))
		.unwrap_or(rest.len());

	if body_len > 0 && rest.as_bytes().get(body_len) == Some(&b';') {
		start + 1 + body_len + 1
	} else {
		start + 1
	}
}
