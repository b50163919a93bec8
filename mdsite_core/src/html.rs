use pulldown_cmark::Alignment;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use pulldown_cmark::html::push_html;

use crate::HeadingRecord;
use crate::SiteResult;
use crate::anchor_id;
use crate::render_code_block;

/// Turns a relative link or image destination into a final URL.
pub trait LinkResolver {
	fn resolve(&self, link: &str) -> SiteResult<String>;
}

/// Leaves every destination untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimLinks;

impl LinkResolver for VerbatimLinks {
	fn resolve(&self, link: &str) -> SiteResult<String> {
		Ok(link.to_string())
	}
}

/// The HTML body of one page and the headings captured while rendering it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
	pub html: String,
	pub headings: Vec<HeadingRecord>,
}

/// Render markdown to HTML.
///
/// Raw HTML is passed through. Fenced code blocks go through
/// [`render_code_block`], headings get an anchor and are recorded in
/// [`RenderedPage::headings`], and link and image destinations without a
/// scheme, leading `/` or leading `#` are handed to `resolver`.
pub fn render_markdown(content: &str, resolver: &dyn LinkResolver) -> SiteResult<RenderedPage> {
	let options = Options::ENABLE_TABLES
		| Options::ENABLE_FOOTNOTES
		| Options::ENABLE_STRIKETHROUGH
		| Options::ENABLE_TASKLISTS;
	let parser = Parser::new_ext(content, options);

	let mut preprocessor = PagePreprocessor {
		resolver,
		headings: Vec::new(),
		alignments: Vec::new(),
		in_table_head: false,
		column: 0,
	};
	let events = preprocessor.run(parser)?;

	let mut html = String::with_capacity(content.len() * 3 / 2);
	push_html(&mut html, events.into_iter());

	Ok(RenderedPage {
		html,
		headings: preprocessor.headings,
	})
}

/// Destinations that are used as written.
pub fn is_absolute_link(link: &str) -> bool {
	if link.is_empty() || link.starts_with('/') || link.starts_with('#') {
		return true;
	}

	let scheme_len = link
		.bytes()
		.position(|b| !b.is_ascii_alphabetic())
		.unwrap_or(link.len());
	scheme_len > 0 && link.as_bytes().get(scheme_len) == Some(&b':')
}

/// Rewrites the parser's event stream before it is written out as HTML.
struct PagePreprocessor<'r> {
	resolver: &'r dyn LinkResolver,
	headings: Vec<HeadingRecord>,
	alignments: Vec<Alignment>,
	in_table_head: bool,
	column: usize,
}

impl PagePreprocessor<'_> {
	fn run<'a>(&mut self, mut parser: Parser<'a>) -> SiteResult<Vec<Event<'a>>> {
		let mut events = Vec::new();

		while let Some(event) = parser.next() {
			match event {
				Event::Start(Tag::Heading { level, .. }) => {
					let inner = self.take_inline(&mut parser)?;
					self.heading(level, inner, &mut events);
				}
				Event::Start(Tag::CodeBlock(kind)) => {
					let mut code = String::new();
					for event in parser.by_ref() {
						match event {
							Event::Text(text) => code.push_str(&text),
							Event::End(TagEnd::CodeBlock) => break,
							_ => {}
						}
					}

					let tag = match &kind {
						CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
						CodeBlockKind::Indented => None,
					};
					let code = code.strip_suffix('\n').unwrap_or(&code);
					events.push(Event::Html(render_code_block(code, tag).into()));
				}
				Event::Start(Tag::Table(alignments)) => {
					self.alignments.clone_from(&alignments);
					events.push(Event::Start(Tag::Table(alignments)));
				}
				Event::Start(Tag::TableHead) => {
					self.in_table_head = true;
					self.column = 0;
					events.push(Event::Start(Tag::TableHead));
				}
				Event::End(TagEnd::TableHead) => {
					self.in_table_head = false;
					events.push(Event::End(TagEnd::TableHead));
				}
				Event::Start(Tag::TableRow) => {
					self.column = 0;
					events.push(Event::Start(Tag::TableRow));
				}
				Event::Start(Tag::TableCell) => {
					let inner = self.take_inline(&mut parser)?;
					self.table_cell(inner, &mut events);
				}
				event => events.push(self.resolve(event)?),
			}
		}

		Ok(events)
	}

	/// Collect the events up to the end of the current heading or table cell.
	/// The closing event itself is consumed.
	fn take_inline<'a>(&self, parser: &mut Parser<'a>) -> SiteResult<Vec<Event<'a>>> {
		let mut inner = Vec::new();

		for event in parser.by_ref() {
			match event {
				Event::End(TagEnd::Heading(_) | TagEnd::TableCell) => break,
				event => inner.push(self.resolve(event)?),
			}
		}

		Ok(inner)
	}

	fn resolve<'a>(&self, event: Event<'a>) -> SiteResult<Event<'a>> {
		let event = match event {
			Event::Start(Tag::Link {
				link_type,
				dest_url,
				title,
				id,
			}) => {
				Event::Start(Tag::Link {
					link_type,
					dest_url: self.destination(dest_url)?,
					title,
					id,
				})
			}
			Event::Start(Tag::Image {
				link_type,
				dest_url,
				title,
				id,
			}) => {
				Event::Start(Tag::Image {
					link_type,
					dest_url: self.destination(dest_url)?,
					title,
					id,
				})
			}
			event => event,
		};

		Ok(event)
	}

	fn destination<'a>(&self, url: CowStr<'a>) -> SiteResult<CowStr<'a>> {
		if is_absolute_link(&url) {
			Ok(url)
		} else {
			Ok(self.resolver.resolve(&url)?.into())
		}
	}

	fn heading<'a>(
		&mut self,
		level: HeadingLevel,
		inner: Vec<Event<'a>>,
		events: &mut Vec<Event<'a>>,
	) {
		let plain: String = inner
			.iter()
			.filter_map(|event| {
				match event {
					Event::Text(text) | Event::Code(text) => Some(&**text),
					_ => None,
				}
			})
			.collect();
		let anchor = anchor_id(&plain);

		let mut text = String::new();
		push_html(&mut text, inner.iter().cloned());

		self.headings.push(HeadingRecord {
			level: level as u8,
			anchor: anchor.clone(),
			text,
		});

		events.push(Event::Start(Tag::Heading {
			level,
			id: None,
			classes: Vec::new(),
			attrs: Vec::new(),
		}));
		events.extend(inner);
		events.push(Event::InlineHtml(
			format!(
				"<a class=\"anchor\" aria-hidden=\"true\" id=\"{anchor}\" href=\"#{anchor}\">#</a>"
			)
			.into(),
		));
		events.push(Event::End(TagEnd::Heading(level)));
	}

	/// Emit one table cell. A trailing empty link to `#class-NAME` is removed
	/// and becomes `class="NAME"` on the cell.
	fn table_cell<'a>(&mut self, mut inner: Vec<Event<'a>>, events: &mut Vec<Event<'a>>) {
		let element = if self.in_table_head { "th" } else { "td" };
		let class = take_class_hint(&mut inner)
			.map(|class| format!(" class=\"{class}\""))
			.unwrap_or_default();
		let style = match self.alignments.get(self.column) {
			Some(Alignment::Left) => " style=\"text-align: left\"",
			Some(Alignment::Center) => " style=\"text-align: center\"",
			Some(Alignment::Right) => " style=\"text-align: right\"",
			Some(Alignment::None) | None => "",
		};
		self.column += 1;

		events.push(Event::InlineHtml(format!("<{element}{class}{style}>").into()));
		events.extend(inner);
		events.push(Event::InlineHtml(format!("</{element}>").into()));
	}
}

fn take_class_hint(cell: &mut Vec<Event<'_>>) -> Option<String> {
	let [.., Event::Start(Tag::Link { dest_url, .. }), Event::End(TagEnd::Link)] = cell.as_slice()
	else {
		return None;
	};

	let class = dest_url.trim().strip_prefix("#class-")?;
	let valid = !class.is_empty()
		&& class
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
	if !valid {
		return None;
	}

	let class = class.to_string();
	cell.truncate(cell.len() - 2);
	if let Some(Event::Text(text)) = cell.last_mut() {
		*text = text.trim_end().to_string().into();
	}

	Some(class)
}
