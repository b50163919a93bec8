//! `mdsite_core` is the core library for the `mdsite` documentation site
//! builder. It turns a directory of markdown pages into HTML, annotating C
//! snippets with highlighting spans and building a section index for every
//! page.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source directory
//!   → Site scan (walks the tree, reads page parameters from each *.md file)
//!   → Markdown renderer (pulldown-cmark events → HTML, headings recorded, links resolved)
//!       → C code blocks: lexer → span tokenizer → tag renderer → keyword passes
//!   → Section index builder (headings → nested <ul> markup)
//!   → minijinja template (body, refs, nav, title) → build directory
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `mdsite.toml`.
//! - [`keywords`] — The five keyword dictionaries and the whole-word
//!   substitution passes.
//! - [`site`] — Source tree scanning, URL computation, navigation and page
//!   assembly.
//!
//! ## Key Types
//!
//! - [`PositionIndex`] — Spans found in a C snippet, flattened into sorted
//!   open/close events for rendering.
//! - [`Category`] — What a span highlights (literal, comment, number, call
//!   name, …).
//! - [`HeadingRecord`] — A heading captured while rendering a page.
//! - [`PageParams`] — Parameters declared at the top of a page.
//! - [`Site`] — A scanned source tree, ready to be built.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdsite_core::build_section_index;
//! use mdsite_core::highlight;
//! use mdsite_core::HeadingRecord;
//!
//! let html = highlight("int add(int a, int b);");
//! assert!(html.contains("<span class=\"deffname\">add</span>"));
//!
//! let records = vec![HeadingRecord::new(1, "Intro"), HeadingRecord::new(2, "Usage")];
//! let index = build_section_index(&records, 1..4);
//! assert!(index.starts_with("<ul class=\"nav-level-1\">"));
//! ```

pub use code_block::*;
pub use config::*;
pub use error::*;
pub use front_matter::*;
pub use html::*;
pub use keywords::apply_keyword_passes;
pub use render::*;
pub use section_index::*;
pub use site::*;
pub use spans::*;
pub use tokenizer::*;

mod code_block;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod front_matter;
mod html;
pub mod keywords;
pub(crate) mod lexer;
mod render;
mod section_index;
pub mod site;
mod spans;
mod tokenizer;
