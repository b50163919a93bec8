use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Build documentation sites from markdown with annotated C snippets.",
	long_about = "mdsite turns a directory of markdown pages into a static HTML site.\n\nFenced \
	              code blocks tagged `c` (or `C-API-Function`, `C-API-Enum`, `C-API-Struct`) are \
	              annotated with highlighting spans, every page gets a section index built from \
	              its headings, and pages are rendered through minijinja templates.\n\nQuick \
	              start:\n  mdsite build      Render the site into the build directory\n  mdsite \
	              highlight  Annotate a C snippet\n  mdsite toc        Print the section index of \
	              a page"
)]
pub struct SiteCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render every page and copy every static file into the build directory.
	///
	/// Settings come from `mdsite.toml` in the project root; the flags below
	/// override them. The build directory is removed and recreated on every
	/// run. Any link to a file missing from the source tree aborts the build.
	Build {
		/// Directory holding the markdown sources.
		#[arg(long)]
		source: Option<PathBuf>,

		/// Output directory.
		#[arg(long)]
		build: Option<PathBuf>,

		/// Directory holding the templates.
		#[arg(long)]
		theme: Option<PathBuf>,

		/// Use `base_url` and directory-style page URLs.
		#[arg(long, default_value_t = false)]
		release: bool,

		/// Keep the page extension in release URLs.
		#[arg(long, default_value_t = false)]
		url_with_ext: bool,

		/// URL prefix for release builds.
		#[arg(long)]
		base_url: Option<String>,
	},
	/// Annotate a C snippet and print the highlighted fragment.
	///
	/// Reads the snippet from FILE, or from stdin when no file is given.
	Highlight {
		/// File holding the snippet.
		file: Option<PathBuf>,

		/// Output format. `html` prints the annotated fragment, `json` prints
		/// the spans found in the snippet.
		#[arg(long, value_enum, default_value_t = HighlightFormat::Html)]
		format: HighlightFormat,
	},
	/// Print the section index of a markdown page.
	///
	/// Reads the page from FILE, or from stdin when no file is given. Links
	/// in the page are not resolved.
	Toc {
		/// Markdown file.
		file: Option<PathBuf>,

		/// Shallowest heading level listed.
		#[arg(long, default_value_t = 1)]
		from: u8,

		/// Deepest heading level listed.
		#[arg(long, default_value_t = 3)]
		to: u8,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HighlightFormat {
	/// The annotated HTML fragment.
	Html,
	/// The spans as a JSON array of `{category, start, stop}` objects.
	Json,
}
