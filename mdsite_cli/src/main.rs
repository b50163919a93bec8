use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdsite_cli::Commands;
use mdsite_cli::HighlightFormat;
use mdsite_cli::SiteCli;
use mdsite_core::Site;
use mdsite_core::SiteConfig;
use mdsite_core::VerbatimLinks;
use mdsite_core::annotate;
use mdsite_core::build_section_index;
use mdsite_core::highlight;
use mdsite_core::render_markdown;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SiteCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Build {
			source,
			build,
			theme,
			release,
			url_with_ext,
			base_url,
		}) => {
			let overrides = BuildOverrides {
				source: source.clone(),
				build: build.clone(),
				theme: theme.clone(),
				release: *release,
				url_with_ext: *url_with_ext,
				base_url: base_url.clone(),
			};
			run_build(&args, overrides)
		}
		Some(Commands::Highlight { file, format }) => run_highlight(file.as_deref(), *format),
		Some(Commands::Toc { file, from, to }) => run_toc(file.as_deref(), *from, *to),
		None => {
			eprintln!("No subcommand specified. Run `mdsite --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<mdsite_core::SiteError>() {
			Ok(site_err) => {
				let report: miette::Report = (*site_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &SiteCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Command line values that take precedence over `mdsite.toml`.
#[derive(Debug, Default)]
struct BuildOverrides {
	source: Option<PathBuf>,
	build: Option<PathBuf>,
	theme: Option<PathBuf>,
	release: bool,
	url_with_ext: bool,
	base_url: Option<String>,
}

fn run_build(args: &SiteCli, overrides: BuildOverrides) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	if let Some(path) = SiteConfig::resolve_path(&root) {
		tracing::debug!(path = %path.display(), "using config file");
	}

	let mut config = SiteConfig::load_or_default(&root)?.rooted_at(&root);

	if let Some(source) = overrides.source {
		config.source = source;
	}
	if let Some(build) = overrides.build {
		config.build = build;
	}
	if let Some(theme) = overrides.theme {
		config.theme = theme;
	}
	if let Some(base_url) = overrides.base_url {
		config.base_url = Some(base_url);
	}
	config.release = overrides.release;
	config.url_with_ext |= overrides.url_with_ext;

	let build_dir = config.build.clone();
	let site = Site::scan(config)?;
	let summary = site.build()?;

	println!(
		"{} {} page(s) and {} static file(s) into {}",
		colored!("Built", green),
		summary.pages.len(),
		summary.copied.len(),
		build_dir.display()
	);

	if args.verbose {
		for page in &summary.pages {
			println!("  {}", page.display());
		}
	}

	Ok(())
}

/// Read the whole of `file`, or stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
	let content = match file {
		Some(file) => std::fs::read_to_string(file).map_err(mdsite_core::SiteError::from)?,
		None => {
			let mut content = String::new();
			std::io::stdin().read_to_string(&mut content)?;
			content
		}
	};

	Ok(content)
}

fn run_highlight(
	file: Option<&Path>,
	format: HighlightFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let code = read_input(file)?;

	match format {
		HighlightFormat::Html => println!("{}", highlight(&code)),
		HighlightFormat::Json => {
			let index = annotate(&code);
			println!("{}", serde_json::to_string_pretty(index.spans())?);
		}
	}

	Ok(())
}

fn run_toc(file: Option<&Path>, from: u8, to: u8) -> Result<(), Box<dyn std::error::Error>> {
	let content = read_input(file)?;
	let page = render_markdown(&content, &VerbatimLinks)?;
	let index = build_section_index(&page.headings, from..to.saturating_add(1));

	if index.is_empty() {
		println!("No headings between levels {from} and {to}.");
	} else {
		println!("{index}");
	}

	Ok(())
}
