use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use minijinja::Environment;
use minijinja::Value;
use minijinja::context;
use minijinja::path_loader;

use crate::LinkResolver;
use crate::PageParams;
use crate::SiteConfig;
use crate::SiteError;
use crate::SiteResult;
use crate::build_section_index;
use crate::parse_front_matter;
use crate::render_markdown;

/// A scanned source tree, ready to be built.
///
/// Paths are stored relative to the source directory with `/` separators.
/// Pages are keyed by their path without the `.md` extension.
#[derive(Debug)]
pub struct Site {
	config: SiteConfig,
	dirs: Vec<String>,
	files: Vec<String>,
	pages: BTreeMap<String, PageParams>,
	env: Environment<'static>,
}

/// What a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
	/// Rendered pages, relative to the build directory.
	pub pages: Vec<PathBuf>,
	/// Copied static files, relative to the build directory.
	pub copied: Vec<PathBuf>,
}

impl Site {
	/// Walk the source directory and read every page's parameters.
	///
	/// Entries whose name starts with `.` or `_` are skipped, as is anything
	/// matched by the `[exclude]` patterns.
	pub fn scan(config: SiteConfig) -> SiteResult<Site> {
		if !config.source.is_dir() {
			return Err(SiteError::MissingSourceDir(
				config.source.display().to_string(),
			));
		}

		let exclude = build_exclude_matcher(&config.source, &config.exclude.patterns)?;
		let mut dirs = Vec::new();
		let mut files = Vec::new();
		walk_dir(&config.source, &config.source, &exclude, &mut dirs, &mut files)?;
		dirs.sort();
		files.sort();

		let mut pages = BTreeMap::new();
		for file in &files {
			let Some(key) = page_key(file) else {
				continue;
			};

			let content = std::fs::read_to_string(config.source.join(file))?;
			pages.insert(key.to_string(), parse_front_matter(&content));
		}

		tracing::debug!(
			dirs = dirs.len(),
			files = files.len(),
			pages = pages.len(),
			"scanned source tree"
		);

		let mut env = Environment::new();
		env.set_loader(path_loader(&config.theme));

		Ok(Site {
			config,
			dirs,
			files,
			pages,
			env,
		})
	}

	pub fn config(&self) -> &SiteConfig {
		&self.config
	}

	/// Relative paths of every scanned directory.
	pub fn dirs(&self) -> &[String] {
		&self.dirs
	}

	/// Relative paths of every scanned file, pages included.
	pub fn files(&self) -> &[String] {
		&self.files
	}

	/// Parameters of the page at `key` (path without `.md`).
	pub fn page(&self, key: &str) -> Option<&PageParams> {
		self.pages.get(key)
	}

	/// Recreate the build directory and write every page and static file.
	///
	/// The first failing page aborts the build; nothing is cleaned up.
	pub fn build(&self) -> SiteResult<BuildSummary> {
		let build = &self.config.build;
		match std::fs::remove_dir_all(build) {
			Ok(()) => {}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => return Err(e.into()),
		}
		std::fs::create_dir_all(build)?;

		for dir in &self.dirs {
			std::fs::create_dir_all(build.join(dir))?;
		}

		let mut summary = BuildSummary::default();

		for file in &self.files {
			let source_path = self.config.source.join(file);

			if page_key(file).is_none() {
				std::fs::copy(&source_path, build.join(file))?;
				summary.copied.push(PathBuf::from(file));
				continue;
			}

			let content = std::fs::read_to_string(&source_path)?;
			let html = self.render_page(file, &content)?;
			let output = Path::new(file).with_extension(&self.config.extension);
			std::fs::write(build.join(&output), html)?;

			tracing::debug!(page = %file, output = %output.display(), "rendered page");
			summary.pages.push(output);
		}

		tracing::info!(
			pages = summary.pages.len(),
			copied = summary.copied.len(),
			build = %build.display(),
			"build finished"
		);

		Ok(summary)
	}

	/// Render one markdown page (`file` is relative to the source directory)
	/// through its template.
	pub fn render_page(&self, file: &str, content: &str) -> SiteResult<String> {
		let key = page_key(file).unwrap_or(file);
		let params = self.pages.get(key).cloned().unwrap_or_default();
		let refs_max = params.refs_deep_max(file)?.saturating_add(1);

		let links = PageLinks { site: self, page: file };
		let rendered = render_markdown(content, &links)?;
		let refs = build_section_index(&rendered.headings, 1..refs_max);

		let body = match &self.config.body_class {
			Some(class) => format!("<div class=\"{class}\">{}</div>", rendered.html),
			None => rendered.html,
		};

		let template_name = params
			.theme()
			.unwrap_or(self.config.default_template.as_str());
		let template = self.env.get_template(template_name).map_err(|e| {
			SiteError::TemplateRender {
				page: file.to_string(),
				reason: e.to_string(),
			}
		})?;

		let time = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0.0, |duration| duration.as_secs_f64());

		let ctx = context! {
			body => Value::from_safe_string(body),
			refs => Value::from_safe_string(refs),
			nav => Value::from_safe_string(self.create_nav(file)?),
			title => self.create_title(key),
			src_path => file,
			time => time,
			main_class => params.main_class(),
			site_title => self.config.title.as_str(),
			params => params.clone(),
		};

		template.render(ctx).map_err(|e| {
			SiteError::TemplateRender {
				page: file.to_string(),
				reason: e.to_string(),
			}
		})
	}

	/// Page title: the site title followed by the page's `title` or `name`.
	/// Without a site title only the page part is used.
	pub fn create_title(&self, key: &str) -> String {
		let site_title = self.config.title.as_str();
		let page_title = self
			.pages
			.get(key)
			.and_then(|params| params.title().or_else(|| params.name()));

		match page_title {
			Some(page_title) if site_title.is_empty() => page_title.to_string(),
			Some(page_title) => format!("{site_title}: {page_title}"),
			None => site_title.to_string(),
		}
	}

	/// Breadcrumb navigation for the page at `file`.
	///
	/// Segments start at `nav_begin`. Each segment shows the `name` of the page
	/// at that path when there is one, and intermediate segments that are
	/// pages link to them.
	pub fn create_nav(&self, file: &str) -> SiteResult<String> {
		let key = page_key(file).unwrap_or(file);
		let segments: Vec<&str> = key.split('/').filter(|segment| !segment.is_empty()).collect();
		let mut entries = Vec::new();

		for idx in self.config.nav_begin..segments.len() {
			let path = segments[..=idx].join("/");
			let params = self.pages.get(&path);
			let name = params
				.and_then(PageParams::name)
				.unwrap_or(segments[idx]);

			let entry = if idx == segments.len() - 1 || params.is_none() {
				name.to_string()
			} else {
				format!("<a href=\"{}\">{name}</a>", self.make_url(&path)?)
			};
			entries.push(format!("<li>{entry}</li>"));
		}

		Ok(format!(
			"<ul>{}</ul>",
			entries.join("<li class=\"nav-spliter\">/</li>")
		))
	}

	/// URL prefix: the absolute build directory for development builds, the
	/// configured `base_url` for release builds.
	pub fn base_url(&self) -> String {
		if !self.config.release {
			let build = std::path::absolute(&self.config.build)
				.unwrap_or_else(|_| self.config.build.clone());
			return build.to_string_lossy().replace('\\', "/");
		}

		self.config.base_url.clone().unwrap_or_default()
	}

	/// Compute the URL of a source-relative link.
	///
	/// Pages (no extension or `.md`) map to `.{extension}` URLs in development
	/// builds or when `url_with_ext` is set, and to directory URLs ending in
	/// `/` otherwise. Other files keep their path. A `#fragment` or `?query`
	/// suffix is carried over. The target must exist in the source tree.
	pub fn make_url(&self, link: &str) -> SiteResult<String> {
		let base = self.base_url();
		let base = base.trim_end_matches('/');

		let split = link.find(['#', '?']).unwrap_or(link.len());
		let (path, suffix) = link.split_at(split);
		let path = normalize_path(path);

		if path.is_empty() {
			return Ok(format!("{base}/{suffix}"));
		}

		let extension = Path::new(&path)
			.extension()
			.and_then(|extension| extension.to_str())
			.map(str::to_ascii_lowercase);

		let (url_path, source_path) = match extension.as_deref() {
			None => (path.clone(), format!("{path}.md")),
			Some("md") => (path[..path.len() - 3].to_string(), path.clone()),
			Some(_) => (path.clone(), path.clone()),
		};

		let target = self.config.source.join(&source_path);
		if !target.is_file() {
			return Err(SiteError::UnresolvedLink {
				link: link.to_string(),
				page: String::new(),
				target: target.display().to_string(),
			});
		}

		let url = match extension.as_deref() {
			None | Some("md") if !self.config.release || self.config.url_with_ext => {
				format!("{base}/{url_path}.{}", self.config.extension)
			}
			None | Some("md") => format!("{base}/{url_path}/"),
			Some(_) => format!("{base}/{url_path}"),
		};

		Ok(format!("{url}{suffix}"))
	}
}

/// Resolves the links of a single page through [`Site::make_url`].
struct PageLinks<'a> {
	site: &'a Site,
	page: &'a str,
}

impl LinkResolver for PageLinks<'_> {
	fn resolve(&self, link: &str) -> SiteResult<String> {
		self.site.make_url(link).map_err(|e| {
			match e {
				SiteError::UnresolvedLink { link, target, .. } => {
					SiteError::UnresolvedLink {
						link,
						page: self.page.to_string(),
						target,
					}
				}
				other => other,
			}
		})
	}
}

/// Page key for a markdown file: the path without its `.md` extension.
fn page_key(file: &str) -> Option<&str> {
	let split = file.len().checked_sub(3)?;
	if !file.is_char_boundary(split) {
		return None;
	}

	let (key, extension) = file.split_at(split);
	extension.eq_ignore_ascii_case(".md").then_some(key)
}

/// Collapse empty and `.` segments and resolve `..` in a `/` separated path.
/// The result has no leading or trailing slash.
fn normalize_path(path: &str) -> String {
	let mut segments: Vec<&str> = Vec::new();

	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				segments.pop();
			}
			_ => segments.push(segment),
		}
	}

	segments.join("/")
}

fn is_hidden_name(name: &str) -> bool {
	name.starts_with('.') || name.starts_with('_')
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SiteResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			SiteError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| SiteError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	exclude: &Gitignore,
	dirs: &mut Vec<String>,
	files: &mut Vec<String>,
) -> SiteResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			tracing::warn!(path = %path.display(), "skipping entry with a non UTF-8 name");
			continue;
		};
		if is_hidden_name(name) {
			continue;
		}

		let is_dir = path.is_dir();
		if exclude.matched(&path, is_dir).is_ignore() {
			tracing::debug!(path = %path.display(), "excluded");
			continue;
		}

		let Ok(relative) = path.strip_prefix(root) else {
			continue;
		};
		let relative = relative.to_string_lossy().replace('\\', "/");

		if is_dir {
			dirs.push(relative);
			walk_dir(root, &path, exclude, dirs, files)?;
		} else {
			files.push(relative);
		}
	}

	Ok(())
}
