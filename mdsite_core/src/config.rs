use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SiteError;
use crate::SiteResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdsite.toml", ".mdsite.toml", ".config/mdsite.toml"];

/// Configuration loaded from an `mdsite.toml` file.
///
/// ```toml
/// title = "Lexbor"
/// source = "src"
/// build = "build"
/// theme = "theme"
/// nav_begin = 1
/// url_with_ext = false
/// base_url = "https://example.com/docs"
/// default_template = "main.html"
/// extension = "html"
/// body_class = "markdown-body"
///
/// [exclude]
/// patterns = ["drafts/", "*.tmp"]
/// ```
///
/// Relative directories are resolved against the directory holding the
/// config file (the project root).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
	/// Site title, used as the prefix of every page title.
	pub title: String,
	/// Directory holding the markdown sources and static files.
	pub source: PathBuf,
	/// Output directory. It is removed and recreated on every build.
	pub build: PathBuf,
	/// Directory holding the minijinja templates.
	pub theme: PathBuf,
	/// Index of the first path segment shown in the breadcrumb navigation.
	pub nav_begin: usize,
	/// Keep the `.html` extension in page URLs for release builds.
	pub url_with_ext: bool,
	/// URL prefix for release builds.
	pub base_url: Option<String>,
	/// Template used by pages that don't set a `theme` parameter.
	pub default_template: String,
	/// Extension of generated pages.
	pub extension: String,
	/// When set, the rendered body is wrapped in `<div class="…">`.
	pub body_class: Option<String>,
	/// Gitignore-style patterns for source entries to leave out.
	pub exclude: ExcludeConfig,
	/// Release builds use `base_url` and directory-style URLs. Set from the
	/// command line, never from the file.
	#[serde(skip)]
	pub release: bool,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			title: String::new(),
			source: PathBuf::from("src"),
			build: PathBuf::from("build"),
			theme: PathBuf::from("theme"),
			nav_begin: 1,
			url_with_ext: false,
			base_url: None,
			default_template: "main.html".to_string(),
			extension: "html".to_string(),
			body_class: None,
			exclude: ExcludeConfig::default(),
			release: false,
		}
	}
}

/// Configuration for excluding source entries from the build.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Patterns relative to the source directory, in `.gitignore` syntax.
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl SiteConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SiteResult<Option<SiteConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Load the discovered config, falling back to defaults.
	pub fn load_or_default(root: &Path) -> SiteResult<SiteConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn from_toml(content: &str) -> SiteResult<SiteConfig> {
		toml::from_str(content).map_err(|e| SiteError::ConfigParse(e.to_string()))
	}

	/// Return a copy with `source`, `build` and `theme` made relative to
	/// `root` (absolute paths are kept as they are).
	#[must_use]
	pub fn rooted_at(mut self, root: &Path) -> SiteConfig {
		self.source = root.join(&self.source);
		self.build = root.join(&self.build);
		self.theme = root.join(&self.theme);
		self
	}
}
