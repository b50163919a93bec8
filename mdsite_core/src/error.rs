use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SiteError {
	#[error(transparent)]
	#[diagnostic(code(mdsite::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdsite::config_parse),
		help("check that mdsite.toml is valid TOML with top-level site keys and an optional [exclude] section")
	)]
	ConfigParse(String),

	#[error("source directory not found: `{0}`")]
	#[diagnostic(
		code(mdsite::missing_source_dir),
		help("pass `--source <dir>` or set `source` in mdsite.toml")
	)]
	MissingSourceDir(String),

	#[error("unresolved link `{link}` in `{page}`: file not found: `{target}`")]
	#[diagnostic(
		code(mdsite::unresolved_link),
		help("links without a scheme are resolved against the source directory; add the missing file or fix the link")
	)]
	UnresolvedLink {
		link: String,
		page: String,
		target: String,
	},

	#[error("invalid value `{value}` for page parameter `{name}` in `{page}`")]
	#[diagnostic(code(mdsite::invalid_param))]
	InvalidParam {
		name: String,
		value: String,
		page: String,
	},

	#[error("template rendering failed for `{page}`: {reason}")]
	#[diagnostic(
		code(mdsite::template_render),
		help("check that the theme directory contains the template named by the page's `theme` parameter")
	)]
	TemplateRender { page: String, reason: String },
}

pub type SiteResult<T> = Result<T, SiteError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
