#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn mdsite_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdsite"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A project with two pages, one static file and a single template.
pub fn write_project(root: &Path) -> std::io::Result<()> {
	write_file(
		&root.join("src/index.md"),
		"[title]: <> \"Home\"\n\n# Welcome\n\nSee [the guide](guide/intro.md).\n",
	)?;
	write_file(
		&root.join("src/guide/intro.md"),
		"# Intro\n\n## Parsing\n\n```c\nlxb_status_t status = lxb_html_parse(doc);\n```\n",
	)?;
	write_file(&root.join("src/css/site.css"), "body { margin: 0; }\n")?;
	write_file(
		&root.join("theme/main.html"),
		"<title>{{ title }}</title>\n<aside>{{ refs }}</aside>\n<main>{{ body }}</main>\n",
	)?;
	Ok(())
}
