mod common;

use mdsite_core::AnyEmptyResult;
use rstest::rstest;

#[test]
fn build_renders_pages_and_copies_static_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("mdsite.toml"), "title = \"Docs\"\n")?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Built 2 page(s) and 1 static file(s)",
		));

	let build = tmp.path().join("build");
	let index = std::fs::read_to_string(build.join("index.html"))?;
	assert!(index.contains("<title>Docs: Home</title>"));
	assert!(index.contains(&format!(
		"href=\"{}/guide/intro.html\"",
		build.display()
	)));

	let intro = std::fs::read_to_string(build.join("guide/intro.html"))?;
	assert!(intro.contains("<span class=\"ffname\">lxb_html_parse</span>"));
	assert!(intro.contains("<ul class=\"nav-level-1\">"));
	assert!(intro.contains("<li><a href=\"#parsing\">Parsing</a>"));

	assert_eq!(
		std::fs::read_to_string(build.join("css/site.css"))?,
		"body { margin: 0; }\n"
	);

	Ok(())
}

#[test]
fn build_verbose_lists_pages() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("guide/intro.html"))
		.stdout(predicates::str::contains("index.html"));

	Ok(())
}

#[rstest]
#[case::directory_urls(&[], "href=\"https://example.com/docs/guide/intro/\"")]
#[case::with_extension(&["--url-with-ext"], "href=\"https://example.com/docs/guide/intro.html\"")]
fn release_build_uses_base_url(#[case] flags: &[&str], #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--release")
		.arg("--base-url")
		.arg("https://example.com/docs")
		.args(flags)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let index = std::fs::read_to_string(tmp.path().join("build/index.html"))?;
	assert!(index.contains(expected), "missing `{expected}` in:\n{index}");

	Ok(())
}

#[test]
fn release_build_reads_base_url_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("mdsite.toml"),
		"base_url = \"https://lexbor.com/docs\"\n",
	)?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--release")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let index = std::fs::read_to_string(tmp.path().join("build/index.html"))?;
	assert!(index.contains("href=\"https://lexbor.com/docs/guide/intro/\""));

	Ok(())
}

#[test]
fn source_and_build_flags_override_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(&tmp.path().join("docs/index.md"), "# Home\n")?;
	common::write_file(&tmp.path().join("theme/main.html"), "{{ body }}")?;
	let out = tmp.path().join("public");

	common::mdsite_cmd()
		.arg("build")
		.arg("--source")
		.arg(tmp.path().join("docs"))
		.arg("--build")
		.arg(&out)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(out.join("index.html").is_file());
	assert!(!tmp.path().join("build").exists());

	Ok(())
}

#[test]
fn unresolved_link_fails_with_diagnostic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(&tmp.path().join("src/index.md"), "[gone](missing.md)\n")?;
	common::write_file(&tmp.path().join("theme/main.html"), "{{ body }}")?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("mdsite::unresolved_link"))
		.stderr(predicates::str::contains("missing.md"));

	Ok(())
}

#[test]
fn missing_source_dir_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("source directory not found"));

	Ok(())
}

#[test]
fn invalid_config_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("mdsite.toml"), "nav_begin = \"one\"\n")?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("mdsite::config_parse"));

	Ok(())
}

#[test]
fn no_subcommand_exits_with_usage_hint() {
	common::mdsite_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("mdsite --help"));
}
