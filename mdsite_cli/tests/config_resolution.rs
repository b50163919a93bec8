mod common;

use mdsite_core::AnyEmptyResult;

fn built_title(root: &std::path::Path) -> std::io::Result<String> {
	let index = std::fs::read_to_string(root.join("build/index.html"))?;
	Ok(index.lines().next().unwrap_or_default().to_string())
}

#[test]
fn build_resolves_dot_mdsite_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join(".mdsite.toml"), "title = \"Dot\"\n")?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(built_title(tmp.path())?, "<title>Dot: Home</title>");

	Ok(())
}

#[test]
fn build_resolves_dot_config_mdsite_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	common::write_file(
		&tmp.path().join(".config/mdsite.toml"),
		"title = \"Nested\"\n",
	)?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(built_title(tmp.path())?, "<title>Nested: Home</title>");

	Ok(())
}

#[test]
fn build_prefers_mdsite_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("mdsite.toml"), "title = \"Root\"\n")?;
	std::fs::write(tmp.path().join(".mdsite.toml"), "title = \"Dot\"\n")?;
	common::write_file(
		&tmp.path().join(".config/mdsite.toml"),
		"title = \"Nested\"\n",
	)?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(built_title(tmp.path())?, "<title>Root: Home</title>");

	Ok(())
}

#[test]
fn build_without_config_uses_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::mdsite_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(built_title(tmp.path())?, "<title>Home</title>");

	Ok(())
}
