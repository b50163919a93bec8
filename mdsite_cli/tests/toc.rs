mod common;

use mdsite_core::AnyEmptyResult;
use rstest::rstest;

const PAGE: &str = "# A\n\n## B\n\n### C\n\n## D\n";

#[test]
fn toc_prints_nested_index() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("page.md");
	std::fs::write(&file, PAGE)?;

	common::mdsite_cmd()
		.arg("toc")
		.arg(&file)
		.assert()
		.success()
		.stdout(
			"<ul class=\"nav-level-1\">\n<li><a href=\"#a\">A</a>\n<ul \
			 class=\"nav-level-2\">\n<li><a href=\"#b\">B</a>\n<ul \
			 class=\"nav-level-3\">\n<li><a href=\"#c\">C</a>\n</ul>\n<li><a \
			 href=\"#d\">D</a>\n</ul>\n</ul>\n",
		);

	Ok(())
}

#[rstest]
#[case::second_level("2", "2", "<ul class=\"nav-level-2\">\n<li><a href=\"#b\">B</a>\n<li><a \
                                href=\"#d\">D</a>\n</ul>\n")]
#[case::nothing_in_range("4", "6", "No headings between levels 4 and 6.\n")]
fn toc_level_window(#[case] from: &str, #[case] to: &str, #[case] expected: &str) {
	common::mdsite_cmd()
		.arg("toc")
		.arg("--from")
		.arg(from)
		.arg("--to")
		.arg(to)
		.write_stdin(PAGE)
		.assert()
		.success()
		.stdout(expected.to_string());
}

#[test]
fn toc_ignores_unresolvable_links() {
	common::mdsite_cmd()
		.arg("toc")
		.write_stdin("# Title\n\nSee [elsewhere](missing.md).\n")
		.assert()
		.success()
		.stdout("<ul class=\"nav-level-1\">\n<li><a href=\"#title\">Title</a>\n</ul>\n");
}
