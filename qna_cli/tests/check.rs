mod common;

use qna_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn check_passes_for_clean_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("faq.qna"), common::FAQ)?;

	common::qna_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 1 file(s), no problems found.",
		));

	Ok(())
}

#[test]
fn check_reports_diagnostics() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("faq.qna"),
		"# ? q\nstray\n```\na\n```\n",
	)?;

	common::qna_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("faq.qna:2:1"))
		.stderr(predicates::str::contains("qna::unrecognized_line"))
		.stderr(predicates::str::contains(
			"Check failed: 1 problem(s) in 1 file(s).",
		));

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("clean.qna"), common::FAQ)?;
	std::fs::write(tmp.path().join("orphan.qna"), "```\nno question\n```\n")?;

	let output = common::qna_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));

	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], false);
	assert_eq!(value["files"][0]["file"], "clean.qna");
	assert_eq!(value["files"][0]["sections"], 2);
	assert_eq!(value["files"][1]["file"], "orphan.qna");
	assert_eq!(value["files"][1]["diagnostics"][0]["kind"], "orphan_answer");

	Ok(())
}

#[test]
fn check_github_annotations() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("faq.qna"), "## Title\n# ? q\n```\na\n```\n")?;

	common::qna_cmd()
		.arg("check")
		.arg("--format")
		.arg("github")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"::warning file=faq.qna,line=1,col=1::",
		))
		.stdout(predicates::str::contains("(unrecognized_heading)"));

	Ok(())
}

#[test]
fn check_honors_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("vendor"))?;
	std::fs::write(
		tmp.path().join("vendor/broken.qna"),
		"```\nno question\n```\n",
	)?;
	std::fs::write(tmp.path().join("faq.qna"), "# ? q\nstray\n```\na\n```\n")?;
	std::fs::write(
		tmp.path().join("qna.toml"),
		"[exclude]\npatterns = [\"vendor/\"]\n\n[check]\nignore = [\"unrecognized_line\"]\n",
	)?;

	common::qna_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 file(s), no problems found."));

	Ok(())
}

#[test]
fn check_rejects_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("qna.toml"), "max_file_size = \"big\"\n")?;

	common::qna_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("qna::config_parse"));

	Ok(())
}
