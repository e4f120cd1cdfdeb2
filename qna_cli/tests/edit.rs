mod common;

use common::FAQ;
use qna_core::AnyEmptyResult;
use serde_json::Value;
use similar_asserts::assert_eq;

fn project_with_faq() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("faq.qna"), FAQ)?;
	Ok(tmp)
}

#[test]
fn pair_prints_empty_skeleton() {
	common::qna_cmd()
		.arg("pair")
		.assert()
		.success()
		.stdout("# ? \n```\n\n```\n");
}

#[test]
fn pair_with_question_and_answer() {
	common::qna_cmd()
		.args(["pair", "--question", "Who are you?", "--answer", "A bot."])
		.assert()
		.success()
		.stdout("# ? Who are you?\n```\nA bot.\n```\n");
}

#[test]
fn list_sections() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["list", "faq.qna", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("faq.qna 2 section(s), 0 directive(s)"))
		.stdout(predicates::str::contains("  0. ? who is the ceo?"))
		.stdout(predicates::str::contains("  1. ? get me your ceo info?"))
		.stdout(predicates::str::contains("    Use the REST api."));

	Ok(())
}

#[test]
fn list_json() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	let output = common::qna_cmd()
		.args(["list", "faq.qna", "--format", "json", "--path"])
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["id"], "faq.qna");
	assert_eq!(value["content"], FAQ);
	assert_eq!(value["qnaSections"][1]["answer"], "Use the REST api.");
	assert_eq!(
		value["qnaSections"][0]["questions"][1]["content"],
		"get me your ceo info?"
	);

	Ok(())
}

#[test]
fn add_prints_new_content() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	let output = common::qna_cmd()
		.args(["add", "faq.qna", "-q", "New?", "-q", "Also new?", "-a", "Yes."])
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	assert_eq!(
		String::from_utf8(output.stdout)?,
		format!("{FAQ}\n# ? New?\n- Also new?\n```\nYes.\n```")
	);
	assert_eq!(std::fs::read_to_string(tmp.path().join("faq.qna"))?, FAQ);

	Ok(())
}

#[test]
fn add_write_at_index() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["add", "faq.qna", "-q", "First?", "-a", "Yes.", "--index", "0", "--write"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated faq.qna"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("faq.qna"))?,
		format!("# ? First?\n```\nYes.\n```\n\n{FAQ}")
	);

	Ok(())
}

#[test]
fn add_rejects_negative_index() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["add", "faq.qna", "-q", "x", "--index", "-1"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("qna::out_of_range"));

	Ok(())
}

#[test]
fn add_diff_shows_inserted_lines() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["add", "faq.qna", "-q", "New?", "-a", "Yes.", "--diff"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("+# ? New?\n"))
		.stdout(predicates::str::contains(" # ? who is the ceo?\n"));

	Ok(())
}

#[test]
fn remove_write() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["remove", "faq.qna", "--index", "0", "--write"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("faq.qna"))?,
		"# ? How do I update my KB?\n```\nUse the REST api.\n```\n"
	);

	Ok(())
}

#[test]
fn remove_missing_index_fails() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["remove", "faq.qna", "--index", "5"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("qna::section_index"));

	Ok(())
}

#[test]
fn update_answer_write() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args([
			"update",
			"faq.qna",
			"--index",
			"0",
			"--answer",
			"Satya Nadella.",
			"--write",
		])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("faq.qna"))?,
		FAQ.replace("Sorry, I don't know.", "Satya Nadella.")
	);

	Ok(())
}

#[test]
fn update_questions() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args([
			"update",
			"faq.qna",
			"--index",
			"0",
			"--set-question",
			"0=Who runs the company?",
			"--remove-question",
			"1",
			"--add-question",
			"Who is in charge?",
		])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::starts_with(
			"# ? Who runs the company?\n- Who is in charge?\n```\nSorry, I don't know.\n```\n\n# ? How",
		));

	Ok(())
}

#[test]
fn update_unknown_question_index_fails() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["update", "faq.qna", "--index", "1", "--remove-question", "3"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("has no question at index 3"));

	Ok(())
}

#[test]
fn update_rejects_malformed_question_edit() -> AnyEmptyResult {
	let tmp = project_with_faq()?;

	common::qna_cmd()
		.args(["update", "faq.qna", "--index", "0", "--set-question", "no-index"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("expected `INDEX=TEXT`"));

	Ok(())
}

#[test]
fn missing_file_is_an_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::qna_cmd()
		.args(["list", "missing.qna", "--path"])
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}
