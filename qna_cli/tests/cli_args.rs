use clap::Parser;
use qna_cli::Commands;
use qna_cli::QnaCli;
use qna_cli::QuestionEdit;
use qna_cli::parse_question_edit;
use rstest::rstest;

#[test]
fn parse_update_arguments() -> Result<(), clap::Error> {
	let cli = QnaCli::try_parse_from([
		"qna",
		"update",
		"faq.qna",
		"--index",
		"2",
		"--set-question",
		"1=Who?",
		"--add-question",
		"a",
		"--add-question",
		"b",
		"--diff",
	])?;

	let Some(Commands::Update(update)) = cli.command else {
		panic!("expected the update command");
	};
	assert_eq!(update.index, 2);
	assert_eq!(
		update.set_questions,
		vec![QuestionEdit {
			index: 1,
			text: "Who?".to_string(),
		}]
	);
	assert_eq!(update.add_questions, vec!["a", "b"]);
	assert!(update.output.diff);
	assert!(!update.output.write);

	Ok(())
}

#[test]
fn write_conflicts_with_diff() {
	let result = QnaCli::try_parse_from(["qna", "remove", "faq.qna", "--index", "0", "--write", "--diff"]);

	assert!(result.is_err());
}

#[rstest]
#[case::simple("0=Hello", 0, "Hello")]
#[case::equals_in_text("3=a = b", 3, "a = b")]
#[case::empty_text("1=", 1, "")]
fn question_edit_values(#[case] value: &str, #[case] index: usize, #[case] text: &str) {
	assert_eq!(
		parse_question_edit(value),
		Ok(QuestionEdit {
			index,
			text: text.to_string(),
		})
	);
}

#[rstest]
#[case::missing_separator("hello")]
#[case::bad_index("x=hello")]
fn invalid_question_edit_values(#[case] value: &str) {
	assert!(parse_question_edit(value).is_err());
}
