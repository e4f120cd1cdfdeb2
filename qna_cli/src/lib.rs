use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inspect, check and edit QnA documents.",
	long_about = "qna works with QnA documents: markdown-like files made of `# ?` question \
	              headings, `-` question variants and fenced answers, with `> !# @key = value` \
	              directives for file metadata.\n\nQuick start:\n  qna check         Report \
	              problems in every *.qna file\n  qna list FILE     Show the sections of a file\n  \
	              qna add FILE ...  Append a question and answer\n  qna pair          Print an \
	              empty section skeleton"
)]
pub struct QnaCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Relative file arguments are
	/// resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging. `QNA_LOG` overrides the log
	/// filter.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Check every QnA file in the project for problems.
	///
	/// Files are discovered with the `[include]` and `[exclude]` patterns from
	/// `qna.toml` (`**/*.qna` by default). Exits with a non-zero status code if
	/// any diagnostics remain after `[check] ignore` is applied.
	Check {
		/// Output format. Use `text` for human-readable output, `json` for
		/// programmatic consumption, or `github` for GitHub Actions
		/// annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the sections of a file with their ids, questions and answers.
	List {
		file: PathBuf,

		#[arg(long, value_enum, default_value_t = ListOutputFormat::Text)]
		format: ListOutputFormat,
	},
	/// Print a section skeleton for a question and answer.
	Pair {
		#[arg(long, short, default_value = "")]
		question: String,

		#[arg(long, short, default_value = "")]
		answer: String,
	},
	/// Add a section. Appends after the last section unless `--index` is set.
	Add {
		file: PathBuf,

		/// A question variant. Repeat for more variants; the first one becomes
		/// the heading.
		#[arg(long = "question", short)]
		questions: Vec<String>,

		#[arg(long, short, default_value = "")]
		answer: String,

		/// Insert before the section at this index instead of appending.
		#[arg(long, allow_negative_numbers = true)]
		index: Option<isize>,

		#[command(flatten)]
		output: EditOutput,
	},
	/// Remove the section at an index.
	Remove {
		file: PathBuf,

		#[arg(long)]
		index: usize,

		#[command(flatten)]
		output: EditOutput,
	},
	/// Change the questions or answer of the section at an index.
	///
	/// Question edits are applied in order: `--set-question`, then
	/// `--remove-question`, then `--add-question`. Question indices refer to
	/// the section as it is before the update.
	Update(UpdateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
	pub file: PathBuf,

	#[arg(long)]
	pub index: usize,

	/// Replace the answer.
	#[arg(long, short)]
	pub answer: Option<String>,

	/// Append a question variant.
	#[arg(long = "add-question")]
	pub add_questions: Vec<String>,

	/// Remove the question variant at this index.
	#[arg(long = "remove-question")]
	pub remove_questions: Vec<usize>,

	/// Replace a question variant, written as `INDEX=TEXT`. An empty text
	/// removes the variant.
	#[arg(long = "set-question", value_parser = parse_question_edit)]
	pub set_questions: Vec<QuestionEdit>,

	#[command(flatten)]
	pub output: EditOutput,
}

/// Where the result of an edit goes. The new content is printed to stdout
/// unless `--write` or `--diff` is given.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct EditOutput {
	/// Overwrite the file with the edited content.
	#[arg(long, default_value_t = false, conflicts_with = "diff")]
	pub write: bool,

	/// Print a unified diff of the change instead of the new content.
	#[arg(long, default_value_t = false)]
	pub diff: bool,
}

/// A `--set-question` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEdit {
	pub index: usize,
	pub text: String,
}

/// Parse `INDEX=TEXT`.
pub fn parse_question_edit(value: &str) -> Result<QuestionEdit, String> {
	let Some((index, text)) = value.split_once('=') else {
		return Err(format!("expected `INDEX=TEXT`, got `{value}`"));
	};

	let index = index
		.trim()
		.parse()
		.map_err(|e| format!("invalid question index `{index}`: {e}"))?;

	Ok(QuestionEdit {
		index,
		text: text.to_string(),
	})
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` annotations that
	/// appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// The parsed document as JSON.
	Json,
}
