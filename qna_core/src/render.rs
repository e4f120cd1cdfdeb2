/// The smallest fence that can hold an answer.
const MIN_FENCE: usize = 3;

/// Render the canonical text of a single section: a `# ?` heading with the
/// question, followed by a fenced block holding the answer.
///
/// ```rust
/// use qna_core::generate_qna_pair;
///
/// assert_eq!(
/// 	generate_qna_pair("Who are you?", "A bot."),
/// 	"# ? Who are you?\n```\nA bot.\n```"
/// );
/// // Empty skeleton, used as a placeholder for new sections.
/// assert_eq!(generate_qna_pair("", ""), "# ? \n```\n\n```");
/// ```
pub fn generate_qna_pair(question: &str, answer: &str) -> String {
	render_section(&[question], answer)
}

/// Render a section with any number of question variants. The first
/// question becomes the `# ?` heading and the rest are `- ` bullets. An empty
/// list renders a single empty heading so the result is still a section.
///
/// Questions are trimmed and runs of whitespace, line breaks included,
/// collapse to a single space. The answer is written verbatim, inside a fence
/// long enough that no line of the answer can close it.
pub fn render_section<Q: AsRef<str>>(questions: &[Q], answer: &str) -> String {
	let fence = "`".repeat(fence_length(answer));
	let mut output = String::with_capacity(answer.len() + 16);

	match questions.split_first() {
		Some((first, rest)) => {
			output.push_str("# ? ");
			output.push_str(&single_line(first.as_ref()));
			output.push('\n');

			for question in rest {
				output.push_str("- ");
				output.push_str(&single_line(question.as_ref()));
				output.push('\n');
			}
		}
		None => output.push_str("# ? \n"),
	}

	output.push_str(&fence);
	output.push('\n');
	output.push_str(answer);
	output.push('\n');
	output.push_str(&fence);

	output
}

fn single_line(question: &str) -> String {
	question.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One more backtick than the longest backtick run that starts a line of the
/// answer, and never fewer than three.
fn fence_length(answer: &str) -> usize {
	let longest = answer
		.lines()
		.map(|line| line.trim_start().chars().take_while(|ch| *ch == '`').count())
		.max()
		.unwrap_or(0);

	if longest >= MIN_FENCE {
		longest + 1
	} else {
		MIN_FENCE
	}
}

/// The line terminator used by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
	Lf,
	Crlf,
}

impl LineEnding {
	/// `Crlf` when the content already contains `\r\n`, `Lf` otherwise.
	pub fn detect(content: &str) -> Self {
		if content.contains("\r\n") {
			Self::Crlf
		} else {
			Self::Lf
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lf => "\n",
			Self::Crlf => "\r\n",
		}
	}

	/// Rewrite every line terminator in `text` to this ending.
	pub fn apply(self, text: &str) -> String {
		let text = text.replace("\r\n", "\n");

		match self {
			Self::Lf => text,
			Self::Crlf => text.replace('\n', "\r\n"),
		}
	}
}
