use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;

use crate::LineEnding;
use crate::QnAFile;
use crate::QnASection;
use crate::QnaError;
use crate::QnaResult;
use crate::QuestionId;
use crate::SectionId;
use crate::parse;
use crate::render_section;

/// A change to a single question of a section.
///
/// - `id` and non-blank `content`: replace the text of that question.
/// - `id` with missing or blank `content`: delete that question.
/// - no `id`: append `content` as a new question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionChange {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<QuestionId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl QuestionChange {
	pub fn update(id: QuestionId, content: impl Into<String>) -> Self {
		Self {
			id: Some(id),
			content: Some(content.into()),
		}
	}

	pub fn remove(id: QuestionId) -> Self {
		Self {
			id: Some(id),
			content: None,
		}
	}

	pub fn add(content: impl Into<String>) -> Self {
		Self {
			id: None,
			content: Some(content.into()),
		}
	}
}

/// Partial changes to a section. Questions that aren't mentioned and an
/// absent answer are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnASectionChanges {
	/// Applied in order against the current questions of the section.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub questions: Vec<QuestionChange>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub answer: Option<String>,
}

impl QnASectionChanges {
	#[must_use]
	pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
		self.answer = Some(answer.into());
		self
	}

	#[must_use]
	pub fn with_question(mut self, change: QuestionChange) -> Self {
		self.questions.push(change);
		self
	}
}

/// Append `section_text` after the last section, separated from it by one
/// blank line. Without sections the text is appended to the end of the
/// document.
#[instrument(level = "debug", skip_all, fields(file = %file.id))]
pub fn add_section(file: &QnAFile, section_text: &str) -> QnAFile {
	let at = file
		.qna_sections
		.last()
		.map_or(file.content.len(), |section| section.range.end);

	reparse(
		file,
		splice_section(&file.content, at, section_text, Separator::BlankLine),
	)
}

/// Insert `section_text` right before the section currently at `index`. An
/// index past the last section behaves like [`add_section`].
///
/// Returns [`QnaError::OutOfRange`] for a negative index.
#[instrument(level = "debug", skip_all, fields(file = %file.id, index = index))]
pub fn insert_section(file: &QnAFile, index: isize, section_text: &str) -> QnaResult<QnAFile> {
	let Ok(position) = usize::try_from(index) else {
		return Err(QnaError::OutOfRange { index });
	};

	let Some(section) = file.qna_sections.get(position) else {
		tracing::debug!("index is past the last section, appending instead");
		return Ok(add_section(file, section_text));
	};

	Ok(reparse(
		file,
		splice_section(
			&file.content,
			section.range.start,
			section_text,
			Separator::LineBreak,
		),
	))
}

/// Delete the body of a section together with its line break and one
/// following blank line. An unknown id leaves the content unchanged.
#[instrument(level = "debug", skip_all, fields(file = %file.id, section = %section_id))]
pub fn remove_section(file: &QnAFile, section_id: &SectionId) -> QnAFile {
	let Some(section) = find_section(file, section_id) else {
		return reparse(file, file.content.clone());
	};

	let end = removal_end(&file.content, section.body_range.end);

	reparse(
		file,
		splice(&file.content, section.body_range.start..end, ""),
	)
}

/// Replace the body of a section with `section_text`, verbatim. An unknown
/// id leaves the content unchanged.
#[instrument(level = "debug", skip_all, fields(file = %file.id, section = %section_id))]
pub fn update_section(file: &QnAFile, section_id: &SectionId, section_text: &str) -> QnAFile {
	let Some(section) = find_section(file, section_id) else {
		return reparse(file, file.content.clone());
	};

	reparse(
		file,
		splice(&file.content, section.body_range.clone(), section_text),
	)
}

/// Apply question and answer changes to a section and write it back in its
/// canonical form, with the line ending of the document. See
/// [`QuestionChange`] for how questions are matched. Unknown section or
/// question ids are skipped.
#[instrument(level = "debug", skip_all, fields(file = %file.id, section = %section_id))]
pub fn update_qna_section(
	file: &QnAFile,
	section_id: &SectionId,
	changes: &QnASectionChanges,
) -> QnAFile {
	let Some(section) = find_section(file, section_id) else {
		return reparse(file, file.content.clone());
	};

	let questions = resolve_questions(section, &changes.questions);
	let answer = changes.answer.as_deref().unwrap_or(&section.answer);
	let body = LineEnding::detect(&file.content).apply(&render_section(&questions, answer));

	reparse(
		file,
		splice(&file.content, section.body_range.clone(), &body),
	)
}

/// Replace the text of one question. Blank `content` deletes it.
pub fn update_qna_question(
	file: &QnAFile,
	section_id: &SectionId,
	question_id: &QuestionId,
	content: &str,
) -> QnAFile {
	let changes = QnASectionChanges::default()
		.with_question(QuestionChange::update(question_id.clone(), content));

	update_qna_section(file, section_id, &changes)
}

fn reparse(file: &QnAFile, content: String) -> QnAFile {
	parse(file.id.clone(), content)
}

fn find_section<'f>(file: &'f QnAFile, section_id: &SectionId) -> Option<&'f QnASection> {
	let section = file.section(section_id);

	if section.is_none() {
		tracing::debug!(%section_id, "section not found, keeping content unchanged");
	}

	section
}

fn resolve_questions(section: &QnASection, changes: &[QuestionChange]) -> Vec<String> {
	let mut questions: Vec<(Option<&QuestionId>, String)> = section
		.questions
		.iter()
		.map(|question| (Some(&question.id), question.content.clone()))
		.collect();

	for change in changes {
		let content = change
			.content
			.as_deref()
			.map(str::trim)
			.filter(|content| !content.is_empty());

		match (&change.id, content) {
			(Some(id), Some(content)) => {
				match questions
					.iter_mut()
					.find(|(existing, _)| *existing == Some(id))
				{
					Some(entry) => entry.1 = content.to_string(),
					None => tracing::debug!(question = %id, "question not found, skipping update"),
				}
			}
			(Some(id), None) => {
				let count = questions.len();
				questions.retain(|(existing, _)| *existing != Some(id));

				if questions.len() == count {
					tracing::debug!(question = %id, "question not found, skipping removal");
				}
			}
			(None, Some(content)) => questions.push((None, content.to_string())),
			(None, None) => {}
		}
	}

	questions
		.into_iter()
		.map(|(_, content)| content)
		.collect()
}

#[derive(Clone, Copy)]
enum Separator {
	/// Start the inserted text on its own line.
	LineBreak,
	/// Leave one blank line before the inserted text.
	BlankLine,
}

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
	let mut output = String::with_capacity(content.len() + replacement.len());
	output.push_str(&content[..range.start]);
	output.push_str(replacement);
	output.push_str(&content[range.end..]);
	output
}

/// Insert `text` at `at`, keeping it on its own lines and separated from
/// whatever follows by one blank line.
fn splice_section(content: &str, at: usize, text: &str, before: Separator) -> String {
	let eol = LineEnding::detect(content).as_str();
	let (head, tail) = content.split_at(at);
	let mut output = String::with_capacity(content.len() + text.len() + 4 * eol.len());
	output.push_str(head);

	if !head.is_empty() {
		match before {
			Separator::LineBreak => push_line_break(&mut output, eol),
			Separator::BlankLine => push_blank_line(&mut output, eol),
		}
	}

	output.push_str(text);

	if !tail.is_empty() {
		push_blank_line(&mut output, eol);
	}

	output.push_str(tail);
	output
}

fn push_line_break(output: &mut String, eol: &str) {
	if !output.ends_with('\n') {
		output.push_str(eol);
	}
}

fn push_blank_line(output: &mut String, eol: &str) {
	push_line_break(output, eol);

	if !ends_with_blank_line(output) {
		output.push_str(eol);
	}
}

/// Whether the last complete line of `text` is blank.
fn ends_with_blank_line(text: &str) -> bool {
	let Some(rest) = text.strip_suffix('\n') else {
		return false;
	};

	let rest = rest.strip_suffix('\r').unwrap_or(rest);
	let last_line = rest.rfind('\n').map_or(rest, |index| &rest[index + 1..]);

	last_line.trim().is_empty()
}

/// The end of the text removed with a section body: its line break and one
/// following blank line, when present.
fn removal_end(content: &str, body_end: usize) -> usize {
	let rest = &content[body_end..];
	let mut end = body_end + line_break_len(rest);

	let rest = &content[end..];
	let line_len = rest.find('\n').map_or(rest.len(), |index| index + 1);

	if line_len > 0 && rest[..line_len].trim().is_empty() {
		end += line_len;
	}

	end
}

fn line_break_len(text: &str) -> usize {
	if text.starts_with("\r\n") {
		2
	} else {
		usize::from(text.starts_with('\n'))
	}
}
