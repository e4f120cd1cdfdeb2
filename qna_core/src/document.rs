use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::ops::Range;

use derive_more::Deref;
use derive_more::Display;
use derive_more::From;
use serde::Deserialize;
use serde::Serialize;

use crate::Directive;
use crate::ParseDiagnostic;
use crate::Position;
use crate::QnaError;
use crate::QnaResult;

/// Identifier of a section within a single parse result.
///
/// Ids are derived from the section's offset and text, so re-parsing the
/// same content yields the same ids. Any edit that moves or changes a section
/// gives it a new id: always read ids from the document returned by the
/// latest operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, Display, From)]
#[serde(transparent)]
pub struct SectionId(String);

/// Identifier of a question variant within a single parse result. Shares the
/// lifetime rules of [`SectionId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, Display, From)]
#[serde(transparent)]
pub struct QuestionId(String);

impl SectionId {
	pub(crate) fn derive(offset: usize, body: &str) -> Self {
		Self(derive_id("s", offset, body))
	}
}

impl QuestionId {
	pub(crate) fn derive(offset: usize, content: &str) -> Self {
		Self(derive_id("q", offset, content))
	}
}

fn derive_id(prefix: &str, offset: usize, text: &str) -> String {
	let mut hasher = DefaultHasher::new();
	offset.hash(&mut hasher);
	text.hash(&mut hasher);

	format!("{prefix}{:016x}", hasher.finish())
}

/// One phrasing of the question answered by a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
	pub id: QuestionId,
	/// The question text without heading or bullet markers.
	pub content: String,
}

/// One question group with its answer: the unit of editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnASection {
	pub section_id: SectionId,
	/// The verbatim source from the first question line to the end of the
	/// answer fence, without the final line terminator.
	pub body: String,
	pub questions: Vec<Question>,
	/// The text between the answer fences with the fence indentation
	/// removed.
	pub answer: String,
	/// Byte range of the whole span, including trailing blank or inert lines
	/// up to the next section or directive.
	pub range: Range<usize>,
	/// Byte range of [`body`](QnASection::body).
	pub body_range: Range<usize>,
	/// Position of [`body`](QnASection::body).
	pub position: Position,
}

impl QnASection {
	pub fn question(&self, id: &QuestionId) -> Option<&Question> {
		self.questions.iter().find(|question| &question.id == id)
	}

	/// The question contents in written order.
	pub fn question_contents(&self) -> Vec<&str> {
		self.questions
			.iter()
			.map(|question| question.content.as_str())
			.collect()
	}
}

/// A parsed QnA document.
///
/// A `QnAFile` is an immutable snapshot: [`content`](QnAFile::content) is the
/// exact text that was parsed and every other field is derived from it. Edit
/// operations such as [`add_section`](crate::add_section) never modify a
/// file in place. They splice `content` and parse the result again, so the
/// returned value is always consistent with its own text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnAFile {
	/// Caller supplied identifier, carried through every edit unchanged.
	pub id: String,
	pub content: String,
	pub qna_sections: Vec<QnASection>,
	pub directives: Vec<Directive>,
	pub diagnostics: Vec<ParseDiagnostic>,
	/// Byte range of the text before the first section or directive line.
	pub preamble_range: Range<usize>,
}

impl QnAFile {
	pub fn section(&self, id: &SectionId) -> Option<&QnASection> {
		self.qna_sections
			.iter()
			.find(|section| &section.section_id == id)
	}

	pub fn section_index(&self, id: &SectionId) -> Option<usize> {
		self.qna_sections
			.iter()
			.position(|section| &section.section_id == id)
	}

	/// Like [`section`](QnAFile::section) but reports a missing id as an
	/// error.
	pub fn require_section(&self, id: &SectionId) -> QnaResult<&QnASection> {
		self.section(id)
			.ok_or_else(|| QnaError::SectionNotFound(id.to_string()))
	}

	pub fn section_at(&self, index: usize) -> QnaResult<&QnASection> {
		self.qna_sections
			.get(index)
			.ok_or(QnaError::SectionIndex {
				index,
				count: self.qna_sections.len(),
			})
	}

	/// The text before the first section or directive line.
	pub fn preamble(&self) -> &str {
		&self.content[self.preamble_range.clone()]
	}

	/// True when parsing produced no diagnostics.
	pub fn is_clean(&self) -> bool {
		self.diagnostics.is_empty()
	}
}
