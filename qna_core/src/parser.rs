use std::fmt::Display;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use crate::Directive;
use crate::Point;
use crate::Position;
use crate::QnAFile;
use crate::QnASection;
use crate::Question;
use crate::QuestionId;
use crate::SectionId;
use crate::directive::DirectiveProblem;
use crate::directive::parse_directive_body;
use crate::lexer::tokenize;
use crate::tokens::Line;
use crate::tokens::LineKind;

/// A diagnostic produced during parsing. These are issues that don't prevent
/// parsing from completing but indicate problems in the source content. The
/// document stays fully usable when diagnostics are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ParseDiagnostic {
	/// An answer fence was opened but never closed.
	UnterminatedFence { line: usize, column: usize },
	/// A `#` heading without the `?` question marker.
	UnrecognizedHeading {
		text: String,
		line: usize,
		column: usize,
	},
	/// Text that is neither a question, an answer, a comment nor a
	/// directive.
	UnrecognizedLine {
		text: String,
		line: usize,
		column: usize,
	},
	/// An answer fence with no question above it.
	OrphanAnswer { line: usize, column: usize },
	/// A second answer fence inside one section.
	DuplicateAnswer { line: usize, column: usize },
	/// A `> !#` line without a `key = value` pair.
	MalformedDirective {
		text: String,
		line: usize,
		column: usize,
	},
	/// A `> !#` line with a key that isn't recognized.
	UnknownDirective {
		key: String,
		line: usize,
		column: usize,
	},
}

impl ParseDiagnostic {
	/// A stable snake case identifier, used in config files and output.
	pub fn code(&self) -> &'static str {
		match self {
			Self::UnterminatedFence { .. } => "unterminated_fence",
			Self::UnrecognizedHeading { .. } => "unrecognized_heading",
			Self::UnrecognizedLine { .. } => "unrecognized_line",
			Self::OrphanAnswer { .. } => "orphan_answer",
			Self::DuplicateAnswer { .. } => "duplicate_answer",
			Self::MalformedDirective { .. } => "malformed_directive",
			Self::UnknownDirective { .. } => "unknown_directive",
		}
	}

	pub fn line(&self) -> usize {
		match self {
			Self::UnterminatedFence { line, .. }
			| Self::UnrecognizedHeading { line, .. }
			| Self::UnrecognizedLine { line, .. }
			| Self::OrphanAnswer { line, .. }
			| Self::DuplicateAnswer { line, .. }
			| Self::MalformedDirective { line, .. }
			| Self::UnknownDirective { line, .. } => *line,
		}
	}

	pub fn column(&self) -> usize {
		match self {
			Self::UnterminatedFence { column, .. }
			| Self::UnrecognizedHeading { column, .. }
			| Self::UnrecognizedLine { column, .. }
			| Self::OrphanAnswer { column, .. }
			| Self::DuplicateAnswer { column, .. }
			| Self::MalformedDirective { column, .. }
			| Self::UnknownDirective { column, .. } => *column,
		}
	}

	fn unterminated_fence(line: &Line<'_>) -> Self {
		Self::UnterminatedFence {
			line: line.number,
			column: line.indent_column(),
		}
	}

	fn unrecognized(line: &Line<'_>) -> Self {
		let text = line.text.trim().to_string();
		let (number, column) = (line.number, line.indent_column());

		if matches!(line.kind, LineKind::OtherHeading) {
			Self::UnrecognizedHeading {
				text,
				line: number,
				column,
			}
		} else {
			Self::UnrecognizedLine {
				text,
				line: number,
				column,
			}
		}
	}
}

impl Display for ParseDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnterminatedFence { .. } => write!(f, "answer fence is never closed"),
			Self::UnrecognizedHeading { text, .. } => {
				write!(f, "heading `{text}` is missing the `?` question marker")
			}
			Self::UnrecognizedLine { text, .. } => {
				write!(f, "unrecognized line `{text}` outside of a question or answer")
			}
			Self::OrphanAnswer { .. } => write!(f, "answer fence has no question above it"),
			Self::DuplicateAnswer { .. } => write!(f, "section already has an answer"),
			Self::MalformedDirective { text, .. } => {
				write!(f, "directive `{text}` is not of the form `> !# key = value`")
			}
			Self::UnknownDirective { key, .. } => write!(f, "unknown directive key `{key}`"),
		}
	}
}

/// Parse a QnA document.
///
/// Parsing never fails: malformed syntax is reported through
/// [`QnAFile::diagnostics`] and everything that can be understood is still
/// returned. The `id` is carried through unchanged and `content` is stored
/// verbatim.
pub fn parse(id: impl Into<String>, content: impl Into<String>) -> QnAFile {
	let id = id.into();
	let content = content.into();
	let parts = parse_parts(&content);

	tracing::debug!(
		file = %id,
		sections = parts.sections.len(),
		directives = parts.directives.len(),
		diagnostics = parts.diagnostics.len(),
		"parsed qna file"
	);

	QnAFile {
		id,
		content,
		qna_sections: parts.sections,
		directives: parts.directives,
		diagnostics: parts.diagnostics,
		preamble_range: parts.preamble_range,
	}
}

/// Everything derived from the content of a file.
struct ParsedParts {
	sections: Vec<QnASection>,
	directives: Vec<Directive>,
	diagnostics: Vec<ParseDiagnostic>,
	preamble_range: Range<usize>,
}

fn parse_parts(content: &str) -> ParsedParts {
	let lines = tokenize(content);
	let spans = split_spans(&lines);
	let mut parts = ParsedParts {
		sections: Vec::new(),
		directives: Vec::new(),
		diagnostics: Vec::new(),
		preamble_range: 0..0,
	};

	for span in &spans {
		let span_lines = &lines[span.lines.clone()];
		tracing::trace!(kind = ?span.kind, lines = ?span.lines, "parsing span");

		match span.kind {
			SpanKind::Preamble => {
				parts.preamble_range = byte_range(span_lines);
				parse_inert(span_lines, &mut parts.diagnostics);
			}
			SpanKind::Directive => {
				if let Some(directive) = parse_directive_line(&span_lines[0], &mut parts.diagnostics) {
					parts.directives.push(directive);
				}
				parse_inert(&span_lines[1..], &mut parts.diagnostics);
			}
			SpanKind::Section => {
				let section = parse_section(content, span_lines, &mut parts.diagnostics);
				parts.sections.push(section);
			}
		}
	}

	parts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanKind {
	/// Text before the first section or directive.
	Preamble,
	/// A directive line and any inert lines after it.
	Directive,
	/// Question lines, the answer fence and trailing blank lines.
	Section,
}

/// A contiguous run of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
	pub kind: SpanKind,
	/// Indices into the line list.
	pub lines: Range<usize>,
}

/// Split lines into contiguous spans that cover every line exactly once.
///
/// A directive line always starts a new span. A heading starts a new section
/// unless it directly follows another question line of the same section, so
/// stacked headings and bullet variants share one answer. Any other line ends
/// the question block. Markers inside fences are ignored.
pub(crate) fn split_spans(lines: &[Line<'_>]) -> Vec<Span> {
	let mut spans: Vec<Span> = Vec::new();
	let mut open_fence: Option<usize> = None;
	let mut stacking = false;

	for (index, line) in lines.iter().enumerate() {
		if let Some(ticks) = open_fence {
			if line.kind.closes_fence(ticks) {
				open_fence = None;
			}
			continue;
		}

		match line.kind {
			LineKind::Directive { .. } => {
				open_span(&mut spans, SpanKind::Directive, index);
				stacking = false;
			}
			LineKind::Heading { .. } => {
				if !stacking {
					open_span(&mut spans, SpanKind::Section, index);
					stacking = true;
				}
			}
			LineKind::Bullet { .. } => {}
			LineKind::Fence { ticks, .. } => {
				open_fence = Some(ticks);
				stacking = false;
			}
			_ => stacking = false,
		}
	}

	if let Some(last) = spans.last_mut() {
		last.lines.end = lines.len();
	}

	match spans.first() {
		Some(first) if first.lines.start > 0 => {
			let end = first.lines.start;
			spans.insert(
				0,
				Span {
					kind: SpanKind::Preamble,
					lines: 0..end,
				},
			);
		}
		None if !lines.is_empty() => {
			spans.push(Span {
				kind: SpanKind::Preamble,
				lines: 0..lines.len(),
			});
		}
		_ => {}
	}

	spans
}

fn open_span(spans: &mut Vec<Span>, kind: SpanKind, index: usize) {
	if let Some(last) = spans.last_mut() {
		last.lines.end = index;
	}

	spans.push(Span {
		kind,
		lines: index..index,
	});
}

fn byte_range(lines: &[Line<'_>]) -> Range<usize> {
	match (lines.first(), lines.last()) {
		(Some(first), Some(last)) => first.start..last.end,
		_ => 0..0,
	}
}

/// Where the section parser is within one section.
#[derive(Clone, Copy)]
enum SectionState<'l, 'a> {
	/// Collecting question headings and bullets.
	Questions,
	/// The question block ended before the answer fence.
	Pending,
	/// Inside the answer fence.
	Answer {
		indent: &'a str,
		ticks: usize,
		opened: &'l Line<'a>,
	},
	/// The answer fence was closed.
	Answered,
	/// Inside an extra fence that is ignored.
	Skipping { ticks: usize, opened: &'l Line<'a> },
}

/// Extract questions, the answer and the body from the lines of one section
/// span. The first line is always a question heading.
fn parse_section(
	content: &str,
	lines: &[Line<'_>],
	diagnostics: &mut Vec<ParseDiagnostic>,
) -> QnASection {
	let first = &lines[0];
	let mut last = first;
	let mut questions = Vec::new();
	let mut answer_lines: Vec<&str> = Vec::new();
	let mut state = SectionState::Questions;

	for line in lines {
		state = match state {
			SectionState::Questions | SectionState::Pending => {
				match line.kind {
					LineKind::Heading { question } | LineKind::Bullet { question }
						if matches!(state, SectionState::Questions) =>
					{
						questions.push(Question {
							id: QuestionId::derive(line.start, question),
							content: question.to_string(),
						});
						last = line;
						SectionState::Questions
					}
					LineKind::Fence { indent, ticks, .. } => {
						last = line;
						SectionState::Answer {
							indent,
							ticks,
							opened: line,
						}
					}
					LineKind::Blank | LineKind::Comment => SectionState::Pending,
					_ => {
						tracing::trace!(line = line.number, kind = %line.kind, "unexpected line before answer");
						diagnostics.push(ParseDiagnostic::unrecognized(line));
						SectionState::Pending
					}
				}
			}
			SectionState::Answer { ticks, .. } if line.kind.closes_fence(ticks) => {
				last = line;
				SectionState::Answered
			}
			SectionState::Answer { indent, .. } => {
				answer_lines.push(strip_indent(line.text, indent));
				last = line;
				state
			}
			SectionState::Answered => {
				match line.kind {
					LineKind::Fence { ticks, .. } => {
						diagnostics.push(ParseDiagnostic::DuplicateAnswer {
							line: line.number,
							column: line.indent_column(),
						});
						SectionState::Skipping {
							ticks,
							opened: line,
						}
					}
					LineKind::Blank | LineKind::Comment => SectionState::Answered,
					_ => {
						diagnostics.push(ParseDiagnostic::unrecognized(line));
						SectionState::Answered
					}
				}
			}
			SectionState::Skipping { ticks, .. } if line.kind.closes_fence(ticks) => {
				SectionState::Answered
			}
			SectionState::Skipping { .. } => state,
		};
	}

	if let SectionState::Answer { opened, .. } | SectionState::Skipping { opened, .. } = state {
		diagnostics.push(ParseDiagnostic::unterminated_fence(opened));
	}

	let body_range = first.start..last.content_end;
	let body = content[body_range.clone()].to_string();
	let position = Position::from_points(
		Point::new(first.number, 1, first.start),
		Point::on_line(last.number, last.text, last.start, last.content_end),
	);

	QnASection {
		section_id: SectionId::derive(first.start, &body),
		body,
		questions,
		answer: answer_lines.join("\n"),
		range: byte_range(lines),
		body_range,
		position,
	}
}

/// Remove the indentation introduced by the opening fence.
fn strip_indent<'a>(text: &'a str, indent: &str) -> &'a str {
	text.strip_prefix(indent)
		.unwrap_or_else(|| text.trim_start_matches([' ', '\t']))
}

fn parse_directive_line(
	line: &Line<'_>,
	diagnostics: &mut Vec<ParseDiagnostic>,
) -> Option<Directive> {
	let LineKind::Directive { body } = line.kind else {
		return None;
	};

	match parse_directive_body(body) {
		Ok((key, value)) => {
			Some(Directive {
				key,
				value,
				range: line.start..line.content_end,
				line: line.number,
			})
		}
		Err(DirectiveProblem::Malformed) => {
			diagnostics.push(ParseDiagnostic::MalformedDirective {
				text: line.text.trim().to_string(),
				line: line.number,
				column: line.indent_column(),
			});
			None
		}
		Err(DirectiveProblem::UnknownKey(key)) => {
			diagnostics.push(ParseDiagnostic::UnknownDirective {
				key,
				line: line.number,
				column: line.indent_column(),
			});
			None
		}
	}
}

/// Lines outside any section: only blanks and comments are expected.
fn parse_inert(lines: &[Line<'_>], diagnostics: &mut Vec<ParseDiagnostic>) {
	let mut open_fence: Option<(usize, &Line<'_>)> = None;

	for line in lines {
		if let Some((ticks, _)) = open_fence {
			if line.kind.closes_fence(ticks) {
				open_fence = None;
			}
			continue;
		}

		match line.kind {
			LineKind::Blank | LineKind::Comment => {}
			LineKind::Fence { ticks, .. } => {
				diagnostics.push(ParseDiagnostic::OrphanAnswer {
					line: line.number,
					column: line.indent_column(),
				});
				open_fence = Some((ticks, line));
			}
			_ => diagnostics.push(ParseDiagnostic::unrecognized(line)),
		}
	}

	if let Some((_, opened)) = open_fence {
		diagnostics.push(ParseDiagnostic::unterminated_fence(opened));
	}
}
