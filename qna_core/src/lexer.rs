use std::ops::Range;

use logos::Logos;

use crate::tokens::Line;
use crate::tokens::LineKind;

/// Raw tokens produced by logos for the leading part of a single line. Every
/// byte of a line maps to some token, so lexing never fails.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r"#+")]
	Hashes,
	#[token("?")]
	QuestionMark,
	#[token(">")]
	Angle,
	#[token("!")]
	Bang,
	#[regex(r"[-*+]")]
	BulletMarker,
	#[regex(r"`+")]
	Backticks,
	#[regex(r"[ \t\r]+")]
	Whitespace,
	#[regex(r"[^#?>!*+` \t\r\n-]+")]
	Text,
}

/// Walks the logos token stream of one line.
struct LineWalker<'a> {
	text: &'a str,
	tokens: std::iter::Peekable<logos::SpannedIter<'a, RawToken>>,
}

impl<'a> LineWalker<'a> {
	fn new(text: &'a str) -> Self {
		Self {
			text,
			tokens: RawToken::lexer(text).spanned().peekable(),
		}
	}

	/// The next token, including whitespace.
	fn next_raw(&mut self) -> Option<(RawToken, Range<usize>)> {
		self.tokens
			.next()
			.map(|(token, span)| (token.unwrap_or(RawToken::Text), span))
	}

	/// The next token that is not whitespace.
	fn next_significant(&mut self) -> Option<(RawToken, Range<usize>)> {
		loop {
			match self.next_raw()? {
				(RawToken::Whitespace, _) => {}
				token => return Some(token),
			}
		}
	}

	/// Everything after `offset`, trimmed.
	fn rest(&self, offset: usize) -> &'a str {
		self.text[offset..].trim()
	}

	fn classify(mut self) -> LineKind<'a> {
		let Some((first, span)) = self.next_significant() else {
			return LineKind::Blank;
		};

		match first {
			RawToken::Hashes => {
				match self.next_significant() {
					Some((RawToken::QuestionMark, marker)) => {
						LineKind::Heading {
							question: self.rest(marker.end),
						}
					}
					_ => LineKind::OtherHeading,
				}
			}
			RawToken::Angle => {
				let Some((RawToken::Bang, _)) = self.next_significant() else {
					return LineKind::Comment;
				};

				// `!#` must be adjacent and a single hash.
				match self.next_raw() {
					Some((RawToken::Hashes, hash)) if hash.len() == 1 => {
						LineKind::Directive {
							body: self.rest(hash.end),
						}
					}
					_ => LineKind::Comment,
				}
			}
			RawToken::BulletMarker => {
				match self.next_raw() {
					None => LineKind::Bullet { question: "" },
					Some((RawToken::Whitespace, space)) => {
						LineKind::Bullet {
							question: self.rest(space.end),
						}
					}
					Some(_) => LineKind::Text,
				}
			}
			RawToken::Backticks if span.len() >= 3 => {
				LineKind::Fence {
					indent: &self.text[..span.start],
					ticks: span.len(),
					info: self.rest(span.end),
				}
			}
			_ => LineKind::Text,
		}
	}
}

/// Classify a single line of text. The text must not contain a line
/// terminator.
pub fn classify(text: &str) -> LineKind<'_> {
	LineWalker::new(text).classify()
}

/// Split `content` into classified lines. Concatenating
/// `content[line.start..line.end]` for every line reproduces the input.
pub fn tokenize(content: &str) -> Vec<Line<'_>> {
	let mut offset = 0;

	content
		.split_inclusive('\n')
		.enumerate()
		.map(|(index, raw)| {
			let text = raw
				.strip_suffix('\n')
				.map_or(raw, |text| text.strip_suffix('\r').unwrap_or(text));
			let line = Line {
				text,
				number: index + 1,
				start: offset,
				content_end: offset + text.len(),
				end: offset + raw.len(),
				kind: classify(text),
			};

			offset += raw.len();
			line
		})
		.collect()
}
