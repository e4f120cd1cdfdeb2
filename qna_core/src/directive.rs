use std::fmt::Display;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// The enumerated metadata keys understood in `> !# key = value` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DirectiveKey {
	/// `@kb.name`: the knowledge base the file belongs to.
	KbName,
	/// `@source.urls`: comma separated urls the pairs were imported from.
	SourceUrls,
	/// `@qna.pair.source`: the editorial source recorded for every pair.
	PairSource,
}

impl DirectiveKey {
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"@kb.name" => Some(Self::KbName),
			"@source.urls" => Some(Self::SourceUrls),
			"@qna.pair.source" => Some(Self::PairSource),
			_ => None,
		}
	}
}

impl Display for DirectiveKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::KbName => write!(f, "@kb.name"),
			Self::SourceUrls => write!(f, "@source.urls"),
			Self::PairSource => write!(f, "@qna.pair.source"),
		}
	}
}

/// A file-level metadata line. Directives never belong to a section but
/// their raw text is kept in the document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
	pub key: DirectiveKey,
	/// The value with surrounding whitespace removed.
	pub value: String,
	/// Byte range of the directive line, without its terminator.
	pub range: Range<usize>,
	/// 1-indexed line number.
	pub line: usize,
}

impl Directive {
	/// The comma separated parts of the value, trimmed and without empty
	/// entries.
	pub fn values(&self) -> Vec<&str> {
		self.value
			.split(',')
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.collect()
	}
}

/// Why a directive line could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DirectiveProblem {
	/// No `=` or an empty key.
	Malformed,
	/// A well formed line with a key outside [`DirectiveKey`].
	UnknownKey(String),
}

/// Split the text after `> !#` into a known key and its value.
pub(crate) fn parse_directive_body(body: &str) -> Result<(DirectiveKey, String), DirectiveProblem> {
	let Some((key, value)) = body.split_once('=') else {
		return Err(DirectiveProblem::Malformed);
	};

	let key = key.trim();
	if key.is_empty() {
		return Err(DirectiveProblem::Malformed);
	}

	let Some(key) = DirectiveKey::from_key(key) else {
		return Err(DirectiveProblem::UnknownKey(key.to_string()));
	};

	Ok((key, value.trim().to_string()))
}
