use std::fmt::Display;

/// The shape of a single line, decided from its leading tokens only. The
/// rest of the line is carried as borrowed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
	/// Empty or whitespace-only.
	Blank,
	/// `# ? question`, at any heading level.
	Heading { question: &'a str },
	/// A `#` line without the `?` marker.
	OtherHeading,
	/// `- question`, `* question` or `+ question`.
	Bullet { question: &'a str },
	/// Three or more backticks, optionally followed by an info string.
	Fence {
		indent: &'a str,
		ticks: usize,
		info: &'a str,
	},
	/// `> !# key = value`
	Directive { body: &'a str },
	/// Any other line starting with `>`.
	Comment,
	/// Anything else.
	Text,
}

impl LineKind<'_> {
	/// Whether this line closes a fence that was opened with `open_ticks`
	/// backticks.
	pub fn closes_fence(&self, open_ticks: usize) -> bool {
		matches!(self, LineKind::Fence { ticks, info, .. } if *ticks >= open_ticks && info.is_empty())
	}
}

impl Display for LineKind<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LineKind::Blank => write!(f, "blank"),
			LineKind::Heading { .. } => write!(f, "heading"),
			LineKind::OtherHeading => write!(f, "other heading"),
			LineKind::Bullet { .. } => write!(f, "bullet"),
			LineKind::Fence { ticks, .. } => write!(f, "fence({ticks})"),
			LineKind::Directive { .. } => write!(f, "directive"),
			LineKind::Comment => write!(f, "comment"),
			LineKind::Text => write!(f, "text"),
		}
	}
}

/// A classified line of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
	/// The line text without its terminator.
	pub text: &'a str,
	/// 1-indexed line number.
	pub number: usize,
	/// Byte offset of the first character.
	pub start: usize,
	/// Byte offset just past `text`, before `\n` or `\r\n`.
	pub content_end: usize,
	/// Byte offset just past the terminator.
	pub end: usize,
	pub kind: LineKind<'a>,
}

impl Line<'_> {
	/// The 1-indexed column of the first non-whitespace character.
	pub fn indent_column(&self) -> usize {
		self.text
			.chars()
			.take_while(|ch| ch.is_whitespace())
			.count()
			+ 1
	}
}
