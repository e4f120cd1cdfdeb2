use serde::Deserialize;
use serde::Serialize;

/// A single location in a document. Lines and columns are 1-indexed, the
/// offset is a 0-indexed byte offset into the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
	pub line: usize,
	pub column: usize,
	pub offset: usize,
}

impl Point {
	pub fn new(line: usize, column: usize, offset: usize) -> Self {
		Self {
			line,
			column,
			offset,
		}
	}

	/// The point at `offset` on a line that starts at `line_start`.
	pub(crate) fn on_line(line: usize, line_text: &str, line_start: usize, offset: usize) -> Self {
		let within = offset.saturating_sub(line_start).min(line_text.len());
		let column = line_text
			.get(..within)
			.map_or(within, |prefix| prefix.chars().count())
			+ 1;

		Self::new(line, column, offset)
	}
}

/// A start and end point in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
	pub start: Point,
	pub end: Point,
}

impl Position {
	pub fn from_points(start: Point, end: Point) -> Self {
		Self { start, end }
	}
}
