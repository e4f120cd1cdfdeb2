use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum QnaError {
	#[error(transparent)]
	#[diagnostic(code(qna::io_error))]
	Io(#[from] std::io::Error),

	#[error("section index `{index}` is out of range")]
	#[diagnostic(
		code(qna::out_of_range),
		help("section indices start at 0; use an index past the last section to append")
	)]
	OutOfRange { index: isize },

	#[error("no section with id `{0}` in this document")]
	#[diagnostic(
		code(qna::section_not_found),
		help("section ids are regenerated on every parse; read them again from the latest document")
	)]
	SectionNotFound(String),

	#[error("no section at index {index}: the document has {count} section(s)")]
	#[diagnostic(code(qna::section_index))]
	SectionIndex { index: usize, count: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(qna::config_parse),
		help("check that qna.toml is valid TOML with [include], [exclude] and/or [check] sections")
	)]
	ConfigParse(String),

	#[error("invalid file pattern `{pattern}`: {reason}")]
	#[diagnostic(code(qna::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(qna::file_too_large),
		help("increase `max_file_size` in qna.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at `{path}`")]
	#[diagnostic(
		code(qna::symlink_cycle),
		help("remove the circular symlink or add the path to `[exclude]` in qna.toml")
	)]
	SymlinkCycle { path: String },
}

pub type QnaResult<T> = Result<T, QnaError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
