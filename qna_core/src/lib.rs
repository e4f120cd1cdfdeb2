//! `qna_core` parses QnA documents and applies structural edits to them.
//!
//! A QnA document is a markdown-like file of question/answer sections:
//!
//! ````text
//! > !# @kb.name = support
//!
//! # ? How do I reset my password?
//! - I forgot my password
//! ```
//! Open the account page and choose "Reset".
//! ```
//! ````
//!
//! Each section starts with a `# ?` heading, may list alternative phrasings
//! as bullets and ends with a fenced answer. Stacked headings and bullets
//! belong to one section only while they sit on consecutive lines. Lines
//! starting with `> !#` are directives.
//!
//! ## Processing pipeline
//!
//! ```text
//! content
//!   -> lexer (classifies every line from its leading tokens)
//!   -> splitter (groups lines into preamble, directive and section spans)
//!   -> section parser (questions, answer, diagnostics)
//!   -> QnAFile
//! ```
//!
//! Parsing never fails. Anything that doesn't fit the format is kept in the
//! content verbatim and reported as a [`ParseDiagnostic`].
//!
//! ## Editing
//!
//! A [`QnAFile`] is immutable. [`add_section`], [`insert_section`],
//! [`remove_section`], [`update_section`], [`update_qna_section`] and
//! [`update_qna_question`] splice the content and return a freshly parsed
//! document, leaving the rest of the text byte-for-byte intact.
//!
//! ```rust
//! use qna_core::add_section;
//! use qna_core::generate_qna_pair;
//! use qna_core::parse;
//!
//! let file = parse("faq.qna", "# ? hi\n```\nhello\n```\n");
//! let file = add_section(&file, &generate_qna_pair("bye", "see you"));
//!
//! assert_eq!(file.qna_sections.len(), 2);
//! assert_eq!(file.qna_sections[1].question_contents(), ["bye"]);
//! ```
//!
//! ## Projects
//!
//! [`project::check_project`] discovers `*.qna` files using the settings in
//! `qna.toml` (see [`QnaConfig`]) and parses each of them.

pub use config::*;
pub use directive::*;
pub use document::*;
pub use edit::*;
pub use error::*;
pub use parser::*;
pub use position::*;
pub use render::*;

pub mod config;
mod directive;
mod document;
mod edit;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
mod parser;
mod position;
pub mod project;
mod render;
pub(crate) mod tokens;

#[cfg(test)]
mod __fixtures;
