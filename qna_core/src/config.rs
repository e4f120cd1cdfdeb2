use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::QnaError;
use crate::QnaResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["qna.toml", ".qna.toml", ".config/qna.toml"];

/// Include pattern used when `[include]` lists none.
pub const DEFAULT_INCLUDE_PATTERN: &str = "**/*.qna";

/// Configuration loaded from a `qna.toml` file.
///
/// ```toml
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [include]
/// patterns = ["kb/**/*.qna"]
///
/// [exclude]
/// patterns = ["vendor/", "*.draft.qna"]
///
/// [check]
/// ignore = ["unrecognized_line"]
/// ```
#[derive(Debug, Deserialize)]
pub struct QnaConfig {
	#[serde(default)]
	pub include: IncludeConfig,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	#[serde(default)]
	pub check: CheckConfig,
	/// Files larger than this are reported instead of parsed.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, the project's `.gitignore` is not used for filtering. The
	/// `[exclude]` patterns still apply.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for QnaConfig {
	fn default() -> Self {
		Self {
			include: IncludeConfig::default(),
			exclude: ExcludeConfig::default(),
			check: CheckConfig::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

/// Which files are QnA documents.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeConfig {
	/// Glob patterns relative to the project root. Empty means
	/// [`DEFAULT_INCLUDE_PATTERN`].
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax, including negation (`!pattern`) and
/// trailing `/` for directories.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Settings for `qna check`.
#[derive(Debug, Default, Deserialize)]
pub struct CheckConfig {
	/// Diagnostic codes to drop from reports, e.g. `"unrecognized_line"`.
	#[serde(default)]
	pub ignore: Vec<String>,
}

impl QnaConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> QnaResult<Option<QnaConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;

		Self::from_toml(&content).map(Some)
	}

	pub fn from_toml(content: &str) -> QnaResult<QnaConfig> {
		toml::from_str(content).map_err(|e| QnaError::ConfigParse(e.to_string()))
	}

	/// The configured include patterns, or the default one.
	pub fn include_patterns(&self) -> Vec<String> {
		if self.include.patterns.is_empty() {
			vec![DEFAULT_INCLUDE_PATTERN.to_string()]
		} else {
			self.include.patterns.clone()
		}
	}
}
