use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::QnAFile;
use crate::QnaError;
use crate::QnaResult;
use crate::config::DEFAULT_INCLUDE_PATTERN;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::QnaConfig;
use crate::parse;

/// Options for controlling how a project is scanned.
///
/// Use [`ScanOptions::default()`] to scan every `*.qna` file or
/// [`ScanOptions::from_config`] to construct from a [`QnaConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Files whose root-relative path matches are scanned.
	pub include_set: GlobSet,
	pub max_file_size: u64,
	pub disable_gitignore: bool,
	/// Diagnostic codes dropped from [`FileReport`]s.
	pub ignored_codes: Vec<String>,
}

impl Default for ScanOptions {
	fn default() -> Self {
		let include_set = build_glob_set(&[DEFAULT_INCLUDE_PATTERN.to_string()])
			.unwrap_or_else(|_| GlobSet::empty());

		Self {
			exclude_patterns: Vec::new(),
			include_set,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			ignored_codes: Vec::new(),
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a [`QnaConfig`]. Fails when an include
	/// pattern isn't a valid glob.
	pub fn from_config(config: Option<&QnaConfig>) -> QnaResult<Self> {
		let Some(config) = config else {
			return Ok(Self::default());
		};

		Ok(Self {
			exclude_patterns: config.exclude.patterns.clone(),
			include_set: build_glob_set(&config.include_patterns())?,
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
			ignored_codes: config.check.ignore.clone(),
		})
	}

	fn is_ignored_code(&self, code: &str) -> bool {
		self.ignored_codes.iter().any(|ignored| ignored == code)
	}
}

/// A parsed file from a project scan.
#[derive(Debug, Clone)]
pub struct FileReport {
	pub path: PathBuf,
	/// The parsed document. Its diagnostics exclude the ignored codes.
	pub file: QnAFile,
}

/// Load the project config at `root` (if any), then scan and parse every
/// QnA file.
pub fn check_project(root: &Path) -> QnaResult<Vec<FileReport>> {
	let config = QnaConfig::load(root)?;
	let options = ScanOptions::from_config(config.as_ref())?;

	check_files(root, &options)
}

/// Parse every file selected by `options`. Documents are identified by their
/// path relative to `root`.
pub fn check_files(root: &Path, options: &ScanOptions) -> QnaResult<Vec<FileReport>> {
	let files = collect_files(root, options)?;
	let mut reports = Vec::with_capacity(files.len());

	for path in files {
		let content = read_file(&path, options.max_file_size)?;
		let id = path
			.strip_prefix(root)
			.unwrap_or(&path)
			.display()
			.to_string();
		let mut file = parse(id, content);
		file.diagnostics
			.retain(|diagnostic| !options.is_ignored_code(diagnostic.code()));

		reports.push(FileReport { path, file });
	}

	tracing::debug!(files = reports.len(), "checked project");

	Ok(reports)
}

/// Read a file, refusing anything above `limit` bytes.
pub fn read_file(path: &Path, limit: u64) -> QnaResult<String> {
	let size = std::fs::metadata(path)?.len();

	if size > limit {
		return Err(QnaError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit,
		});
	}

	Ok(std::fs::read_to_string(path)?)
}

/// Collect every file below `root` that matches the include set, sorted.
///
/// Unless `disable_gitignore` is set, paths matched by the root `.gitignore`
/// are skipped. The exclude patterns always apply on top.
pub fn collect_files(root: &Path, options: &ScanOptions) -> QnaResult<Vec<PathBuf>> {
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let exclude = build_exclude_matcher(root, &options.exclude_patterns)?;
	let filters = Filters {
		root,
		include_set: &options.include_set,
		gitignore: &gitignore,
		exclude: &exclude,
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(&filters, root, &mut files, &mut visited_dirs)?;
	files.sort();

	Ok(files)
}

struct Filters<'a> {
	root: &'a Path,
	include_set: &'a GlobSet,
	gitignore: &'a Gitignore,
	exclude: &'a Gitignore,
}

fn walk_dir(
	filters: &Filters<'_>,
	dir: &Path,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> QnaResult<()> {
	// Canonical paths catch directories reached twice through symlinks.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(QnaError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(is_ignored_directory_name)
		{
			continue;
		}

		let is_dir = path.is_dir();

		if filters.gitignore.matched(&path, is_dir).is_ignore()
			|| filters.exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			walk_dir(filters, &path, files, visited_dirs)?;
		} else if path
			.strip_prefix(filters.root)
			.is_ok_and(|relative| filters.include_set.is_match(relative))
		{
			files.push(path);
		}
	}

	Ok(())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn build_glob_set(patterns: &[String]) -> QnaResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();

	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			QnaError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.kind().to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		QnaError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> QnaResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);

	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			QnaError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		QnaError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a matcher from the project's `.gitignore`, if any.
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");

	if gitignore_path.is_file() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!(%error, "failed to read .gitignore");
		}
	}

	builder.build().unwrap_or_else(|error| {
		tracing::warn!(%error, "ignoring invalid .gitignore");
		Gitignore::empty()
	})
}
